//! Cell contents: text, links, tooltips and attributes.

use tracing::debug;

use super::Sheet;
use crate::color::Rgba;
use crate::editor::mutation::apply_cell_edit;
use crate::error::Result;
use crate::types::{BorderMask, CellAttributes, CellLink, Justification, SheetRange};

impl Sheet {
    /// Resolve an optional range argument: `None` means the whole sheet.
    fn target_range(&self, range: Option<&SheetRange>) -> SheetRange {
        let mut range = range.copied().map_or_else(
            || SheetRange::new(0, 0, self.grid.max_row(), self.grid.max_col()),
            SheetRange::normalized,
        );
        range.fixup(self.grid.max_row(), self.grid.max_col());
        range
    }

    /// Keep the open editor in sync with a programmatic write to its cell.
    fn sync_editor(&mut self, row: i32, col: i32) {
        let cell = self.editor.editing_cell();
        if cell.row != row || cell.col != col {
            return;
        }
        let text = self
            .grid
            .cell(row, col)
            .map(|c| c.text().to_string())
            .unwrap_or_default();
        let editable = self.cell_editable(cell);
        if let Some(session) = self.editor.session_mut() {
            session.set_text(&text);
            session.set_editable(editable);
        }
    }

    // ---- Text ----

    pub fn cell_text(&self, row: i32, col: i32) -> Option<&str> {
        self.grid.cell(row, col)?.text.as_deref()
    }

    /// Write the text of `(row, col)`, allocating the record if needed.
    ///
    /// Returns whether the text changed; out-of-range writes are ignored.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn set_cell_text(&mut self, row: i32, col: i32, text: &str) -> Result<bool> {
        if !self.grid.contains(row, col) {
            return Ok(false);
        }
        let changed = apply_cell_edit(&mut self.grid, row, col, text)?;
        self.sync_editor(row, col);
        if changed {
            self.signals.changed(row, col);
            self.invalidate_range(&SheetRange::cell(row, col));
        }
        Ok(changed)
    }

    /// Write text and justification in one go.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn set_cell(
        &mut self,
        row: i32,
        col: i32,
        justification: Justification,
        text: &str,
    ) -> Result<bool> {
        if !self.grid.contains(row, col) {
            return Ok(false);
        }
        self.overlay
            .update(&mut self.grid, row, col, |a| a.justification = justification)?;
        self.set_cell_text(row, col, text)
    }

    /// Release text, link, tooltips and attributes of a cell, keeping its slot.
    pub fn clear_cell(&mut self, row: i32, col: i32) -> bool {
        if !self.grid.clear_cell(row, col) {
            return false;
        }
        self.sync_editor(row, col);
        self.signals.clear_cell(row, col);
        self.invalidate_range(&SheetRange::cell(row, col));
        true
    }

    /// Free the cell record entirely.
    pub fn delete_cell(&mut self, row: i32, col: i32) -> bool {
        if !self.grid.delete_cell(row, col) {
            return false;
        }
        self.sync_editor(row, col);
        self.signals.clear_cell(row, col);
        self.invalidate_range(&SheetRange::cell(row, col));
        true
    }

    /// Clear every allocated cell of `range` (`None` = whole sheet). Returns the count.
    pub fn range_clear(&mut self, range: Option<&SheetRange>) -> usize {
        let range = self.target_range(range);
        let cleared = range
            .cells()
            .filter(|pos| self.clear_cell(pos.row, pos.col))
            .count();
        debug!(%range, cleared, "cleared range");
        cleared
    }

    /// Delete every allocated cell of `range` (`None` = whole sheet). Returns the count.
    pub fn range_delete(&mut self, range: Option<&SheetRange>) -> usize {
        let range = self.target_range(range);
        let deleted = range
            .cells()
            .filter(|pos| self.delete_cell(pos.row, pos.col))
            .count();
        debug!(%range, deleted, "deleted range");
        deleted
    }

    // ---- Links ----

    /// Attach opaque application data to a cell.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn link_cell(&mut self, row: i32, col: i32, link: CellLink) -> Result<bool> {
        let Some(cell) = self.grid.ensure_allocated(row, col)? else {
            return Ok(false);
        };
        cell.link = Some(link);
        Ok(true)
    }

    pub fn link(&self, row: i32, col: i32) -> Option<&CellLink> {
        self.grid.cell(row, col)?.link.as_ref()
    }

    pub fn remove_link(&mut self, row: i32, col: i32) -> bool {
        self.grid
            .cell_mut(row, col)
            .and_then(|cell| cell.link.take())
            .is_some()
    }

    /// Drop the links of every cell in `range`. Returns how many were removed.
    pub fn delete_cell_links(&mut self, range: &SheetRange) -> usize {
        let range = self.target_range(Some(range));
        range
            .cells()
            .filter(|pos| self.remove_link(pos.row, pos.col))
            .count()
    }

    // ---- Tooltips ----

    /// Set or remove the markup tooltip of a cell. Removing never allocates.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn set_cell_tooltip_markup(&mut self, row: i32, col: i32, markup: Option<&str>) -> Result<bool> {
        let cell = match markup {
            Some(_) => self.grid.ensure_allocated(row, col)?,
            None => self.grid.cell_mut(row, col),
        };
        let Some(cell) = cell else {
            return Ok(false);
        };
        cell.tooltip_markup = markup.map(str::to_string);
        Ok(true)
    }

    pub fn cell_tooltip_markup(&self, row: i32, col: i32) -> Option<&str> {
        self.grid.cell(row, col)?.tooltip_markup.as_deref()
    }

    /// Set or remove the plain tooltip of a cell. Removing never allocates.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn set_cell_tooltip_text(&mut self, row: i32, col: i32, text: Option<&str>) -> Result<bool> {
        let cell = match text {
            Some(_) => self.grid.ensure_allocated(row, col)?,
            None => self.grid.cell_mut(row, col),
        };
        let Some(cell) = cell else {
            return Ok(false);
        };
        cell.tooltip_text = text.map(str::to_string);
        Ok(true)
    }

    pub fn cell_tooltip_text(&self, row: i32, col: i32) -> Option<&str> {
        self.grid.cell(row, col)?.tooltip_text.as_deref()
    }

    // ---- Attributes ----

    /// Effective attributes at `(row, col)` and whether the cell is allocated.
    pub fn attributes(&self, row: i32, col: i32) -> Option<(CellAttributes, bool)> {
        if !self.grid.contains(row, col) {
            return None;
        }
        Some(self.overlay.attributes(&self.grid, row, col))
    }

    /// Sheet-wide defaults used by cells without an override.
    pub fn default_attributes(&self) -> &CellAttributes {
        self.overlay.defaults()
    }

    /// Replace the attribute override of one cell.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn set_cell_attributes(&mut self, row: i32, col: i32, attributes: CellAttributes) -> Result<bool> {
        let updated = self
            .overlay
            .update(&mut self.grid, row, col, |a| *a = attributes)?;
        if updated {
            self.sync_editor(row, col);
            self.invalidate_range(&SheetRange::cell(row, col));
        }
        Ok(updated)
    }

    /// Apply `update` to every cell of `range` (`None` = whole sheet).
    fn range_update<F>(&mut self, range: Option<&SheetRange>, update: F) -> Result<usize>
    where
        F: FnMut(&mut CellAttributes),
    {
        let range = self.target_range(range);
        let touched = self.overlay.update_range(&mut self.grid, &range, update)?;
        let active = self.selection.active;
        if range.contains_pos(active) {
            self.sync_editor(active.row, active.col);
        }
        self.invalidate_range(&range);
        Ok(touched)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_background(&mut self, range: Option<&SheetRange>, color: Rgba) -> Result<usize> {
        self.range_update(range, |a| a.background = color)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_foreground(&mut self, range: Option<&SheetRange>, color: Rgba) -> Result<usize> {
        self.range_update(range, |a| a.foreground = color)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_justification(
        &mut self,
        range: Option<&SheetRange>,
        justification: Justification,
    ) -> Result<usize> {
        self.range_update(range, |a| a.justification = justification)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_editable(&mut self, range: Option<&SheetRange>, editable: bool) -> Result<usize> {
        self.range_update(range, |a| a.is_editable = editable)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_visible(&mut self, range: Option<&SheetRange>, visible: bool) -> Result<usize> {
        self.range_update(range, |a| a.is_visible = visible)
    }

    /// Set which sides carry a border and the line width.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_border(
        &mut self,
        range: Option<&SheetRange>,
        mask: BorderMask,
        width: u32,
    ) -> Result<usize> {
        self.range_update(range, |a| {
            a.border.mask = mask;
            a.border.width = width;
        })
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_border_color(&mut self, range: Option<&SheetRange>, color: Rgba) -> Result<usize> {
        self.range_update(range, |a| a.border.color = color)
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_font(&mut self, range: Option<&SheetRange>, font: Option<&str>) -> Result<usize> {
        self.range_update(range, |a| a.font = font.map(str::to_string))
    }

    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn range_set_css_class(&mut self, range: Option<&SheetRange>, class: Option<&str>) -> Result<usize> {
        self.range_update(range, |a| a.css_class = class.map(str::to_string))
    }
}
