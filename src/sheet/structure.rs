//! Row/column insertion, deletion, sizing and visibility.

use tracing::debug;

use super::Sheet;
use crate::error::Result;
use crate::grid::{to_index, to_logical};

/// Index after inserting `n` entries before `pos`.
fn shifted(i: i32, pos: i32, n: i32) -> i32 {
    if i >= pos {
        i.saturating_add(n)
    } else {
        i
    }
}

/// Index after deleting `n` entries from `pos`; indices inside the band collapse onto `pos`.
fn collapsed(i: i32, pos: i32, n: i32) -> i32 {
    if i >= pos.saturating_add(n) {
        i - n
    } else if i >= pos {
        pos
    } else {
        i
    }
}

impl Sheet {
    /// Insert `n` rows before `row`; `row == max_row + 1` appends.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn insert_rows(&mut self, row: i32, n: usize) -> Result<bool> {
        let Some(pos) = to_index(row) else {
            return Ok(false);
        };
        if !self
            .grid
            .insert_rows(pos, n, self.config.default_row_height)?
        {
            return Ok(false);
        }
        let n = to_logical(n);
        self.selection.remap(|r| shifted(r, row, n), |c| c);
        self.after_structure_change(false);
        debug!(row, n, "inserted rows");
        Ok(true)
    }

    /// Insert `n` columns before `col`; `col == max_col + 1` appends.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn insert_columns(&mut self, col: i32, n: usize) -> Result<bool> {
        let Some(pos) = to_index(col) else {
            return Ok(false);
        };
        if !self
            .grid
            .insert_columns(pos, n, self.config.default_column_width)?
        {
            return Ok(false);
        }
        let n = to_logical(n);
        self.selection.remap(|r| r, |c| shifted(c, col, n));
        self.after_structure_change(false);
        debug!(col, n, "inserted columns");
        Ok(true)
    }

    /// Append `n` rows.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn add_rows(&mut self, n: usize) -> Result<bool> {
        self.insert_rows(self.grid.max_row() + 1, n)
    }

    /// Append `n` columns.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn add_columns(&mut self, n: usize) -> Result<bool> {
        self.insert_columns(self.grid.max_col() + 1, n)
    }

    /// Delete up to `n` rows starting at `row`, freeing the cells inside.
    pub fn delete_rows(&mut self, row: i32, n: usize) -> bool {
        let Some(pos) = to_index(row) else {
            return false;
        };
        let active = self.selection.active;
        let removal = self.grid.delete_rows(pos, n);
        if removal.removed == 0 {
            return false;
        }
        let removed = removal.removed;
        let lost_active = active.row >= row && active.row < row + removed;
        self.selection.remap(|r| collapsed(r, row, removed), |c| c);
        self.after_structure_change(lost_active);
        debug!(row, removed, freed = removal.freed_cells, "deleted rows");
        true
    }

    /// Delete up to `n` columns starting at `col`, freeing the cells inside.
    pub fn delete_columns(&mut self, col: i32, n: usize) -> bool {
        let Some(pos) = to_index(col) else {
            return false;
        };
        let active = self.selection.active;
        let removal = self.grid.delete_columns(pos, n);
        if removal.removed == 0 {
            return false;
        }
        let removed = removal.removed;
        let lost_active = active.col >= col && active.col < col + removed;
        self.selection.remap(|r| r, |c| collapsed(c, col, removed));
        self.after_structure_change(lost_active);
        debug!(col, removed, freed = removal.freed_cells, "deleted columns");
        true
    }

    /// Clamp selection state, re-home the editor and repaint.
    ///
    /// When the active cell was deleted its session is dropped uncommitted and
    /// reopened at the clamped position.
    fn after_structure_change(&mut self, lost_active: bool) {
        self.selection.fixup(self.grid.max_row(), self.grid.max_col());
        let active = self.selection.active;
        if lost_active || !active.is_set() {
            self.editor.discard();
            if self.grid.contains(active.row, active.col) {
                self.activate_cell(active);
            }
        } else {
            self.editor.retarget(active);
        }
        self.relayout();
        self.invalidate_all();
    }

    // ---- Sizes ----

    pub fn row_height(&self, row: i32) -> Option<i32> {
        Some(self.grid.row(row)?.height)
    }

    pub fn column_width(&self, col: i32) -> Option<i32> {
        Some(self.grid.column(col)?.width)
    }

    /// Set a row height (clamped to the minimum) and raise `new_row_height`.
    pub fn set_row_height(&mut self, row: i32, height: i32) -> bool {
        if !self.apply_row_height(row, height) && self.grid.row(row).is_none() {
            return false;
        }
        let height = self.grid.row(row).map_or(0, |r| r.height);
        self.signals.new_row_height(row, height);
        true
    }

    /// Set a column width (clamped to the minimum) and raise `new_column_width`.
    pub fn set_column_width(&mut self, col: i32, width: i32) -> bool {
        if !self.apply_column_width(col, width) && self.grid.column(col).is_none() {
            return false;
        }
        let width = self.grid.column(col).map_or(0, |c| c.width);
        self.signals.new_column_width(col, width);
        true
    }

    /// Store a clamped row height without notifying. Returns whether it changed.
    pub(crate) fn apply_row_height(&mut self, row: i32, height: i32) -> bool {
        let height = height.max(self.config.min_row_height);
        let Some(descriptor) = self.grid.row_mut(row) else {
            return false;
        };
        if descriptor.height == height {
            return false;
        }
        descriptor.height = height;
        self.relayout();
        self.invalidate_all();
        true
    }

    /// Store a clamped column width without notifying. Returns whether it changed.
    pub(crate) fn apply_column_width(&mut self, col: i32, width: i32) -> bool {
        let width = width.max(self.config.min_column_width);
        let Some(descriptor) = self.grid.column_mut(col) else {
            return false;
        };
        if descriptor.width == width {
            return false;
        }
        descriptor.width = width;
        self.relayout();
        self.invalidate_all();
        true
    }

    // ---- Visibility ----

    pub fn row_visible(&self, row: i32) -> bool {
        self.grid.row(row).is_some_and(|r| r.is_visible)
    }

    pub fn column_visible(&self, col: i32) -> bool {
        self.grid.column(col).is_some_and(|c| c.is_visible)
    }

    pub fn set_row_visible(&mut self, row: i32, visible: bool) {
        let Some(descriptor) = self.grid.row_mut(row) else {
            return;
        };
        if descriptor.is_visible != visible {
            descriptor.is_visible = visible;
            self.relayout();
            self.invalidate_all();
        }
    }

    pub fn set_column_visible(&mut self, col: i32, visible: bool) {
        let Some(descriptor) = self.grid.column_mut(col) else {
            return;
        };
        if descriptor.is_visible != visible {
            descriptor.is_visible = visible;
            self.relayout();
            self.invalidate_all();
        }
    }
}
