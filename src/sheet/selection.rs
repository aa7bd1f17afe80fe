//! Active cell, anchor and range selection.
//!
//! In `Normal` state the committed range is exactly the active cell. The other
//! states cover whole rows, whole columns or an arbitrary rectangle, always
//! spanning the anchor (selection pin) and the cursor (selection cell).

use tracing::{debug, error, trace, warn};

use super::events::Gesture;
use super::scroll::TimerId;
use super::Sheet;
use crate::editor::mutation::apply_cell_edit;
use crate::grid::AxisDescriptor;
use crate::types::{CellPos, CellState, SheetRange, SheetState};

/// Selection and gesture state (separate from the editor state)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectionState {
    pub(crate) state: SheetState,
    pub(crate) active: CellPos,
    /// Fixed corner of the selection
    pub(crate) anchor: CellPos,
    /// Moving corner of the selection
    pub(crate) cursor: CellPos,
    pub(crate) range: SheetRange,
    /// Range before the last move/resize
    pub(crate) previous_range: SheetRange,
    /// Preview while a move/resize gesture is in flight
    pub(crate) drag_range: SheetRange,
    pub(crate) clip: SheetRange,
    pub(crate) gesture: Gesture,
    /// Cell under the pointer when a move gesture started
    pub(crate) drag_origin: CellPos,
    /// Last pointer position in widget coordinates
    pub(crate) pointer: (i32, i32),
    pub(crate) timer: Option<TimerId>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            state: SheetState::Normal,
            active: CellPos::UNSET,
            anchor: CellPos::UNSET,
            cursor: CellPos::UNSET,
            range: SheetRange::UNSET,
            previous_range: SheetRange::UNSET,
            drag_range: SheetRange::UNSET,
            clip: SheetRange::UNSET,
            gesture: Gesture::Idle,
            drag_origin: CellPos::UNSET,
            pointer: (0, 0),
            timer: None,
        }
    }
}

fn map_range(range: &mut SheetRange, rows: &impl Fn(i32) -> i32, cols: &impl Fn(i32) -> i32) {
    if range.is_set() {
        *range = SheetRange::new(rows(range.row0), cols(range.col0), rows(range.rowi), cols(range.coli));
    }
}

fn map_pos(pos: &mut CellPos, rows: &impl Fn(i32) -> i32, cols: &impl Fn(i32) -> i32) {
    if pos.is_set() {
        *pos = CellPos::new(rows(pos.row), cols(pos.col));
    }
}

impl SelectionState {
    /// Re-index every tracked position and range.
    pub(crate) fn remap(&mut self, rows: impl Fn(i32) -> i32, cols: impl Fn(i32) -> i32) {
        for pos in [
            &mut self.active,
            &mut self.anchor,
            &mut self.cursor,
            &mut self.drag_origin,
        ] {
            map_pos(pos, &rows, &cols);
        }
        for range in [
            &mut self.range,
            &mut self.previous_range,
            &mut self.drag_range,
            &mut self.clip,
        ] {
            map_range(range, &rows, &cols);
        }
    }

    /// Clamp every tracked position and range into the sheet bounds.
    pub(crate) fn fixup(&mut self, maxrow: i32, maxcol: i32) {
        for range in [
            &mut self.range,
            &mut self.previous_range,
            &mut self.drag_range,
            &mut self.clip,
        ] {
            range.fixup(maxrow, maxcol);
        }
        for pos in [
            &mut self.active,
            &mut self.anchor,
            &mut self.cursor,
            &mut self.drag_origin,
        ] {
            if !pos.is_set() {
                continue;
            }
            *pos = if maxrow < 0 || maxcol < 0 {
                CellPos::UNSET
            } else {
                CellPos::new(pos.row.min(maxrow), pos.col.min(maxcol))
            };
        }
        if !self.range.is_set() {
            self.state = SheetState::Normal;
        }
        self.stretch_lines(maxrow, maxcol);
    }

    /// Keep whole-column selections spanning every row and whole-row
    /// selections spanning every column.
    pub(crate) fn stretch_lines(&mut self, maxrow: i32, maxcol: i32) {
        match self.state {
            SheetState::ColumnSelected => {
                self.range.row0 = 0;
                self.range.rowi = maxrow;
                self.anchor.row = 0;
                self.cursor.row = maxrow;
            }
            SheetState::RowSelected => {
                self.range.col0 = 0;
                self.range.coli = maxcol;
                self.anchor.col = 0;
                self.cursor.col = maxcol;
            }
            SheetState::Normal | SheetState::RangeSelected => {}
        }
    }
}

/// Move `delta` visible entries away from `from`, stopping at the edges.
pub(crate) fn step_visible<D: AxisDescriptor>(items: &[D], from: i32, delta: i32) -> i32 {
    let dir = delta.signum();
    let mut pos = from;
    for _ in 0..delta.unsigned_abs() {
        let mut next = pos + dir;
        loop {
            match usize::try_from(next).ok().and_then(|i| items.get(i)) {
                None => return pos,
                Some(d) if d.is_visible() => break,
                Some(_) => next += dir,
            }
        }
        pos = next;
    }
    pos
}

impl Sheet {
    pub fn state(&self) -> SheetState {
        self.selection.state
    }

    /// The committed selection; the active cell alone in `Normal` state.
    pub fn range(&self) -> SheetRange {
        self.selection.range
    }

    pub fn active_cell(&self) -> CellPos {
        self.selection.active
    }

    pub fn selection_anchor(&self) -> CellPos {
        self.selection.anchor
    }

    pub fn selection_cursor(&self) -> CellPos {
        self.selection.cursor
    }

    pub fn previous_range(&self) -> SheetRange {
        self.selection.previous_range
    }

    pub fn drag_range(&self) -> SheetRange {
        self.selection.drag_range
    }

    /// Selection state of a single cell, for painters.
    pub fn cell_state(&self, row: i32, col: i32) -> CellState {
        if self.selection.state != SheetState::Normal && self.selection.range.contains(row, col) {
            CellState::Selected
        } else {
            CellState::Normal
        }
    }

    /// Make `pos` the active cell and open its editor.
    pub(crate) fn activate_cell(&mut self, pos: CellPos) {
        self.selection.active = pos;
        self.open_editor(pos);
        self.signals.activate(pos);
        self.invalidate_range(&SheetRange::cell(pos.row, pos.col));
    }

    /// Commit the editor text and drop the session. Returns `false` when vetoed.
    pub(crate) fn deactivate_cell(&mut self) -> bool {
        let Some(session) = self.editor.session() else {
            return true;
        };
        let pending = session.text();
        let editable = session.is_editable();
        let cell = self.editor.editing_cell();
        if !self.signals.deactivate(cell, &pending) {
            warn!(row = cell.row, col = cell.col, "deactivation vetoed");
            return false;
        }
        if editable {
            match apply_cell_edit(&mut self.grid, cell.row, cell.col, &pending) {
                Ok(true) => {
                    self.signals.changed(cell.row, cell.col);
                    self.invalidate_range(&SheetRange::cell(cell.row, cell.col));
                }
                Ok(false) => {}
                Err(err) => {
                    error!(%err, row = cell.row, col = cell.col, "committing editor text failed");
                    return false;
                }
            }
        }
        self.editor.discard();
        true
    }

    /// Drop any range and leave `pos` selected alone.
    fn collapse_selection(&mut self, pos: CellPos) {
        let old = self.selection.range;
        self.selection.state = SheetState::Normal;
        self.selection.range = SheetRange::cell(pos.row, pos.col);
        self.selection.anchor = pos;
        self.selection.cursor = pos;
        self.invalidate_range(&old);
    }

    /// Click on a cell, a whole row/column (`-1` for the other index) or the
    /// whole sheet (both negative).
    ///
    /// `traverse` is raised first with the cell that would become active. A
    /// redirect is honored for single-cell clicks only.
    /// Returns `false` when the click was out of range or vetoed.
    pub fn click_cell(&mut self, row: i32, col: i32) -> bool {
        if row > self.grid.max_row() || col > self.grid.max_col() {
            return false;
        }
        let from = self.selection.active;
        let mut to = CellPos::new(row.max(0), col.max(0));
        if !self.signals.traverse(from, &mut to) {
            warn!(row, col, "traverse vetoed");
            return false;
        }
        match (row < 0, col < 0) {
            (true, true) => return self.select_all(),
            (true, false) => return self.select_column(col),
            (false, true) => return self.select_row(row),
            (false, false) => {}
        }

        if !self.grid.contains(to.row, to.col) {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        self.collapse_selection(to);
        self.activate_cell(to);
        debug!(row = to.row, col = to.col, "activated cell");
        true
    }

    /// Select every cell; the active cell becomes (0, 0).
    pub fn select_all(&mut self) -> bool {
        let (maxrow, maxcol) = (self.grid.max_row(), self.grid.max_col());
        if maxrow < 0 || maxcol < 0 || !self.config.selection_mode.allows_ranges() {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        let range = SheetRange::new(0, 0, maxrow, maxcol);
        self.selection.state = SheetState::RangeSelected;
        self.selection.range = range;
        self.selection.anchor = range.upper_left();
        self.selection.cursor = range.lower_right();
        self.activate_cell(CellPos::new(0, 0));
        self.signals.select_range(&range);
        self.invalidate_all();
        debug!(%range, "selected all");
        true
    }

    /// Select the whole row; the active cell moves to its first column.
    pub fn select_row(&mut self, row: i32) -> bool {
        let maxcol = self.grid.max_col();
        if !self.grid.contains(row, 0) || !self.config.selection_mode.allows_lines() {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        let old = self.selection.range;
        self.selection.state = SheetState::RowSelected;
        self.selection.range = SheetRange::new(row, 0, row, maxcol);
        self.selection.anchor = CellPos::new(row, 0);
        self.selection.cursor = CellPos::new(row, maxcol);
        self.activate_cell(CellPos::new(row, 0));
        self.signals.select_row(row);
        self.invalidate_range(&old);
        self.invalidate_range(&SheetRange::new(row, 0, row, maxcol));
        debug!(row, "selected row");
        true
    }

    /// Select the whole column; the active cell moves to its first row.
    pub fn select_column(&mut self, col: i32) -> bool {
        let maxrow = self.grid.max_row();
        if !self.grid.contains(0, col) || !self.config.selection_mode.allows_lines() {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        let old = self.selection.range;
        self.selection.state = SheetState::ColumnSelected;
        self.selection.range = SheetRange::new(0, col, maxrow, col);
        self.selection.anchor = CellPos::new(0, col);
        self.selection.cursor = CellPos::new(maxrow, col);
        self.activate_cell(CellPos::new(0, col));
        self.signals.select_column(col);
        self.invalidate_range(&old);
        self.invalidate_range(&SheetRange::new(0, col, maxrow, col));
        debug!(col, "selected column");
        true
    }

    /// Select a rectangle, clamped to the sheet.
    ///
    /// The active cell moves to the upper-left corner if it lies outside.
    pub fn select_range(&mut self, range: &SheetRange) -> bool {
        let mut range = range.normalized();
        range.fixup(self.grid.max_row(), self.grid.max_col());
        if !range.is_set() {
            return false;
        }
        let single = range.row_count() == 1 && range.col_count() == 1;
        if !single && !self.config.selection_mode.allows_ranges() {
            return false;
        }
        if !range.contains_pos(self.selection.active) {
            if !self.deactivate_cell() {
                return false;
            }
            self.activate_cell(range.upper_left());
        }
        let old = self.selection.range;
        self.selection.state = SheetState::RangeSelected;
        self.selection.range = range;
        self.selection.anchor = range.upper_left();
        self.selection.cursor = range.lower_right();
        self.signals.select_range(&range);
        self.invalidate_range(&old);
        self.invalidate_range(&range);
        debug!(%range, "selected range");
        true
    }

    /// Drop the selection and keep only the active cell.
    pub fn unselect_range(&mut self) {
        if self.selection.state == SheetState::Normal {
            return;
        }
        let active = self.selection.active;
        self.collapse_selection(active);
        if !self.editor.is_editing() && self.grid.contains(active.row, active.col) {
            self.activate_cell(active);
        }
    }

    /// Move the active cell without raising `traverse`.
    ///
    /// Returns `false` when out of range or when deactivation is vetoed.
    pub fn set_active_cell(&mut self, row: i32, col: i32) -> bool {
        if !self.grid.contains(row, col) {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        let pos = CellPos::new(row, col);
        self.collapse_selection(pos);
        self.activate_cell(pos);
        self.scroll_into_view(pos);
        true
    }

    /// Move the selection cursor to `(row, col)`, keeping the anchor.
    ///
    /// Only outside `Normal` state. Whole-column selections keep covering every
    /// row, whole-row selections every column. Returns `false` when nothing changed.
    pub fn extend_selection(&mut self, row: i32, col: i32) -> bool {
        let (maxrow, maxcol) = (self.grid.max_row(), self.grid.max_col());
        if self.selection.state == SheetState::Normal
            || !self.config.selection_mode.allows_ranges()
            || maxrow < 0
            || maxcol < 0
        {
            return false;
        }
        let mut corner = CellPos::new(row.clamp(0, maxrow), col.clamp(0, maxcol));
        match self.selection.state {
            SheetState::ColumnSelected => corner.row = maxrow,
            SheetState::RowSelected => corner.col = maxcol,
            SheetState::Normal | SheetState::RangeSelected => {}
        }
        if corner == self.selection.cursor {
            return false;
        }
        let old = self.selection.range;
        self.selection.cursor = corner;
        self.selection.range = SheetRange::spanning(self.selection.anchor, corner);
        let new = self.selection.range;
        self.invalidate_range(&old.union(&new));
        trace!(%new, "extended selection");
        true
    }

    /// Keyboard navigation by `drows`/`dcols` visible entries.
    ///
    /// With `extend` the selection cursor moves and the anchor stays put;
    /// otherwise the active cell moves and any selection is dropped.
    pub fn move_cursor(&mut self, drows: i32, dcols: i32, extend: bool) -> bool {
        let extend = extend && self.config.selection_mode.allows_ranges();
        let from = if extend && self.selection.state != SheetState::Normal {
            self.selection.cursor
        } else {
            self.selection.active
        };
        if !from.is_set() {
            return false;
        }
        let row = step_visible(self.grid.rows(), from.row, drows);
        let col = step_visible(self.grid.columns(), from.col, dcols);

        if extend {
            if self.selection.state == SheetState::Normal {
                self.selection.state = SheetState::RangeSelected;
                self.selection.anchor = self.selection.active;
                self.selection.cursor = self.selection.active;
            }
            let moved = self.extend_selection(row, col);
            if moved {
                self.scroll_into_view(CellPos::new(row, col));
                let range = self.selection.range;
                self.signals.select_range(&range);
            } else if self.selection.range.row_count() == 1 && self.selection.range.col_count() == 1 {
                self.selection.state = SheetState::Normal;
            }
            return moved;
        }

        if self.selection.state == SheetState::Normal && CellPos::new(row, col) == from {
            return false;
        }
        let moved = self.click_cell(row, col);
        if moved {
            self.scroll_into_view(self.selection.active);
        }
        moved
    }

    // ---- Clip range ----

    /// Mark a range as clipped (e.g. after a copy).
    pub fn clip_range(&mut self, range: &SheetRange) {
        let mut range = range.normalized();
        range.fixup(self.grid.max_row(), self.grid.max_col());
        if !range.is_set() {
            return;
        }
        let old = self.selection.clip;
        self.selection.clip = range;
        self.signals.clip_range(&range);
        self.invalidate_range(&old);
        self.invalidate_range(&range);
    }

    pub fn unclip_range(&mut self) {
        let old = std::mem::replace(&mut self.selection.clip, SheetRange::UNSET);
        self.invalidate_range(&old);
    }

    pub fn in_clip(&self) -> bool {
        self.selection.clip.is_set()
    }

    pub fn clipped_range(&self) -> SheetRange {
        self.selection.clip
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::grid::RowDescriptor;

    #[test]
    fn test_step_visible_skips_hidden() {
        let mut rows: Vec<_> = (0..6).map(|_| RowDescriptor::new(20)).collect();
        rows[2].is_visible = false;
        rows[3].is_visible = false;
        assert_eq!(step_visible(&rows, 1, 1), 4);
        assert_eq!(step_visible(&rows, 4, -1), 1);
        assert_eq!(step_visible(&rows, 4, 5), 5);
        assert_eq!(step_visible(&rows, 0, -1), 0);
        assert_eq!(step_visible(&rows, 3, 0), 3);
    }

    #[test]
    fn test_remap_shifts_ranges_and_positions() {
        let mut state = SelectionState {
            active: CellPos::new(4, 1),
            range: SheetRange::new(2, 0, 6, 3),
            ..SelectionState::default()
        };
        state.remap(|r| if r >= 3 { r + 2 } else { r }, |c| c);
        assert_eq!(state.active, CellPos::new(6, 1));
        assert_eq!(state.range, SheetRange::new(2, 0, 8, 3));
        assert_eq!(state.clip, SheetRange::UNSET);
    }

    #[test]
    fn test_fixup_on_empty_sheet_unsets_everything() {
        let mut state = SelectionState {
            state: SheetState::RangeSelected,
            active: CellPos::new(1, 1),
            range: SheetRange::new(0, 0, 1, 1),
            ..SelectionState::default()
        };
        state.fixup(-1, 3);
        assert_eq!(state.active, CellPos::UNSET);
        assert_eq!(state.range, SheetRange::UNSET);
        assert_eq!(state.state, SheetState::Normal);
    }
}
