//! Pointer event handlers for `Sheet`.
//!
//! A press classifies the pointer with [`Sheet::hit_test`] and starts at most
//! one [`Gesture`]; motion drives it; release commits it and always cancels
//! the autoscroll timer. Presses are ignored while a gesture is in flight.

use bitflags::bitflags;
use tracing::{debug, trace};

use super::Sheet;
use crate::layout::DRAG_WIDTH;
use crate::types::{CellPos, SheetRange, SheetState};

bitflags! {
    /// Keyboard modifiers held during a pointer press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
    }
}

/// The one pointer gesture in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Drag-extending a cell range
    Select,
    /// Drag over row titles extending a row selection
    SelectRows,
    /// Drag over column titles extending a column selection
    SelectColumns,
    /// Dragging a column title boundary
    ColumnResize { col: i32 },
    /// Dragging a row title boundary
    RowResize { row: i32 },
    /// Dragging the selection border
    Move,
    /// Dragging the selection corner handle
    Resize,
}

/// What lies under a widget pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A regular cell
    Cell(CellPos),
    /// Border of the committed range (starts a move)
    RangeBorder,
    /// Lower-right corner handle of the committed range (starts a resize)
    RangeCorner,
    /// A row title at the given row index
    RowTitle(i32),
    /// A column title at the given column index
    ColumnTitle(i32),
    /// Trailing boundary of a row title
    RowBoundary(i32),
    /// Trailing boundary of a column title
    ColumnBoundary(i32),
    /// The corner where the title areas meet
    Corner,
    /// Nothing (outside the widget or past the grid)
    None,
}

impl Sheet {
    pub fn gesture(&self) -> Gesture {
        self.selection.gesture
    }

    /// Classify a widget pixel.
    pub fn hit_test(&self, x: i32, y: i32) -> HitTarget {
        if x < 0 || y < 0 || x >= self.viewport.width || y >= self.viewport.height {
            return HitTarget::None;
        }
        let title_w = self.layout.header_width();
        let title_h = self.layout.header_height();
        let (sx, sy) = self.viewport.to_sheet(x, y, &self.layout);

        if x < title_w && y < title_h {
            return HitTarget::Corner;
        }
        if y < title_h {
            if self.config.columns_resizable {
                if let Some(col) = self.layout.column_resize_handle(sx) {
                    return HitTarget::ColumnBoundary(col);
                }
            }
            let col = self.layout.col_at_x(sx);
            return if col <= self.grid.max_col() {
                HitTarget::ColumnTitle(col)
            } else {
                HitTarget::None
            };
        }
        if x < title_w {
            if self.config.rows_resizable {
                if let Some(row) = self.layout.row_resize_handle(sy) {
                    return HitTarget::RowBoundary(row);
                }
            }
            let row = self.layout.row_at_y(sy);
            return if row <= self.grid.max_row() {
                HitTarget::RowTitle(row)
            } else {
                HitTarget::None
            };
        }

        let pos = CellPos::new(self.layout.row_at_y(sy), self.layout.col_at_x(sx));
        if let Some(target) = self.range_handle_at(sx, sy) {
            return target;
        }
        if self.grid.contains(pos.row, pos.col) {
            HitTarget::Cell(pos)
        } else {
            HitTarget::None
        }
    }

    /// Corner handle or border of the committed range under a cell-area pixel.
    fn range_handle_at(&self, sx: i32, sy: i32) -> Option<HitTarget> {
        if self.config.locked {
            return None;
        }
        let rect = self.layout.range_rect(&self.selection.range)?;
        let half = DRAG_WIDTH / 2;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;
        let near = |p: i32, edge: i32| (p - edge).abs() <= half;

        if near(sx, right) && near(sy, bottom) {
            return self
                .config
                .selection_mode
                .allows_ranges()
                .then_some(HitTarget::RangeCorner);
        }
        let in_rows = sy >= rect.y - half && sy <= bottom + half;
        let in_cols = sx >= rect.x - half && sx <= right + half;
        let on_border = (in_rows && (near(sx, rect.x) || near(sx, right)))
            || (in_cols && (near(sy, rect.y) || near(sy, bottom)));
        on_border.then_some(HitTarget::RangeBorder)
    }

    /// Logical cell under a widget pixel, clamped into the sheet.
    fn clamped_cell_at(&self, x: i32, y: i32) -> CellPos {
        let (sx, sy) = self.viewport.to_sheet(x, y, &self.layout);
        CellPos::new(
            self.layout.row_at_y(sy).clamp(0, self.grid.max_row().max(0)),
            self.layout.col_at_x(sx).clamp(0, self.grid.max_col().max(0)),
        )
    }

    /// Pointer pressed at widget `(x, y)`. Returns whether the press was handled.
    pub fn button_press(&mut self, x: i32, y: i32, modifiers: Modifiers) -> bool {
        if self.selection.gesture != Gesture::Idle || !self.is_sensitive {
            return false;
        }
        self.selection.pointer = (x, y);
        let shift = modifiers.contains(Modifiers::SHIFT);
        let ranges = self.config.selection_mode.allows_ranges();

        match self.hit_test(x, y) {
            HitTarget::None => false,
            HitTarget::Corner => self.click_cell(-1, -1),
            HitTarget::ColumnBoundary(col) => {
                self.begin_gesture(Gesture::ColumnResize { col });
                true
            }
            HitTarget::RowBoundary(row) => {
                self.begin_gesture(Gesture::RowResize { row });
                true
            }
            HitTarget::ColumnTitle(col) => {
                if !self.column_sensitive(col) {
                    return false;
                }
                let handled = if shift && ranges && self.selection.state == SheetState::ColumnSelected {
                    self.extend_selection(self.grid.max_row(), col);
                    true
                } else {
                    self.click_cell(-1, col)
                };
                if handled && ranges {
                    self.begin_gesture(Gesture::SelectColumns);
                }
                handled
            }
            HitTarget::RowTitle(row) => {
                if !self.row_sensitive(row) {
                    return false;
                }
                let handled = if shift && ranges && self.selection.state == SheetState::RowSelected {
                    self.extend_selection(row, self.grid.max_col());
                    true
                } else {
                    self.click_cell(row, -1)
                };
                if handled && ranges {
                    self.begin_gesture(Gesture::SelectRows);
                }
                handled
            }
            HitTarget::RangeCorner => {
                self.selection.drag_range = self.selection.range;
                self.begin_gesture(Gesture::Resize);
                true
            }
            HitTarget::RangeBorder => {
                self.selection.drag_origin = self.clamped_cell_at(x, y);
                self.selection.drag_range = self.selection.range;
                self.begin_gesture(Gesture::Move);
                true
            }
            HitTarget::Cell(pos) => {
                if shift && ranges && self.selection.active.is_set() {
                    if self.selection.state == SheetState::Normal {
                        self.selection.state = SheetState::RangeSelected;
                        self.selection.anchor = self.selection.active;
                        self.selection.cursor = self.selection.active;
                    }
                    self.extend_selection(pos.row, pos.col);
                    self.begin_gesture(Gesture::Select);
                    return true;
                }
                let handled = self.click_cell(pos.row, pos.col);
                if handled && ranges {
                    self.begin_gesture(Gesture::Select);
                }
                handled
            }
        }
    }

    fn begin_gesture(&mut self, gesture: Gesture) {
        debug!(?gesture, "gesture started");
        self.selection.gesture = gesture;
        if !matches!(gesture, Gesture::ColumnResize { .. } | Gesture::RowResize { .. }) {
            self.start_autoscroll();
        }
    }

    /// Pointer moved to widget `(x, y)`. Returns whether anything changed.
    pub fn motion(&mut self, x: i32, y: i32) -> bool {
        self.selection.pointer = (x, y);
        let gesture = self.selection.gesture;
        trace!(x, y, ?gesture, "motion");
        match gesture {
            Gesture::Idle => false,
            Gesture::Select => {
                let pos = self.clamped_cell_at(x, y);
                if self.selection.state == SheetState::Normal {
                    if pos == self.selection.active {
                        return false;
                    }
                    self.selection.state = SheetState::RangeSelected;
                    self.selection.anchor = self.selection.active;
                    self.selection.cursor = self.selection.active;
                }
                self.extend_selection(pos.row, pos.col)
            }
            Gesture::SelectRows => {
                let pos = self.clamped_cell_at(x, y);
                self.extend_selection(pos.row, self.grid.max_col())
            }
            Gesture::SelectColumns => {
                let pos = self.clamped_cell_at(x, y);
                self.extend_selection(self.grid.max_row(), pos.col)
            }
            Gesture::ColumnResize { col } => {
                let (sx, _) = self.viewport.to_sheet(x, y, &self.layout);
                let Some(left) = self.layout.col_left(col) else {
                    return false;
                };
                self.apply_column_width(col, sx - left)
            }
            Gesture::RowResize { row } => {
                let (_, sy) = self.viewport.to_sheet(x, y, &self.layout);
                let Some(top) = self.layout.row_top(row) else {
                    return false;
                };
                self.apply_row_height(row, sy - top)
            }
            Gesture::Move => self.drag_move(x, y),
            Gesture::Resize => self.drag_resize(x, y),
        }
    }

    /// Preview the committed range shifted by the pointer's cell delta.
    fn drag_move(&mut self, x: i32, y: i32) -> bool {
        let range = self.selection.range;
        if !range.is_set() {
            return false;
        }
        let pos = self.clamped_cell_at(x, y);
        let origin = self.selection.drag_origin;
        let (maxrow, maxcol) = (self.grid.max_row(), self.grid.max_col());
        // keep the whole range inside the sheet
        let drow = (pos.row - origin.row).max(-range.row0).min(maxrow - range.rowi);
        let dcol = (pos.col - origin.col).max(-range.col0).min(maxcol - range.coli);
        self.set_drag_range(range.translated(drow, dcol))
    }

    /// Preview the committed range with its dragged border moved.
    ///
    /// Only the border along the dominant axis moves, and only once the pointer
    /// passes the middle of the next cell. Column selections only widen or
    /// narrow; row selections only grow or shrink vertically.
    fn drag_resize(&mut self, x: i32, y: i32) -> bool {
        let range = self.selection.range;
        let Some(rect) = self.layout.range_rect(&range) else {
            return false;
        };
        let (sx, sy) = self.viewport.to_sheet(x, y, &self.layout);
        let dx = (sx - (rect.x + rect.width)).abs();
        let dy = (sy - (rect.y + rect.height)).abs();
        let horizontal = match self.selection.state {
            SheetState::ColumnSelected => true,
            SheetState::RowSelected => false,
            SheetState::Normal | SheetState::RangeSelected => dx >= dy,
        };

        let mut target = range;
        if horizontal {
            let col = self.layout.col_at_x(sx).clamp(0, self.grid.max_col());
            let mid = self.layout.col_left(col).unwrap_or(0) + self.layout.col_width(col) / 2;
            let col = if sx < mid { col - 1 } else { col };
            target.coli = col.max(range.col0);
        } else {
            let row = self.layout.row_at_y(sy).clamp(0, self.grid.max_row());
            let mid = self.layout.row_top(row).unwrap_or(0) + self.layout.row_height(row) / 2;
            let row = if sy < mid { row - 1 } else { row };
            target.rowi = row.max(range.row0);
        }
        self.set_drag_range(target)
    }

    fn set_drag_range(&mut self, range: SheetRange) -> bool {
        if range == self.selection.drag_range {
            return false;
        }
        let old = std::mem::replace(&mut self.selection.drag_range, range);
        self.invalidate_range(&old.union(&range));
        true
    }

    /// Pointer released at widget `(x, y)`: commit the gesture in flight.
    pub fn button_release(&mut self, x: i32, y: i32) -> bool {
        self.stop_autoscroll();
        self.selection.pointer = (x, y);
        let gesture = std::mem::take(&mut self.selection.gesture);
        match gesture {
            Gesture::Idle => false,
            Gesture::Select | Gesture::SelectRows | Gesture::SelectColumns => {
                if self.selection.state != SheetState::Normal {
                    let range = self.selection.range;
                    self.signals.select_range(&range);
                    debug!(%range, "selection committed");
                }
                true
            }
            Gesture::ColumnResize { col } => {
                let width = self.grid.column(col).map_or(0, |c| c.width);
                self.signals.new_column_width(col, width);
                true
            }
            Gesture::RowResize { row } => {
                let height = self.grid.row(row).map_or(0, |r| r.height);
                self.signals.new_row_height(row, height);
                true
            }
            Gesture::Move => self.finish_move(),
            Gesture::Resize => self.finish_resize(),
        }
    }

    fn finish_move(&mut self) -> bool {
        let old = self.selection.range;
        let new = std::mem::replace(&mut self.selection.drag_range, SheetRange::UNSET);
        self.selection.drag_origin = CellPos::UNSET;
        self.invalidate_range(&old.union(&new));
        if !new.is_set() || new == old {
            return false;
        }
        if !self.deactivate_cell() {
            return false;
        }
        let (drow, dcol) = (new.row0 - old.row0, new.col0 - old.col0);
        let active = self.selection.active;
        self.selection.previous_range = old;
        self.selection.range = new;
        self.selection.anchor = CellPos::new(self.selection.anchor.row + drow, self.selection.anchor.col + dcol);
        self.selection.cursor = CellPos::new(self.selection.cursor.row + drow, self.selection.cursor.col + dcol);
        self.activate_cell(CellPos::new(active.row + drow, active.col + dcol));
        self.signals.move_range(&old, &new);
        debug!(%old, %new, "moved range");
        true
    }

    fn finish_resize(&mut self) -> bool {
        let old = self.selection.range;
        let new = std::mem::replace(&mut self.selection.drag_range, SheetRange::UNSET);
        self.invalidate_range(&old.union(&new));
        if !new.is_set() || new == old {
            return false;
        }
        self.selection.previous_range = old;
        if self.selection.state == SheetState::Normal {
            self.selection.state = SheetState::RangeSelected;
        }
        self.selection.range = new;
        self.selection.anchor = new.upper_left();
        self.selection.cursor = new.lower_right();
        self.signals.resize_range(&old, &new);
        debug!(%old, %new, "resized range");
        true
    }
}
