//! Notifications raised by the sheet.
//!
//! Every method has a default so hosts only implement what they observe.
//! `traverse` and `deactivate` are cancelable: returning `false` vetoes the
//! transition and the sheet rolls back.

use crate::types::{CellPos, SheetRange};

/// Host-side receiver for sheet notifications
#[allow(unused_variables)]
pub trait SheetSignals {
    /// The active cell is about to move from `from` to `to`.
    ///
    /// The handler may redirect the move by rewriting `to`; returning `false` vetoes it.
    fn traverse(&mut self, from: CellPos, to: &mut CellPos) -> bool {
        true
    }

    /// `cell` is about to lose the editor; `pending_text` is what will be committed.
    fn deactivate(&mut self, cell: CellPos, pending_text: &str) -> bool {
        true
    }

    /// `cell` became the active cell.
    fn activate(&mut self, cell: CellPos) {}

    fn select_row(&mut self, row: i32) {}

    fn select_column(&mut self, col: i32) {}

    /// A range selection was committed.
    fn select_range(&mut self, range: &SheetRange) {}

    /// A drag-move finished; the application decides what to do with the content.
    fn move_range(&mut self, old: &SheetRange, new: &SheetRange) {}

    /// A drag-resize finished.
    fn resize_range(&mut self, old: &SheetRange, new: &SheetRange) {}

    fn clip_range(&mut self, range: &SheetRange) {}

    /// Text of `(row, col)` changed.
    fn changed(&mut self, row: i32, col: i32) {}

    /// Contents of `(row, col)` were cleared.
    fn clear_cell(&mut self, row: i32, col: i32) {}

    fn new_column_width(&mut self, col: i32, width: i32) {}

    fn new_row_height(&mut self, row: i32, height: i32) {}
}

/// Handler that accepts everything and observes nothing
#[derive(Debug, Default)]
pub struct NoSignals;

impl SheetSignals for NoSignals {}
