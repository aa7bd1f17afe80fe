//! Selection state machine tests
//!
//! Active cell activation, row/column/range selection, extension, keyboard
//! navigation, vetoes, selection modes and the clip range.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{Harness, Signal};
use gridsheet::{CellPos, CellState, SelectionMode, Sheet, SheetRange, SheetState};
use test_case::test_case;

// ============================================================================
// Activation
// ============================================================================

#[test]
fn test_new_sheet_activates_origin() {
    let sheet = Sheet::new(10, 5, None).unwrap();
    assert_eq!(sheet.active_cell(), CellPos::new(0, 0));
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.range(), SheetRange::cell(0, 0));
    assert!(sheet.is_editing());
}

#[test]
fn test_click_cell_signal_order() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    assert!(sheet.click_cell(3, 2));
    assert_eq!(h.signals.borrow_mut().take(), vec![
        Signal::Traverse(CellPos::new(0, 0), CellPos::new(3, 2)),
        Signal::Deactivate(CellPos::new(0, 0), String::new()),
        Signal::Activate(CellPos::new(3, 2)),
    ]);
    assert_eq!(sheet.range(), SheetRange::cell(3, 2));
    assert_eq!(sheet.selection_anchor(), CellPos::new(3, 2));
}

#[test]
fn test_click_commits_editor_text() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    sheet.click_cell(1, 1);
    sheet.set_entry_text("hello");
    assert_eq!(sheet.entry_text().as_deref(), Some("hello"));

    sheet.click_cell(2, 2);

    assert_eq!(sheet.cell_text(1, 1), Some("hello"));
    assert_eq!(h.signals.borrow().count(|s| *s == Signal::Changed(1, 1)), 1);
    // the new session is preloaded with the new cell's text
    assert_eq!(sheet.entry_text().as_deref(), Some(""));
}

#[test]
fn test_activation_preloads_text() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    sheet.set_cell_text(4, 4, "stored").unwrap();
    sheet.click_cell(4, 4);
    assert_eq!(sheet.entry_text().as_deref(), Some("stored"));
}

#[test]
fn test_click_out_of_range() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(!sheet.click_cell(10, 0));
    assert!(!sheet.click_cell(0, 5));
    assert_eq!(sheet.active_cell(), CellPos::new(0, 0));
}

#[test]
fn test_traverse_veto_keeps_previous_cell() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    h.signals.borrow_mut().veto_traverse = true;

    assert!(!sheet.click_cell(3, 3));
    assert_eq!(sheet.active_cell(), CellPos::new(0, 0));
    assert_eq!(h.signals.borrow().count(|s| matches!(s, Signal::Deactivate(..))), 0);
}

#[test]
fn test_traverse_can_redirect() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    h.signals.borrow_mut().redirect = Some(CellPos::new(4, 4));

    assert!(sheet.click_cell(1, 1));
    assert_eq!(sheet.active_cell(), CellPos::new(4, 4));
}

#[test_case(-1, 2, CellPos::new(0, 2) ; "whole column")]
#[test_case(3, -1, CellPos::new(3, 0) ; "whole row")]
#[test_case(-1, -1, CellPos::new(0, 0) ; "whole sheet")]
fn test_traverse_veto_blocks_line_selection(row: i32, col: i32, target: CellPos) {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    sheet.click_cell(1, 1);
    h.signals.borrow_mut().take();
    h.signals.borrow_mut().veto_traverse = true;

    assert!(!sheet.click_cell(row, col));
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.range(), SheetRange::cell(1, 1));
    assert_eq!(sheet.active_cell(), CellPos::new(1, 1));
    assert_eq!(h.signals.borrow_mut().take(), vec![Signal::Traverse(
        CellPos::new(1, 1),
        target
    )]);
}

#[test]
fn test_column_title_press_raises_traverse() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    h.signals.borrow_mut().veto_traverse = true;
    // column title of column 2
    assert!(!sheet.button_press(260, 10, gridsheet::Modifiers::empty()));
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.gesture(), gridsheet::Gesture::Idle);
}

#[test]
fn test_deactivate_veto_aborts_transition() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    sheet.click_cell(1, 1);
    sheet.set_entry_text("draft");
    h.signals.borrow_mut().veto_deactivate = true;

    assert!(!sheet.click_cell(2, 2));
    assert!(!sheet.select_row(5));
    assert!(!sheet.set_active_cell(3, 3));

    assert_eq!(sheet.active_cell(), CellPos::new(1, 1));
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.cell_text(1, 1), None);
    assert_eq!(sheet.entry_text().as_deref(), Some("draft"));
}

#[test]
fn test_set_active_cell_skips_traverse_and_scrolls() {
    let h = Harness::new(100, 5);
    let mut sheet = h.sheet;
    assert!(sheet.set_active_cell(50, 1));
    assert_eq!(
        h.signals.borrow().count(|s| matches!(s, Signal::Traverse(..))),
        0
    );
    assert_eq!(sheet.active_cell(), CellPos::new(50, 1));
    assert!(sheet.visible_range().contains(50, 1));
    assert!(!sheet.set_active_cell(100, 0));
}

// ============================================================================
// Rows, columns and ranges
// ============================================================================

#[test]
fn test_select_column_then_click_cell() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    assert!(sheet.select_column(1));
    assert_eq!(sheet.state(), SheetState::ColumnSelected);
    assert_eq!(sheet.range(), SheetRange::new(0, 1, sheet.max_row(), 1));
    assert_eq!(sheet.active_cell(), CellPos::new(0, 1));
    assert!(h.signals.borrow_mut().take().contains(&Signal::SelectColumn(1)));

    assert!(sheet.click_cell(3, 3));
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.active_cell(), CellPos::new(3, 3));
    assert_eq!(sheet.range(), SheetRange::cell(3, 3));
}

#[test]
fn test_select_row() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    assert!(sheet.select_row(4));
    assert_eq!(sheet.state(), SheetState::RowSelected);
    assert_eq!(sheet.range(), SheetRange::new(4, 0, 4, 4));
    assert_eq!(sheet.active_cell(), CellPos::new(4, 0));
    assert!(h.signals.borrow_mut().take().contains(&Signal::SelectRow(4)));
    assert!(!sheet.select_row(10));
}

#[test_case(-1, -1, SheetState::RangeSelected, SheetRange::new(0, 0, 9, 4) ; "whole sheet")]
#[test_case(-1, 2, SheetState::ColumnSelected, SheetRange::new(0, 2, 9, 2) ; "whole column")]
#[test_case(6, -1, SheetState::RowSelected, SheetRange::new(6, 0, 6, 4) ; "whole row")]
fn test_click_with_unset_index(row: i32, col: i32, state: SheetState, range: SheetRange) {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(sheet.click_cell(row, col));
    assert_eq!(sheet.state(), state);
    assert_eq!(sheet.range(), range);
}

#[test]
fn test_select_range_moves_active_cell_only_when_outside() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.click_cell(3, 3);
    assert!(sheet.select_range(&SheetRange::new(2, 2, 5, 5)));
    assert_eq!(sheet.active_cell(), CellPos::new(3, 3));

    assert!(sheet.select_range(&SheetRange::new(6, 6, 8, 8)));
    assert_eq!(sheet.active_cell(), CellPos::new(6, 6));
    assert_eq!(sheet.selection_anchor(), CellPos::new(6, 6));
    assert_eq!(sheet.selection_cursor(), CellPos::new(8, 8));
}

#[test]
fn test_select_range_normalizes_and_clamps() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert!(sheet.select_range(&SheetRange::new(12, 8, 7, 3)));
    assert_eq!(sheet.range(), SheetRange::new(7, 3, 9, 8));
}

#[test]
fn test_unselect_range_keeps_active_cell() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.select_range(&SheetRange::new(1, 1, 4, 4));
    sheet.unselect_range();
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.range(), SheetRange::cell(1, 1));
    assert!(sheet.is_editing());
}

#[test]
fn test_cell_state() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert_eq!(sheet.cell_state(0, 0), CellState::Normal);
    sheet.select_range(&SheetRange::new(1, 1, 2, 2));
    assert_eq!(sheet.cell_state(2, 2), CellState::Selected);
    assert_eq!(sheet.cell_state(3, 3), CellState::Normal);
}

// ============================================================================
// Extension
// ============================================================================

#[test_case(9, 9 ; "down right")]
#[test_case(0, 0 ; "up left")]
#[test_case(5, 0 ; "same row")]
#[test_case(20, -3 ; "clamped into the sheet")]
fn test_extend_contains_anchor_and_corner(row: i32, col: i32) {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.select_range(&SheetRange::cell(5, 5));
    let anchor = sheet.selection_anchor();

    assert!(sheet.extend_selection(row, col));

    let corner = CellPos::new(row.clamp(0, 9), col.clamp(0, 9));
    let range = sheet.range();
    assert!(range.contains_pos(anchor));
    assert!(range.contains_pos(corner));
    assert_eq!(range, SheetRange::spanning(anchor, corner));
    assert_eq!(sheet.selection_cursor(), corner);
}

#[test]
fn test_extend_is_noop_in_normal_state_or_same_corner() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert!(!sheet.extend_selection(4, 4));

    sheet.select_range(&SheetRange::new(1, 1, 3, 3));
    assert!(!sheet.extend_selection(3, 3));
}

#[test]
fn test_extend_column_selection_keeps_whole_columns() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.select_column(1);
    assert!(sheet.extend_selection(3, 4));
    assert_eq!(sheet.range(), SheetRange::new(0, 1, 9, 4));
    assert_eq!(sheet.state(), SheetState::ColumnSelected);
}

// ============================================================================
// Keyboard navigation
// ============================================================================

#[test]
fn test_move_cursor_moves_active_cell() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert!(sheet.move_cursor(2, 1, false));
    assert_eq!(sheet.active_cell(), CellPos::new(2, 1));
    assert!(sheet.move_cursor(0, -5, false));
    assert_eq!(sheet.active_cell(), CellPos::new(2, 0));
}

#[test]
fn test_move_cursor_stops_at_edges() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert!(!sheet.move_cursor(-1, 0, false));
    assert!(!sheet.move_cursor(0, -1, false));
    assert_eq!(sheet.active_cell(), CellPos::new(0, 0));
}

#[test]
fn test_move_cursor_skips_hidden_rows() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.set_row_visible(1, false);
    sheet.set_row_visible(2, false);
    assert!(sheet.move_cursor(1, 0, false));
    assert_eq!(sheet.active_cell(), CellPos::new(3, 0));
}

#[test]
fn test_move_cursor_extend() {
    let h = Harness::new(10, 10);
    let mut sheet = h.sheet;
    assert!(sheet.move_cursor(1, 1, true));
    assert!(sheet.move_cursor(1, 0, true));
    assert_eq!(sheet.state(), SheetState::RangeSelected);
    assert_eq!(sheet.range(), SheetRange::new(0, 0, 2, 1));
    assert_eq!(sheet.active_cell(), CellPos::new(0, 0));
    assert_eq!(
        h.signals.borrow().count(|s| matches!(s, Signal::SelectRange(_))),
        2
    );
}

// ============================================================================
// Selection modes
// ============================================================================

#[test]
fn test_single_mode_disallows_ranges() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.set_selection_mode(SelectionMode::Single);

    assert!(!sheet.select_range(&SheetRange::new(0, 0, 2, 2)));
    assert!(!sheet.select_all());
    assert!(sheet.select_row(3));
    assert!(!sheet.extend_selection(5, 5));
    assert!(sheet.select_range(&SheetRange::cell(4, 4)));
}

#[test]
fn test_none_mode_disallows_lines() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.set_selection_mode(SelectionMode::None);
    assert!(!sheet.select_row(3));
    assert!(!sheet.select_column(3));
    assert!(sheet.click_cell(3, 3));
}

#[test]
fn test_switching_mode_drops_unsupported_selection() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.select_range(&SheetRange::new(1, 1, 4, 4));
    sheet.set_selection_mode(SelectionMode::Single);
    assert_eq!(sheet.state(), SheetState::Normal);
    assert_eq!(sheet.range(), SheetRange::cell(1, 1));

    sheet.select_row(2);
    sheet.set_selection_mode(SelectionMode::Browse);
    assert_eq!(sheet.state(), SheetState::RowSelected);
}

// ============================================================================
// Clip range
// ============================================================================

#[test]
fn test_clip_range() {
    let h = Harness::new(10, 10);
    let mut sheet = h.sheet;
    assert!(!sheet.in_clip());

    sheet.clip_range(&SheetRange::new(3, 3, 1, 1));
    assert!(sheet.in_clip());
    assert_eq!(sheet.clipped_range(), SheetRange::new(1, 1, 3, 3));
    assert!(h
        .signals
        .borrow_mut()
        .take()
        .contains(&Signal::ClipRange(SheetRange::new(1, 1, 3, 3))));

    sheet.unclip_range();
    assert!(!sheet.in_clip());
}

// ============================================================================
// Editability
// ============================================================================

#[test]
fn test_locked_sheet_does_not_commit() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.set_locked(true);
    assert!(!sheet.entry_editable());

    sheet.set_entry_text("ignored");
    sheet.click_cell(1, 1);
    assert_eq!(sheet.cell_text(0, 0), None);

    sheet.set_locked(false);
    assert!(sheet.entry_editable());
}

#[test]
fn test_readonly_column_supersedes_cell_editability() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet
        .range_set_editable(Some(&SheetRange::new(0, 0, 9, 0)), true)
        .unwrap();
    sheet.set_column_readonly(0, true);
    assert!(!sheet.entry_editable());
    assert!(!sheet.attributes(5, 0).unwrap().0.is_editable);

    sheet.click_cell(0, 1);
    assert!(sheet.entry_editable());
}

#[test]
fn test_non_editable_range_updates_open_session() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    sheet.click_cell(2, 2);
    sheet
        .range_set_editable(Some(&SheetRange::new(0, 0, 3, 3)), false)
        .unwrap();
    assert!(!sheet.entry_editable());
}
