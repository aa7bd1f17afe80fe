//! Cell storage and structural edit tests
//!
//! Covers lazy allocation, clear vs delete, links and tooltips, and row/column
//! insertion and deletion seen through the public sheet API.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{center, Harness, Signal};
use gridsheet::{CellLink, CellPos, Sheet, SheetRange, SheetState};
use test_case::test_case;

// ============================================================================
// Helpers
// ============================================================================

/// Every (row, col, text) of the sheet, row-major.
fn contents(sheet: &Sheet) -> Vec<(i32, i32, String)> {
    let mut out: Vec<_> = sheet
        .grid()
        .iter_cells()
        .filter_map(|c| c.text.clone().map(|t| (c.row, c.col, t)))
        .collect();
    out.sort();
    out
}

fn row_heights(sheet: &Sheet) -> Vec<i32> {
    (0..sheet.rows_count())
        .map(|r| sheet.row_height(r).unwrap())
        .collect()
}

fn column_widths(sheet: &Sheet) -> Vec<i32> {
    (0..sheet.columns_count())
        .map(|c| sheet.column_width(c).unwrap())
        .collect()
}

/// 10x5 sheet with a few scattered cells and non-default sizes
fn sample_sheet() -> Sheet {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    sheet.set_cell_text(0, 0, "a").unwrap();
    sheet.set_cell_text(2, 3, "b").unwrap();
    sheet.set_cell_text(7, 4, "c").unwrap();
    sheet.set_cell_text(9, 1, "d").unwrap();
    sheet.set_row_height(4, 40);
    sheet.set_row_height(8, 31);
    sheet.set_column_width(1, 120);
    sheet.set_column_width(3, 55);
    sheet
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn test_new_sheet_allocates_nothing() {
    let sheet = Sheet::new(10, 5, None).unwrap();
    assert_eq!(sheet.rows_count(), 10);
    assert_eq!(sheet.columns_count(), 5);
    assert_eq!(sheet.max_alloc_row(), -1);
    assert_eq!(sheet.max_alloc_col(), -1);
    assert_eq!(sheet.grid().allocated_cells(), 0);
}

#[test]
fn test_write_grows_allocation_within_logical_bounds() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(sheet.set_cell_text(3, 2, "x").unwrap());
    assert_eq!(sheet.max_alloc_row(), 3);
    assert_eq!(sheet.max_alloc_col(), 2);
    assert!(sheet.max_alloc_row() <= sheet.max_row());
    assert!(sheet.max_alloc_col() <= sheet.max_col());
    assert_eq!(sheet.cell_text(3, 2), Some("x"));
}

#[test_case(-1, 0 ; "negative row")]
#[test_case(0, -1 ; "negative column")]
#[test_case(10, 0 ; "row past the end")]
#[test_case(0, 5 ; "column past the end")]
fn test_out_of_range_write_is_ignored(row: i32, col: i32) {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(!sheet.set_cell_text(row, col, "x").unwrap());
    assert_eq!(sheet.grid().allocated_cells(), 0);
    assert_eq!(sheet.cell_text(row, col), None);
}

#[test]
fn test_growth_keeps_existing_records() {
    let mut sheet = Sheet::new(50, 20, None).unwrap();
    let link = CellLink::new(42_u32);
    sheet.set_cell_text(0, 0, "keep").unwrap();
    sheet.link_cell(0, 0, link.clone()).unwrap();

    sheet.set_cell_text(49, 19, "far").unwrap();

    assert_eq!(sheet.cell_text(0, 0), Some("keep"));
    assert!(sheet.link(0, 0).unwrap().ptr_eq(&link));
    let cell = sheet.grid().cell(0, 0).unwrap();
    assert_eq!((cell.row, cell.col), (0, 0));
}

#[test]
fn test_unchanged_text_reports_no_change() {
    let h = Harness::new(5, 5);
    let mut sheet = h.sheet;
    assert!(sheet.set_cell_text(1, 1, "x").unwrap());
    assert!(!sheet.set_cell_text(1, 1, "x").unwrap());
    assert_eq!(
        h.signals.borrow().count(|s| *s == Signal::Changed(1, 1)),
        1
    );
}

// ============================================================================
// Clear and delete
// ============================================================================

#[test]
fn test_clear_keeps_slot_delete_frees_it() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    sheet.set_cell_text(1, 1, "one").unwrap();
    sheet.set_cell_text(2, 2, "two").unwrap();

    assert!(sheet.clear_cell(1, 1));
    assert!(sheet.grid().cell(1, 1).is_some());
    assert_eq!(sheet.cell_text(1, 1), None);

    assert!(sheet.delete_cell(2, 2));
    assert!(sheet.grid().cell(2, 2).is_none());

    // nothing left to clear or delete
    assert!(!sheet.delete_cell(2, 2));
    assert!(!sheet.clear_cell(3, 3));
}

#[test]
fn test_clear_releases_everything() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    sheet.set_cell_text(1, 1, "x").unwrap();
    sheet.link_cell(1, 1, CellLink::new("data")).unwrap();
    sheet.set_cell_tooltip_text(1, 1, Some("tip")).unwrap();
    sheet
        .range_set_editable(Some(&SheetRange::cell(1, 1)), false)
        .unwrap();

    sheet.clear_cell(1, 1);

    assert!(sheet.link(1, 1).is_none());
    assert_eq!(sheet.cell_tooltip_text(1, 1), None);
    let (attrs, allocated) = sheet.attributes(1, 1).unwrap();
    assert!(allocated);
    assert!(attrs.is_editable);
}

#[test]
fn test_clear_signals() {
    let h = Harness::new(5, 5);
    let mut sheet = h.sheet;
    sheet.set_cell_text(1, 1, "x").unwrap();
    h.signals.borrow_mut().take();

    sheet.clear_cell(1, 1);
    sheet.delete_cell(1, 1);
    assert_eq!(h.signals.borrow_mut().take(), vec![
        Signal::ClearCell(1, 1),
        Signal::ClearCell(1, 1)
    ]);
}

#[test]
fn test_range_clear_and_delete() {
    let mut sheet = Sheet::new(6, 6, None).unwrap();
    for r in 0..4 {
        for c in 0..4 {
            sheet.set_cell_text(r, c, "v").unwrap();
        }
    }
    assert_eq!(sheet.range_clear(Some(&SheetRange::new(0, 0, 1, 1))), 4);
    assert_eq!(sheet.grid().allocated_cells(), 16);

    assert_eq!(sheet.range_delete(Some(&SheetRange::new(2, 2, 3, 3))), 4);
    assert_eq!(sheet.grid().allocated_cells(), 12);

    // whole sheet
    assert_eq!(sheet.range_delete(None), 12);
    assert_eq!(sheet.grid().allocated_cells(), 0);
}

#[test]
fn test_range_clear_clamps_malformed_range() {
    let mut sheet = Sheet::new(3, 3, None).unwrap();
    sheet.set_cell_text(2, 2, "x").unwrap();
    // reversed and oversized
    assert_eq!(sheet.range_clear(Some(&SheetRange::new(40, 40, 1, 1))), 1);
    assert_eq!(sheet.cell_text(2, 2), None);
}

// ============================================================================
// Links and tooltips
// ============================================================================

#[test]
fn test_links() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    assert!(sheet.link_cell(1, 2, CellLink::new(7_i64)).unwrap());
    assert_eq!(sheet.link(1, 2).unwrap().downcast_ref::<i64>(), Some(&7));
    assert!(sheet.remove_link(1, 2));
    assert!(!sheet.remove_link(1, 2));
    assert!(!sheet.link_cell(9, 9, CellLink::new(0_u8)).unwrap());
}

#[test]
fn test_delete_cell_links_counts_removed() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    sheet.link_cell(0, 0, CellLink::new(1_u8)).unwrap();
    sheet.link_cell(1, 1, CellLink::new(2_u8)).unwrap();
    sheet.link_cell(4, 4, CellLink::new(3_u8)).unwrap();
    sheet.set_cell_text(1, 0, "no link").unwrap();

    assert_eq!(sheet.delete_cell_links(&SheetRange::new(0, 0, 2, 2)), 2);
    assert!(sheet.link(4, 4).is_some());
    assert_eq!(sheet.cell_text(1, 0), Some("no link"));
}

#[test]
fn test_removing_tooltip_never_allocates() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    assert!(!sheet.set_cell_tooltip_text(2, 2, None).unwrap());
    assert!(!sheet.set_cell_tooltip_markup(2, 2, None).unwrap());
    assert_eq!(sheet.grid().allocated_cells(), 0);

    assert!(sheet.set_cell_tooltip_markup(2, 2, Some("<b>hi</b>")).unwrap());
    assert_eq!(sheet.cell_tooltip_markup(2, 2), Some("<b>hi</b>"));
    assert!(sheet.set_cell_tooltip_markup(2, 2, None).unwrap());
    assert_eq!(sheet.cell_tooltip_markup(2, 2), None);
}

#[test]
fn test_row_and_column_tooltips() {
    let mut sheet = Sheet::new(5, 5, None).unwrap();
    sheet.set_row_tooltip_text(1, Some("row tip"));
    sheet.set_column_tooltip_markup(2, Some("<i>col</i>"));
    assert_eq!(sheet.row_tooltip_text(1), Some("row tip"));
    assert_eq!(sheet.column_tooltip_markup(2), Some("<i>col</i>"));
    assert_eq!(sheet.row_tooltip_markup(1), None);
}

// ============================================================================
// Structural edits
// ============================================================================

#[test_case(0, 1 ; "one row at the top")]
#[test_case(3, 2 ; "inside the allocated block")]
#[test_case(5, 5 ; "large band")]
#[test_case(10, 3 ; "append")]
fn test_insert_then_delete_rows_restores_sheet(pos: i32, n: usize) {
    let mut sheet = sample_sheet();
    let before = (contents(&sheet), row_heights(&sheet), column_widths(&sheet));

    assert!(sheet.insert_rows(pos, n).unwrap());
    assert_eq!(sheet.rows_count(), 10 + i32::try_from(n).unwrap());
    assert!(sheet.delete_rows(pos, n));

    assert_eq!(sheet.rows_count(), 10);
    assert_eq!(
        (contents(&sheet), row_heights(&sheet), column_widths(&sheet)),
        before
    );
}

#[test_case(0, 1 ; "one column at the left")]
#[test_case(2, 2 ; "inside the allocated block")]
#[test_case(5, 4 ; "append")]
fn test_insert_then_delete_columns_restores_sheet(pos: i32, n: usize) {
    let mut sheet = sample_sheet();
    let before = (contents(&sheet), row_heights(&sheet), column_widths(&sheet));

    assert!(sheet.insert_columns(pos, n).unwrap());
    assert_eq!(sheet.columns_count(), 5 + i32::try_from(n).unwrap());
    assert!(sheet.delete_columns(pos, n));

    assert_eq!(sheet.columns_count(), 5);
    assert_eq!(
        (contents(&sheet), row_heights(&sheet), column_widths(&sheet)),
        before
    );
}

#[test]
fn test_insert_rows_shifts_and_retags() {
    let mut sheet = sample_sheet();
    sheet.insert_rows(3, 2).unwrap();

    assert_eq!(sheet.cell_text(2, 3), Some("b"));
    assert_eq!(sheet.cell_text(9, 4), Some("c"));
    assert_eq!(sheet.cell_text(7, 4), None);
    assert_eq!(sheet.row_height(6), Some(40));
    assert_eq!(sheet.row_height(3), Some(24));
    let cell = sheet.grid().cell(9, 4).unwrap();
    assert_eq!((cell.row, cell.col), (9, 4));
}

#[test]
fn test_insert_columns_shifts_and_retags() {
    let mut sheet = sample_sheet();
    sheet.insert_columns(1, 3).unwrap();

    assert_eq!(sheet.cell_text(0, 0), Some("a"));
    assert_eq!(sheet.cell_text(2, 6), Some("b"));
    assert_eq!(sheet.cell_text(9, 4), Some("d"));
    assert_eq!(sheet.column_width(4), Some(120));
    let cell = sheet.grid().cell(2, 6).unwrap();
    assert_eq!((cell.row, cell.col), (2, 6));
}

#[test]
fn test_insert_out_of_range_is_noop() {
    let mut sheet = sample_sheet();
    assert!(!sheet.insert_rows(11, 2).unwrap());
    assert!(!sheet.insert_rows(-1, 2).unwrap());
    assert!(!sheet.insert_columns(3, 0).unwrap());
    assert_eq!(sheet.rows_count(), 10);
    assert_eq!(sheet.columns_count(), 5);
}

#[test]
fn test_add_rows_and_columns_append() {
    let mut sheet = sample_sheet();
    sheet.add_rows(3).unwrap();
    sheet.add_columns(1).unwrap();
    assert_eq!(sheet.rows_count(), 13);
    assert_eq!(sheet.columns_count(), 6);
    assert_eq!(contents(&sheet), contents(&sample_sheet()));
}

#[test]
fn test_delete_band_frees_exactly_its_cells() {
    let mut sheet = Sheet::new(6, 4, None).unwrap();
    for r in 0..6 {
        for c in 0..4 {
            sheet.set_cell_text(r, c, &format!("{r}:{c}")).unwrap();
        }
    }
    assert_eq!(sheet.grid().allocated_cells(), 24);

    assert!(sheet.delete_rows(2, 2));
    assert_eq!(sheet.grid().allocated_cells(), 16);
    assert_eq!(sheet.cell_text(2, 1), Some("4:1"));
    assert_eq!(sheet.cell_text(3, 3), Some("5:3"));
    assert_eq!(sheet.max_alloc_row(), 3);

    assert!(sheet.delete_columns(0, 1));
    assert_eq!(sheet.grid().allocated_cells(), 12);
    assert_eq!(sheet.cell_text(0, 0), Some("0:1"));
    for cell in sheet.grid().iter_cells() {
        let (r, c) = (cell.row, cell.col);
        assert_eq!(sheet.grid().cell(r, c).map(|x| (x.row, x.col)), Some((r, c)));
    }
}

#[test]
fn test_delete_clamps_count() {
    let mut sheet = sample_sheet();
    assert!(sheet.delete_rows(8, 100));
    assert_eq!(sheet.rows_count(), 8);
    assert!(sheet.delete_columns(4, 9));
    assert_eq!(sheet.columns_count(), 4);
    assert!(!sheet.delete_rows(8, 1));
    assert!(!sheet.delete_rows(0, 0));
}

#[test]
fn test_delete_fixes_up_selection_and_clip() {
    let mut sheet = Sheet::new(10, 10, None).unwrap();
    assert!(sheet.select_range(&SheetRange::new(2, 2, 8, 8)));
    sheet.clip_range(&SheetRange::new(6, 6, 9, 9));

    sheet.delete_rows(5, 5);
    assert_eq!(sheet.rows_count(), 5);
    assert_eq!(sheet.range(), SheetRange::new(2, 2, 4, 8));
    assert_eq!(sheet.clipped_range(), SheetRange::new(4, 6, 4, 9));
    assert_eq!(sheet.active_cell(), CellPos::new(2, 2));
}

#[test]
fn test_appended_rows_join_column_selection() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(sheet.select_column(1));
    assert!(sheet.add_rows(3).unwrap());

    assert_eq!(sheet.state(), SheetState::ColumnSelected);
    assert_eq!(sheet.range(), SheetRange::new(0, 1, 12, 1));
    assert_eq!(sheet.selection_cursor(), CellPos::new(12, 1));
}

#[test]
fn test_rows_inserted_at_top_keep_column_selection_whole() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    sheet.select_column(3);
    sheet.insert_rows(0, 2).unwrap();
    assert_eq!(sheet.range(), SheetRange::new(0, 3, 11, 3));
    assert_eq!(sheet.selection_anchor(), CellPos::new(0, 3));

    sheet.delete_rows(0, 4);
    assert_eq!(sheet.range(), SheetRange::new(0, 3, 7, 3));
}

#[test]
fn test_appended_columns_join_row_selection() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(sheet.select_row(2));
    assert!(sheet.add_columns(2).unwrap());

    assert_eq!(sheet.state(), SheetState::RowSelected);
    assert_eq!(sheet.range(), SheetRange::new(2, 0, 2, 6));
    assert_eq!(sheet.selection_cursor(), CellPos::new(2, 6));
}

#[test]
fn test_deleting_active_cell_reopens_editor() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert!(sheet.click_cell(8, 2));
    sheet.set_entry_text("pending");

    sheet.delete_rows(7, 3);

    assert_eq!(sheet.active_cell(), CellPos::new(6, 2));
    assert!(sheet.is_editing());
    // the pending text died with its cell
    assert_eq!(sheet.entry_text().as_deref(), Some(""));
    assert_eq!(sheet.grid().allocated_cells(), 0);
}

#[test]
fn test_insert_above_active_cell_moves_it() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    sheet.click_cell(4, 1);
    sheet.set_entry_text("typed");

    sheet.insert_rows(2, 3).unwrap();
    assert_eq!(sheet.active_cell(), CellPos::new(7, 1));

    // the session follows its cell and commits there
    sheet.click_cell(0, 0);
    assert_eq!(sheet.cell_text(7, 1), Some("typed"));
    assert_eq!(sheet.cell_text(4, 1), None);
}

#[test]
fn test_scenario_insert_rows_moves_cell_and_pixels() {
    let mut sheet = Sheet::new(10, 5, None).unwrap();
    assert_eq!(sheet.column_width(2), Some(80));
    assert_eq!(sheet.row_height(3), Some(24));
    sheet.set_cell_text(3, 2, "X").unwrap();
    let (x, y) = center(&sheet, 3, 2);
    assert_eq!(sheet.cell_at(x, y), Some(CellPos::new(3, 2)));

    sheet.insert_rows(1, 2).unwrap();

    assert_eq!(sheet.cell_text(5, 2), Some("X"));
    let inserted = sheet.row_height(1).unwrap() + sheet.row_height(2).unwrap();
    assert_eq!(sheet.cell_at(x, y + inserted), Some(CellPos::new(5, 2)));
}

#[test]
fn test_structural_change_repaints() {
    let h = Harness::new(10, 5);
    let mut sheet = h.sheet;
    sheet.insert_rows(0, 1).unwrap();
    assert!(h.paint.borrow().full > 0);
}
