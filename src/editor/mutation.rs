//! Cell text mutations.
//!
//! Applies committed editor text (and programmatic writes) to the grid store.

use crate::error::Result;
use crate::grid::GridStore;

/// Write `value` into the cell at `(row, col)`.
///
/// - Empty string on an unallocated cell → nothing to do
/// - Empty string on an allocated cell → text is cleared, the slot stays
/// - Otherwise the record is materialized and its text replaced
///
/// Returns whether the stored text changed.
pub(crate) fn apply_cell_edit(store: &mut GridStore, row: i32, col: i32, value: &str) -> Result<bool> {
    if value.is_empty() {
        return Ok(store
            .cell_mut(row, col)
            .and_then(|cell| cell.text.take())
            .is_some());
    }

    let Some(cell) = store.ensure_allocated(row, col)? else {
        return Ok(false);
    };
    if cell.text.as_deref() == Some(value) {
        return Ok(false);
    }
    cell.text = Some(value.to_string());
    Ok(true)
}
