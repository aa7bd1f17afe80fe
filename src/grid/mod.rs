//! Sparse cell storage plus row/column descriptors.
//!
//! Cells live in one flat buffer indexed by `row * stride + col`, where the
//! stride is the number of allocated columns. The allocated block only covers
//! `0..alloc_rows` x `0..alloc_cols`, always within the logical bounds given
//! by the descriptor arrays; it grows lazily as cells are written.

mod axis;

pub use axis::{AxisDescriptor, ColumnDescriptor, RowDescriptor, SheetButton, TitleButton};

use std::iter::repeat_with;

use tracing::debug;

use crate::error::{Result, SheetError};
use crate::types::Cell;

/// Result of removing a band of rows or columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandRemoval {
    /// Rows/columns actually removed after clamping
    pub removed: i32,
    /// Allocated cell records dropped with the band
    pub freed_cells: usize,
}

/// Convert a logical index to a storage index.
pub(crate) fn to_index(i: i32) -> Option<usize> {
    usize::try_from(i).ok()
}

/// Convert a count back to the logical index space (saturating).
pub(crate) fn to_logical(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn max_entries() -> usize {
    usize::try_from(i32::MAX).unwrap_or(usize::MAX)
}

/// The sparse 2-D cell store
#[derive(Debug, Clone, Default)]
pub struct GridStore {
    rows: Vec<RowDescriptor>,
    columns: Vec<ColumnDescriptor>,
    cells: Vec<Option<Cell>>,
    alloc_rows: usize,
    alloc_cols: usize,
}

impl GridStore {
    /// Create a store with `rows` x `columns` descriptors and no allocated cells.
    ///
    /// # Errors
    /// Returns an error if the descriptor arrays cannot be allocated.
    pub fn new(rows: usize, columns: usize, row_height: i32, column_width: i32) -> Result<Self> {
        let mut store = Self::default();
        store.insert_rows(0, rows, row_height)?;
        store.insert_columns(0, columns, column_width)?;
        Ok(store)
    }

    /// Highest valid logical row (`-1` when the sheet has no rows).
    pub fn max_row(&self) -> i32 {
        to_logical(self.rows.len()) - 1
    }

    /// Highest valid logical column (`-1` when the sheet has no columns).
    pub fn max_col(&self) -> i32 {
        to_logical(self.columns.len()) - 1
    }

    /// Highest row covered by allocated storage.
    pub fn max_alloc_row(&self) -> i32 {
        to_logical(self.alloc_rows) - 1
    }

    /// Highest column covered by allocated storage.
    pub fn max_alloc_col(&self) -> i32 {
        to_logical(self.alloc_cols) - 1
    }

    pub fn rows(&self) -> &[RowDescriptor] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn row(&self, row: i32) -> Option<&RowDescriptor> {
        self.rows.get(to_index(row)?)
    }

    pub fn row_mut(&mut self, row: i32) -> Option<&mut RowDescriptor> {
        self.rows.get_mut(to_index(row)?)
    }

    pub fn column(&self, col: i32) -> Option<&ColumnDescriptor> {
        self.columns.get(to_index(col)?)
    }

    pub fn column_mut(&mut self, col: i32) -> Option<&mut ColumnDescriptor> {
        self.columns.get_mut(to_index(col)?)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut RowDescriptor> {
        self.rows.iter_mut()
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut ColumnDescriptor> {
        self.columns.iter_mut()
    }

    /// True when `(row, col)` lies inside the logical bounds.
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && row <= self.max_row() && col <= self.max_col()
    }

    fn slot_index(&self, row: i32, col: i32) -> Option<usize> {
        let (r, c) = (to_index(row)?, to_index(col)?);
        if r >= self.alloc_rows || c >= self.alloc_cols {
            return None;
        }
        r.checked_mul(self.alloc_cols)?.checked_add(c)
    }

    /// The allocated record at `(row, col)`, if any.
    pub fn cell(&self, row: i32, col: i32) -> Option<&Cell> {
        let idx = self.slot_index(row, col)?;
        self.cells.get(idx)?.as_ref()
    }

    pub fn cell_mut(&mut self, row: i32, col: i32) -> Option<&mut Cell> {
        let idx = self.slot_index(row, col)?;
        self.cells.get_mut(idx)?.as_mut()
    }

    /// All allocated records, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn allocated_cells(&self) -> usize {
        self.iter_cells().count()
    }

    /// Extend the allocation bounds by `new_rows` rows and `new_cols` columns.
    ///
    /// Growth stops at the logical bounds. Existing records keep their content
    /// and position; new slots are empty.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be grown.
    pub fn grow(&mut self, new_rows: usize, new_cols: usize) -> Result<()> {
        let rows = self.alloc_rows.saturating_add(new_rows).min(self.rows.len());
        let cols = self.alloc_cols.saturating_add(new_cols).min(self.columns.len());
        self.resize_storage(rows, cols)
    }

    /// Grow storage so that it covers `(row, col)` and return the record there,
    /// creating it if needed. Returns `Ok(None)` outside the logical bounds.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be grown.
    pub fn ensure_allocated(&mut self, row: i32, col: i32) -> Result<Option<&mut Cell>> {
        if !self.contains(row, col) {
            return Ok(None);
        }
        let (Some(r), Some(c)) = (to_index(row), to_index(col)) else {
            return Ok(None);
        };
        if r >= self.alloc_rows || c >= self.alloc_cols {
            let rows = self.alloc_rows.max(r + 1);
            let cols = self.alloc_cols.max(c + 1);
            self.resize_storage(rows, cols)?;
        }
        let Some(idx) = self.slot_index(row, col) else {
            return Ok(None);
        };
        Ok(self
            .cells
            .get_mut(idx)
            .map(|slot| slot.get_or_insert_with(|| Cell::new(row, col))))
    }

    /// Re-lay storage as `rows` x `cols`; both must be >= the current block.
    fn resize_storage(&mut self, rows: usize, cols: usize) -> Result<()> {
        if rows <= self.alloc_rows && cols <= self.alloc_cols {
            return Ok(());
        }
        let rows = rows.max(self.alloc_rows);
        let cols = cols.max(self.alloc_cols);
        let total = rows
            .checked_mul(cols)
            .ok_or(SheetError::Capacity { rows, cols })?;

        if cols == self.alloc_cols {
            self.cells.try_reserve_exact(total - self.cells.len())?;
            self.cells.resize_with(total, || None);
        } else {
            let mut relaid: Vec<Option<Cell>> = Vec::new();
            relaid.try_reserve_exact(total)?;
            let extra = cols - self.alloc_cols;
            let mut old = std::mem::take(&mut self.cells).into_iter();
            for _ in 0..self.alloc_rows {
                relaid.extend(old.by_ref().take(self.alloc_cols));
                relaid.extend(repeat_with(|| None).take(extra));
            }
            relaid.resize_with(total, || None);
            self.cells = relaid;
        }
        self.alloc_rows = rows;
        self.alloc_cols = cols;
        Ok(())
    }

    /// Point every record's `row`/`col` tag at its current slot.
    fn retag(&mut self) {
        let stride = self.alloc_cols;
        if stride == 0 {
            return;
        }
        for (i, slot) in self.cells.iter_mut().enumerate() {
            if let Some(cell) = slot {
                cell.row = to_logical(i / stride);
                cell.col = to_logical(i % stride);
            }
        }
    }

    fn check_capacity(&self, rows: usize, cols: usize) -> Result<()> {
        if rows > max_entries() || cols > max_entries() {
            return Err(SheetError::Capacity { rows, cols });
        }
        Ok(())
    }

    /// Insert `n` empty rows before `pos`; `pos == max_row + 1` appends.
    ///
    /// Returns `Ok(false)` when `pos` is out of range or `n == 0`.
    ///
    /// # Errors
    /// Returns an error if descriptors or storage cannot be grown.
    pub fn insert_rows(&mut self, pos: usize, n: usize, height: i32) -> Result<bool> {
        if n == 0 || pos > self.rows.len() {
            return Ok(false);
        }
        let new_len = self.rows.len().saturating_add(n);
        self.check_capacity(new_len, self.columns.len())?;
        self.rows.try_reserve(n)?;

        if pos < self.alloc_rows {
            let stride = self.alloc_cols;
            let extra = n
                .checked_mul(stride)
                .ok_or(SheetError::Capacity { rows: n, cols: stride })?;
            self.cells.try_reserve(extra)?;
            let at = pos * stride;
            self.cells.splice(at..at, repeat_with(|| None).take(extra));
            self.alloc_rows += n;
            self.retag();
        }
        self.rows
            .splice(pos..pos, repeat_with(|| RowDescriptor::new(height)).take(n));

        debug!(pos, n, rows = self.rows.len(), "inserted rows");
        Ok(true)
    }

    /// Insert `n` empty columns before `pos`; `pos == max_col + 1` appends.
    ///
    /// # Errors
    /// Returns an error if descriptors or storage cannot be grown.
    pub fn insert_columns(&mut self, pos: usize, n: usize, width: i32) -> Result<bool> {
        if n == 0 || pos > self.columns.len() {
            return Ok(false);
        }
        let new_len = self.columns.len().saturating_add(n);
        self.check_capacity(self.rows.len(), new_len)?;
        self.columns.try_reserve(n)?;

        if pos < self.alloc_cols {
            let stride = self.alloc_cols + n;
            let total = self
                .alloc_rows
                .checked_mul(stride)
                .ok_or(SheetError::Capacity {
                    rows: self.alloc_rows,
                    cols: stride,
                })?;
            let mut relaid: Vec<Option<Cell>> = Vec::new();
            relaid.try_reserve_exact(total)?;
            let mut old = std::mem::take(&mut self.cells).into_iter();
            for _ in 0..self.alloc_rows {
                relaid.extend(old.by_ref().take(pos));
                relaid.extend(repeat_with(|| None).take(n));
                relaid.extend(old.by_ref().take(self.alloc_cols - pos));
            }
            self.cells = relaid;
            self.alloc_cols = stride;
            self.retag();
        }
        self.columns
            .splice(pos..pos, repeat_with(|| ColumnDescriptor::new(width)).take(n));

        debug!(pos, n, columns = self.columns.len(), "inserted columns");
        Ok(true)
    }

    /// Delete up to `n` rows starting at `pos`, freeing the records inside.
    pub fn delete_rows(&mut self, pos: usize, n: usize) -> BandRemoval {
        if n == 0 || pos >= self.rows.len() {
            return BandRemoval::default();
        }
        let n = n.min(self.rows.len() - pos);
        self.rows.drain(pos..pos + n);

        let mut freed_cells = 0;
        if pos < self.alloc_rows {
            let k = n.min(self.alloc_rows - pos);
            let stride = self.alloc_cols;
            freed_cells = self
                .cells
                .drain(pos * stride..(pos + k) * stride)
                .filter(Option::is_some)
                .count();
            self.alloc_rows -= k;
            self.retag();
        }

        debug!(pos, n, freed_cells, rows = self.rows.len(), "deleted rows");
        BandRemoval {
            removed: to_logical(n),
            freed_cells,
        }
    }

    /// Delete up to `n` columns starting at `pos`, freeing the records inside.
    pub fn delete_columns(&mut self, pos: usize, n: usize) -> BandRemoval {
        if n == 0 || pos >= self.columns.len() {
            return BandRemoval::default();
        }
        let n = n.min(self.columns.len() - pos);
        self.columns.drain(pos..pos + n);

        let mut freed_cells = 0;
        if pos < self.alloc_cols {
            let k = n.min(self.alloc_cols - pos);
            let stride = self.alloc_cols;
            let mut kept: Vec<Option<Cell>> =
                Vec::with_capacity(self.alloc_rows * (stride - k));
            for (i, slot) in std::mem::take(&mut self.cells).into_iter().enumerate() {
                let col = i % stride;
                if col >= pos && col < pos + k {
                    if slot.is_some() {
                        freed_cells += 1;
                    }
                } else {
                    kept.push(slot);
                }
            }
            self.cells = kept;
            self.alloc_cols -= k;
            self.retag();
        }

        debug!(pos, n, freed_cells, columns = self.columns.len(), "deleted columns");
        BandRemoval {
            removed: to_logical(n),
            freed_cells,
        }
    }

    /// Release the record's contents but keep its slot. Returns whether a record existed.
    pub fn clear_cell(&mut self, row: i32, col: i32) -> bool {
        match self.cell_mut(row, col) {
            Some(cell) => {
                cell.release();
                true
            }
            None => false,
        }
    }

    /// Free the record's slot entirely. Returns whether a record existed.
    pub fn delete_cell(&mut self, row: i32, col: i32) -> bool {
        let Some(idx) = self.slot_index(row, col) else {
            return false;
        };
        self.cells
            .get_mut(idx)
            .and_then(Option::take)
            .is_some()
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

    fn store(rows: usize, cols: usize) -> GridStore {
        GridStore::new(rows, cols, 24, 80).unwrap()
    }

    fn write(store: &mut GridStore, row: i32, col: i32, text: &str) {
        let cell = store.ensure_allocated(row, col).unwrap().unwrap();
        cell.text = Some(text.to_string());
    }

    fn text(store: &GridStore, row: i32, col: i32) -> Option<&str> {
        store.cell(row, col).and_then(|c| c.text.as_deref())
    }

    fn assert_tags_match(store: &GridStore) {
        for row in 0..=store.max_alloc_row() {
            for col in 0..=store.max_alloc_col() {
                if let Some(cell) = store.cell(row, col) {
                    assert_eq!((cell.row, cell.col), (row, col));
                }
            }
        }
    }

    #[test]
    fn test_new_store_has_no_storage() {
        let s = store(10, 5);
        assert_eq!(s.max_row(), 9);
        assert_eq!(s.max_col(), 4);
        assert_eq!(s.max_alloc_row(), -1);
        assert_eq!(s.max_alloc_col(), -1);
        assert!(s.cell(0, 0).is_none());
    }

    #[test]
    fn test_ensure_allocated_grows_lazily() {
        let mut s = store(10, 5);
        write(&mut s, 3, 2, "X");
        assert_eq!(s.max_alloc_row(), 3);
        assert_eq!(s.max_alloc_col(), 2);
        assert_eq!(text(&s, 3, 2), Some("X"));
        assert!(s.cell(0, 0).is_none());
        assert!(s.ensure_allocated(10, 0).unwrap().is_none());
        assert!(s.ensure_allocated(-1, 0).unwrap().is_none());
    }

    #[test]
    fn test_grow_preserves_existing_cells() {
        let mut s = store(10, 10);
        write(&mut s, 1, 1, "a");
        write(&mut s, 0, 2, "b");
        s.grow(3, 4).unwrap();
        assert_eq!(s.max_alloc_row(), 4);
        assert_eq!(s.max_alloc_col(), 6);
        assert_eq!(text(&s, 1, 1), Some("a"));
        assert_eq!(text(&s, 0, 2), Some("b"));
        assert_eq!(s.allocated_cells(), 2);
        assert_tags_match(&s);
    }

    #[test]
    fn test_grow_stops_at_logical_bounds() {
        let mut s = store(3, 2);
        s.grow(100, 100).unwrap();
        assert_eq!(s.max_alloc_row(), 2);
        assert_eq!(s.max_alloc_col(), 1);
    }

    #[test]
    fn test_insert_rows_shifts_and_retags() {
        let mut s = store(10, 5);
        write(&mut s, 0, 0, "top");
        write(&mut s, 3, 2, "X");
        assert!(s.insert_rows(1, 2, 24).unwrap());
        assert_eq!(s.max_row(), 11);
        assert_eq!(text(&s, 0, 0), Some("top"));
        assert_eq!(text(&s, 5, 2), Some("X"));
        assert!(s.cell(3, 2).is_none());
        assert_tags_match(&s);
    }

    #[test]
    fn test_insert_rows_beyond_storage_only_touches_descriptors() {
        let mut s = store(10, 5);
        write(&mut s, 1, 1, "a");
        s.insert_rows(5, 3, 30).unwrap();
        assert_eq!(s.max_alloc_row(), 1);
        assert_eq!(s.row(5).unwrap().height, 30);
        assert_eq!(s.row(8).unwrap().height, 24);
    }

    #[test]
    fn test_insert_rows_out_of_range_is_noop() {
        let mut s = store(4, 4);
        assert!(!s.insert_rows(6, 1, 24).unwrap());
        assert!(s.insert_rows(4, 1, 24).unwrap());
        assert_eq!(s.max_row(), 4);
    }

    #[test]
    fn test_insert_columns_shifts_and_retags() {
        let mut s = store(5, 5);
        write(&mut s, 1, 0, "left");
        write(&mut s, 1, 3, "right");
        write(&mut s, 2, 1, "mid");
        s.insert_columns(1, 2, 80).unwrap();
        assert_eq!(s.max_col(), 6);
        assert_eq!(text(&s, 1, 0), Some("left"));
        assert_eq!(text(&s, 1, 5), Some("right"));
        assert_eq!(text(&s, 2, 3), Some("mid"));
        assert!(s.cell(2, 1).is_none());
        assert_tags_match(&s);
    }

    #[test]
    fn test_delete_rows_frees_band() {
        let mut s = store(10, 4);
        write(&mut s, 1, 0, "keep");
        write(&mut s, 2, 1, "gone");
        write(&mut s, 3, 2, "gone too");
        write(&mut s, 6, 3, "moves");
        let removal = s.delete_rows(2, 2);
        assert_eq!(removal, BandRemoval { removed: 2, freed_cells: 2 });
        assert_eq!(s.max_row(), 7);
        assert_eq!(text(&s, 1, 0), Some("keep"));
        assert_eq!(text(&s, 4, 3), Some("moves"));
        assert_eq!(s.allocated_cells(), 2);
        assert!(s.max_alloc_row() <= s.max_row());
        assert_tags_match(&s);
    }

    #[test]
    fn test_delete_rows_clamps_count() {
        let mut s = store(5, 2);
        write(&mut s, 4, 1, "last");
        let removal = s.delete_rows(3, 100);
        assert_eq!(removal.removed, 2);
        assert_eq!(removal.freed_cells, 1);
        assert_eq!(s.max_row(), 2);
        assert_eq!(s.max_alloc_row(), 2);
        assert_eq!(s.delete_rows(7, 1), BandRemoval::default());
    }

    #[test]
    fn test_delete_columns_frees_band() {
        let mut s = store(3, 6);
        write(&mut s, 0, 0, "a");
        write(&mut s, 0, 2, "b");
        write(&mut s, 2, 3, "c");
        write(&mut s, 2, 5, "d");
        let removal = s.delete_columns(2, 2);
        assert_eq!(removal, BandRemoval { removed: 2, freed_cells: 2 });
        assert_eq!(s.max_col(), 3);
        assert_eq!(text(&s, 0, 0), Some("a"));
        assert_eq!(text(&s, 2, 3), Some("d"));
        assert_eq!(s.max_alloc_col(), 3);
        assert_tags_match(&s);
    }

    #[test]
    fn test_insert_then_delete_rows_round_trips() {
        let mut s = store(8, 3);
        write(&mut s, 0, 0, "a");
        write(&mut s, 4, 1, "b");
        write(&mut s, 7, 2, "c");
        s.row_mut(4).unwrap().height = 40;
        s.insert_rows(3, 4, 24).unwrap();
        s.delete_rows(3, 4);
        assert_eq!(s.max_row(), 7);
        assert_eq!(text(&s, 0, 0), Some("a"));
        assert_eq!(text(&s, 4, 1), Some("b"));
        assert_eq!(text(&s, 7, 2), Some("c"));
        assert_eq!(s.row(4).unwrap().height, 40);
        assert_tags_match(&s);
    }

    #[test]
    fn test_clear_keeps_slot_delete_frees_it() {
        let mut s = store(3, 3);
        write(&mut s, 1, 1, "x");
        assert!(s.clear_cell(1, 1));
        let cell = s.cell(1, 1).unwrap();
        assert!(cell.is_empty());
        assert!(s.delete_cell(1, 1));
        assert!(s.cell(1, 1).is_none());
        assert!(!s.delete_cell(1, 1));
        assert!(!s.clear_cell(9, 9));
    }
}
