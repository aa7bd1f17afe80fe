//! Effective cell attributes.
//!
//! Resolution order: the cell's own override, then the column (justification
//! and read-only only), then the sheet defaults.

use crate::error::Result;
use crate::grid::{ColumnDescriptor, GridStore};
use crate::types::{Cell, CellAttributes, SheetConfig, SheetRange};

/// Layers per-cell attribute overrides over column and sheet defaults
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeOverlay {
    defaults: CellAttributes,
}

impl AttributeOverlay {
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            defaults: CellAttributes {
                foreground: config.foreground,
                background: config.background,
                ..CellAttributes::default()
            },
        }
    }

    pub fn defaults(&self) -> &CellAttributes {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut CellAttributes {
        &mut self.defaults
    }

    /// Effective attributes for a cell that may or may not be allocated.
    pub fn resolve(&self, cell: Option<&Cell>, column: Option<&ColumnDescriptor>) -> CellAttributes {
        let mut attrs = match cell.and_then(|c| c.attributes.as_ref()) {
            Some(own) => own.clone(),
            None => {
                let mut base = self.defaults.clone();
                if let Some(column) = column {
                    base.justification = column.justification;
                }
                base
            }
        };
        if column.is_some_and(|c| c.is_readonly) {
            attrs.is_editable = false;
        }
        attrs
    }

    /// Effective attributes at `(row, col)` and whether a record is allocated there.
    pub fn attributes(&self, store: &GridStore, row: i32, col: i32) -> (CellAttributes, bool) {
        let cell = store.cell(row, col);
        (self.resolve(cell, store.column(col)), cell.is_some())
    }

    /// Materialize the override at `(row, col)` and apply `update` to it.
    ///
    /// A fresh override starts from the currently effective attributes, minus the
    /// column read-only flag, so untouched fields keep resolving the same way.
    /// Returns `Ok(false)` when the position is out of range.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn update<F>(&self, store: &mut GridStore, row: i32, col: i32, update: F) -> Result<bool>
    where
        F: FnOnce(&mut CellAttributes),
    {
        let mut base = self.defaults.clone();
        if let Some(column) = store.column(col) {
            base.justification = column.justification;
        }
        let Some(cell) = store.ensure_allocated(row, col)? else {
            return Ok(false);
        };
        update(cell.attributes.get_or_insert(base));
        Ok(true)
    }

    /// Apply `update` to every cell of `range` (clamped to the sheet). Returns the number updated.
    ///
    /// # Errors
    /// Returns an error if storage cannot be grown.
    pub fn update_range<F>(&self, store: &mut GridStore, range: &SheetRange, mut update: F) -> Result<usize>
    where
        F: FnMut(&mut CellAttributes),
    {
        let mut range = range.normalized();
        range.fixup(store.max_row(), store.max_col());
        let mut touched = 0;
        for pos in range.cells() {
            if self.update(store, pos.row, pos.col, &mut update)? {
                touched += 1;
            }
        }
        Ok(touched)
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
    use crate::color::Rgba;
    use crate::types::Justification;

    fn setup() -> (AttributeOverlay, GridStore) {
        let config = SheetConfig {
            background: Rgba::rgb(0xF0, 0xF0, 0xF0),
            ..SheetConfig::default()
        };
        (AttributeOverlay::new(&config), GridStore::new(5, 5, 24, 80).unwrap())
    }

    #[test]
    fn test_unallocated_cell_uses_sheet_defaults() {
        let (overlay, store) = setup();
        let (attrs, allocated) = overlay.attributes(&store, 2, 2);
        assert!(!allocated);
        assert_eq!(attrs.background, Rgba::rgb(0xF0, 0xF0, 0xF0));
        assert_eq!(attrs.justification, Justification::Left);
        assert!(attrs.is_editable);
    }

    #[test]
    fn test_column_justification_applies_without_override() {
        let (overlay, mut store) = setup();
        store.column_mut(1).unwrap().justification = Justification::Right;
        let (attrs, _) = overlay.attributes(&store, 0, 1);
        assert_eq!(attrs.justification, Justification::Right);
    }

    #[test]
    fn test_override_wins_and_materializes_record() {
        let (overlay, mut store) = setup();
        store.column_mut(1).unwrap().justification = Justification::Right;
        overlay
            .update(&mut store, 3, 1, |a| a.background = Rgba::BLACK)
            .unwrap();
        let (attrs, allocated) = overlay.attributes(&store, 3, 1);
        assert!(allocated);
        assert_eq!(attrs.background, Rgba::BLACK);
        // seeded from the column default
        assert_eq!(attrs.justification, Justification::Right);
    }

    #[test]
    fn test_readonly_column_supersedes_editability() {
        let (overlay, mut store) = setup();
        overlay.update(&mut store, 0, 4, |a| a.is_editable = true).unwrap();
        store.column_mut(4).unwrap().is_readonly = true;
        assert!(!overlay.attributes(&store, 0, 4).0.is_editable);
    }

    #[test]
    fn test_update_range_clamps() {
        let (overlay, mut store) = setup();
        let touched = overlay
            .update_range(&mut store, &SheetRange::new(3, 3, 9, 9), |a| a.is_visible = false)
            .unwrap();
        assert_eq!(touched, 4);
        assert!(!overlay.attributes(&store, 4, 4).0.is_visible);
        assert!(!overlay.update(&mut store, 7, 0, |_| {}).unwrap());
    }
}
