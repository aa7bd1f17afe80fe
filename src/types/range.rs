//! Cell positions and rectangular ranges in logical grid coordinates.
//!
//! Both use `-1` as the "unset" sentinel so they can describe partially
//! specified targets (a whole row, a whole column, nothing selected).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{cell_name, parse_cell_range};
use crate::error::SheetError;

/// Sentinel for an unset row or column index.
pub const UNSET: i32 = -1;

/// A (row, col) pair in logical grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: i32,
    pub col: i32,
}

impl CellPos {
    pub const UNSET: CellPos = CellPos {
        row: UNSET,
        col: UNSET,
    };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// True when both coordinates are non-negative.
    pub fn is_set(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }
}

impl Default for CellPos {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Rectangle `(row0, col0)`..=`(rowi, coli)` of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRange {
    /// Upper-left row
    pub row0: i32,
    /// Upper-left column
    pub col0: i32,
    /// Lower-right row (inclusive)
    pub rowi: i32,
    /// Lower-right column (inclusive)
    pub coli: i32,
}

impl Default for SheetRange {
    fn default() -> Self {
        Self::UNSET
    }
}

impl SheetRange {
    pub const UNSET: SheetRange = SheetRange {
        row0: UNSET,
        col0: UNSET,
        rowi: UNSET,
        coli: UNSET,
    };

    /// Create a range from its raw corners (no normalization).
    pub const fn new(row0: i32, col0: i32, rowi: i32, coli: i32) -> Self {
        Self {
            row0,
            col0,
            rowi,
            coli,
        }
    }

    /// Range covering exactly one cell.
    pub const fn cell(row: i32, col: i32) -> Self {
        Self::new(row, col, row, col)
    }

    /// The normalized rectangle spanning two corners.
    pub fn spanning(a: CellPos, b: CellPos) -> Self {
        Self::new(
            a.row.min(b.row),
            a.col.min(b.col),
            a.row.max(b.row),
            a.col.max(b.col),
        )
    }

    /// True when no field carries the unset sentinel.
    pub fn is_set(&self) -> bool {
        self.row0 >= 0 && self.col0 >= 0 && self.rowi >= 0 && self.coli >= 0
    }

    /// Return the range with `row0 <= rowi` and `col0 <= coli`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(
            self.row0.min(self.rowi),
            self.col0.min(self.coli),
            self.row0.max(self.rowi),
            self.col0.max(self.coli),
        )
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        self.is_set() && row >= self.row0 && row <= self.rowi && col >= self.col0 && col <= self.coli
    }

    pub fn contains_pos(&self, pos: CellPos) -> bool {
        self.contains(pos.row, pos.col)
    }

    /// True when `other` lies completely inside this range.
    pub fn encloses(&self, other: &SheetRange) -> bool {
        other.is_set()
            && self.contains(other.row0, other.col0)
            && self.contains(other.rowi, other.coli)
    }

    pub fn upper_left(&self) -> CellPos {
        CellPos::new(self.row0, self.col0)
    }

    pub fn lower_right(&self) -> CellPos {
        CellPos::new(self.rowi, self.coli)
    }

    /// Number of rows covered (0 when unset).
    pub fn row_count(&self) -> i32 {
        if self.is_set() {
            self.rowi - self.row0 + 1
        } else {
            0
        }
    }

    /// Number of columns covered (0 when unset).
    pub fn col_count(&self) -> i32 {
        if self.is_set() {
            self.coli - self.col0 + 1
        } else {
            0
        }
    }

    /// Shift the whole range by a row/column delta.
    #[must_use]
    pub fn translated(self, drow: i32, dcol: i32) -> Self {
        Self::new(
            self.row0 + drow,
            self.col0 + dcol,
            self.rowi + drow,
            self.coli + dcol,
        )
    }

    /// Overlapping part of two ranges.
    pub fn intersection(&self, other: &SheetRange) -> Option<SheetRange> {
        if !self.is_set() || !other.is_set() {
            return None;
        }
        let r = SheetRange::new(
            self.row0.max(other.row0),
            self.col0.max(other.col0),
            self.rowi.min(other.rowi),
            self.coli.min(other.coli),
        );
        (r.row0 <= r.rowi && r.col0 <= r.coli).then_some(r)
    }

    /// Bounding box of two ranges; an unset side yields the other.
    #[must_use]
    pub fn union(&self, other: &SheetRange) -> SheetRange {
        if !self.is_set() {
            return *other;
        }
        if !other.is_set() {
            return *self;
        }
        SheetRange::new(
            self.row0.min(other.row0),
            self.col0.min(other.col0),
            self.rowi.max(other.rowi),
            self.coli.max(other.coli),
        )
    }

    /// Clamp the range in place so it lies inside `0..=maxrow` x `0..=maxcol`.
    ///
    /// A sheet without rows or columns cannot hold any range, so the range
    /// becomes unset. Unset ranges are left alone.
    pub fn fixup(&mut self, maxrow: i32, maxcol: i32) {
        if !self.is_set() {
            return;
        }
        if maxrow < 0 || maxcol < 0 {
            *self = SheetRange::UNSET;
            return;
        }
        let n = self.normalized();
        *self = SheetRange::new(
            n.row0.min(maxrow),
            n.col0.min(maxcol),
            n.rowi.min(maxrow),
            n.coli.min(maxcol),
        );
    }

    /// Iterate over every (row, col) in the range, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let (row0, rowi) = if self.is_set() {
            (self.row0, self.rowi)
        } else {
            (0, -1)
        };
        (row0..=rowi).flat_map(move |row| (self.col0..=self.coli).map(move |col| CellPos::new(row, col)))
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_set() {
            return f.write_str("-");
        }
        let start = cell_name(self.upper_left());
        if self.row0 == self.rowi && self.col0 == self.coli {
            f.write_str(&start)
        } else {
            write!(f, "{start}:{}", cell_name(self.lower_right()))
        }
    }
}

impl FromStr for SheetRange {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cell_range(s).ok_or_else(|| SheetError::CellRef(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_spanning_normalizes_corners() {
        let r = SheetRange::spanning(CellPos::new(4, 1), CellPos::new(2, 3));
        assert_eq!(r, SheetRange::new(2, 1, 4, 3));
        assert!(r.contains(3, 2));
        assert!(!r.contains(5, 2));
    }

    #[test]
    fn test_unset_range_contains_nothing() {
        assert!(!SheetRange::UNSET.is_set());
        assert!(!SheetRange::UNSET.contains(0, 0));
        assert_eq!(SheetRange::UNSET.cells().count(), 0);
        assert_eq!(SheetRange::new(0, -1, 3, 3).row_count(), 0);
    }

    #[test]
    fn test_fixup_clamps_into_bounds() {
        let mut r = SheetRange::new(3, 2, 9, 7);
        r.fixup(5, 4);
        assert_eq!(r, SheetRange::new(3, 2, 5, 4));

        let mut r = SheetRange::new(8, 0, 9, 1);
        r.fixup(5, 4);
        assert_eq!(r, SheetRange::new(5, 0, 5, 1));

        let mut r = SheetRange::new(0, 0, 1, 1);
        r.fixup(-1, 4);
        assert_eq!(r, SheetRange::UNSET);
    }

    #[test]
    fn test_intersection_and_union() {
        let a = SheetRange::new(0, 0, 3, 3);
        let b = SheetRange::new(2, 2, 5, 5);
        assert_eq!(a.intersection(&b), Some(SheetRange::new(2, 2, 3, 3)));
        assert_eq!(a.union(&b), SheetRange::new(0, 0, 5, 5));
        assert_eq!(a.intersection(&SheetRange::new(4, 4, 5, 5)), None);
        assert_eq!(SheetRange::UNSET.union(&b), b);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(SheetRange::new(0, 0, 2, 1).to_string(), "A1:B3");
        assert_eq!(SheetRange::cell(4, 2).to_string(), "C5");
        let parsed: SheetRange = "B2:D4".parse().unwrap();
        assert_eq!(parsed, SheetRange::new(1, 1, 3, 3));
        assert!("nope".parse::<SheetRange>().is_err());
    }

    #[test]
    fn test_cells_iterates_row_major() {
        let cells: Vec<CellPos> = SheetRange::new(1, 1, 2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                CellPos::new(1, 1),
                CellPos::new(1, 2),
                CellPos::new(2, 1),
                CellPos::new(2, 2)
            ]
        );
    }
}
