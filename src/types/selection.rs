use serde::{Deserialize, Serialize};

/// What the committed selection currently covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetState {
    /// Only the active cell is selected (default)
    #[default]
    Normal,
    /// Entire row(s) selected
    RowSelected,
    /// Entire column(s) selected
    ColumnSelected,
    /// A rectangular range selected (also used for select-all)
    RangeSelected,
}

/// How much the user may select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Only the active cell; no row, column or range selections
    None,
    /// Row/column selections but no range extension
    Single,
    /// Same as `Single`; kept for toolkit parity
    Browse,
    /// Everything, including drag and shift extension
    #[default]
    Multiple,
}

impl SelectionMode {
    /// Whether ranges may be extended beyond one cell/row/column.
    pub fn allows_ranges(self) -> bool {
        matches!(self, SelectionMode::Multiple)
    }

    /// Whether whole rows or columns may be selected.
    pub fn allows_lines(self) -> bool {
        !matches!(self, SelectionMode::None)
    }
}

/// Per-cell selection state reported to painters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Normal,
    Selected,
}

/// Alignment for [`crate::Sheet::moveto`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAlign {
    /// Row/column at the top/left edge of the viewport
    Start,
    /// Row/column centered in the viewport
    Center,
    /// Row/column at the bottom/right edge of the viewport
    End,
}
