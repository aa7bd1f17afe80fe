//! Cached pixel offsets for rows and columns.
//!
//! Offsets are measured in cell-area space: `0` is the leading edge of row or
//! column 0, excluding the fixed title areas. Hidden entries occupy no pixels,
//! so they share their leading offset with the next visible entry.

use crate::grid::{AxisDescriptor, ColumnDescriptor, RowDescriptor};
use crate::types::SheetRange;

/// Total width of the band straddling a boundary in which a resize handle is offered
pub const DRAG_WIDTH: i32 = 6;

/// Rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Pre-computed layout data for a sheet
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    /// `col_positions[i]` = x of column i's left edge; one extra entry for the final edge
    col_positions: Vec<i32>,
    /// `row_positions[i]` = y of row i's top edge; one extra entry for the final edge
    row_positions: Vec<i32>,
    /// Visible widths (0 for hidden columns)
    col_widths: Vec<i32>,
    /// Visible heights (0 for hidden rows)
    row_heights: Vec<i32>,
    /// Width of the row title area (0 when hidden)
    row_title_width: i32,
    /// Height of the column title area (0 when hidden)
    col_title_height: i32,
}

/// Leading offsets and visible sizes for one axis.
fn axis_positions<D: AxisDescriptor>(items: &[D]) -> (Vec<i32>, Vec<i32>) {
    let mut positions = Vec::with_capacity(items.len() + 1);
    let mut sizes = Vec::with_capacity(items.len());
    let mut edge: i32 = 0;
    for item in items {
        positions.push(edge);
        let size = item.visible_size();
        sizes.push(size);
        edge = edge.saturating_add(size);
    }
    positions.push(edge);
    (positions, sizes)
}

/// Entry whose `[leading, leading + size)` span contains `p`.
///
/// Before the first entry yields 0, past the last yields `len`.
fn index_at(positions: &[i32], p: i32) -> i32 {
    let Some((&total, leads)) = positions.split_last() else {
        return 0;
    };
    if leads.is_empty() || p < 0 {
        return 0;
    }
    if p >= total {
        return i32::try_from(leads.len()).unwrap_or(i32::MAX);
    }
    let idx = leads.partition_point(|&lead| lead <= p).saturating_sub(1);
    i32::try_from(idx).unwrap_or(i32::MAX)
}

/// Entry whose trailing edge lies within half the drag band of `p`.
fn handle_at(positions: &[i32], sizes: &[i32], p: i32) -> Option<i32> {
    let half = DRAG_WIDTH / 2;
    // first trailing edge that could be within reach
    let start = positions
        .get(1..)?
        .partition_point(|&edge| edge < p.saturating_sub(half));
    for (i, &size) in sizes.iter().enumerate().skip(start) {
        let edge = *positions.get(i + 1)?;
        if edge > p.saturating_add(half) {
            break;
        }
        if size > 0 {
            return i32::try_from(i).ok();
        }
    }
    None
}

impl SheetLayout {
    /// Compute offsets from the current descriptors.
    pub fn new(rows: &[RowDescriptor], columns: &[ColumnDescriptor]) -> Self {
        let mut layout = Self::default();
        layout.recalc(rows, columns);
        layout
    }

    /// Recompute every offset from scratch.
    pub fn recalc(&mut self, rows: &[RowDescriptor], columns: &[ColumnDescriptor]) {
        let (row_positions, row_heights) = axis_positions(rows);
        let (col_positions, col_widths) = axis_positions(columns);
        self.row_positions = row_positions;
        self.row_heights = row_heights;
        self.col_positions = col_positions;
        self.col_widths = col_widths;
    }

    pub fn header_width(&self) -> i32 {
        self.row_title_width
    }

    pub fn header_height(&self) -> i32 {
        self.col_title_height
    }

    /// Set title area dimensions (0 hides the area)
    pub fn set_header_dimensions(&mut self, row_title_width: i32, col_title_height: i32) {
        self.row_title_width = row_title_width.max(0);
        self.col_title_height = col_title_height.max(0);
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_widths.len()
    }

    /// Find row at cell-area y (binary search)
    pub fn row_at_y(&self, y: i32) -> i32 {
        index_at(&self.row_positions, y)
    }

    /// Find column at cell-area x (binary search)
    pub fn col_at_x(&self, x: i32) -> i32 {
        index_at(&self.col_positions, x)
    }

    pub fn row_top(&self, row: i32) -> Option<i32> {
        let idx = usize::try_from(row).ok()?;
        self.row_heights.get(idx)?;
        self.row_positions.get(idx).copied()
    }

    pub fn col_left(&self, col: i32) -> Option<i32> {
        let idx = usize::try_from(col).ok()?;
        self.col_widths.get(idx)?;
        self.col_positions.get(idx).copied()
    }

    pub fn row_height(&self, row: i32) -> i32 {
        usize::try_from(row)
            .ok()
            .and_then(|i| self.row_heights.get(i).copied())
            .unwrap_or(0)
    }

    pub fn col_width(&self, col: i32) -> i32 {
        usize::try_from(col)
            .ok()
            .and_then(|i| self.col_widths.get(i).copied())
            .unwrap_or(0)
    }

    /// Cell bounds in cell-area space
    pub fn cell_rect(&self, row: i32, col: i32) -> Option<CellRect> {
        Some(CellRect {
            x: self.col_left(col)?,
            y: self.row_top(row)?,
            width: self.col_width(col),
            height: self.row_height(row),
        })
    }

    pub fn total_width(&self) -> i32 {
        self.col_positions.last().copied().unwrap_or(0)
    }

    pub fn total_height(&self) -> i32 {
        self.row_positions.last().copied().unwrap_or(0)
    }

    /// Column whose right edge is under cell-area `x`, if a resize handle is offered there.
    pub fn column_resize_handle(&self, x: i32) -> Option<i32> {
        handle_at(&self.col_positions, &self.col_widths, x)
    }

    /// Row whose bottom edge is under cell-area `y`, if a resize handle is offered there.
    pub fn row_resize_handle(&self, y: i32) -> Option<i32> {
        handle_at(&self.row_positions, &self.row_heights, y)
    }

    /// Pixel extent of a range in cell-area space.
    pub fn range_rect(&self, range: &SheetRange) -> Option<CellRect> {
        if !range.is_set() {
            return None;
        }
        let top_left = self.cell_rect(range.row0, range.col0)?;
        let bottom_right = self.cell_rect(range.rowi, range.coli)?;
        Some(CellRect {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x + bottom_right.width - top_left.x,
            height: bottom_right.y + bottom_right.height - top_left.y,
        })
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

    fn layout(rows: usize, cols: usize) -> (Vec<RowDescriptor>, Vec<ColumnDescriptor>) {
        (
            (0..rows).map(|_| RowDescriptor::new(20)).collect(),
            (0..cols).map(|_| ColumnDescriptor::new(50)).collect(),
        )
    }

    #[test]
    fn test_basic_layout() {
        let (rows, cols) = layout(10, 5);
        let layout = SheetLayout::new(&rows, &cols);
        assert_eq!(layout.total_width(), 250);
        assert_eq!(layout.total_height(), 200);
        assert_eq!(layout.cell_rect(1, 2), Some(CellRect { x: 100, y: 20, width: 50, height: 20 }));
        assert_eq!(layout.cell_rect(10, 0), None);
    }

    #[test]
    fn test_row_at_y() {
        let (rows, cols) = layout(10, 5);
        let layout = SheetLayout::new(&rows, &cols);
        assert_eq!(layout.row_at_y(-5), 0);
        assert_eq!(layout.row_at_y(0), 0);
        assert_eq!(layout.row_at_y(19), 0);
        assert_eq!(layout.row_at_y(20), 1);
        assert_eq!(layout.row_at_y(199), 9);
        assert_eq!(layout.row_at_y(200), 10);
    }

    #[test]
    fn test_hidden_column_takes_no_space() {
        let (rows, mut cols) = layout(2, 5);
        cols[1].is_visible = false;
        let layout = SheetLayout::new(&rows, &cols);
        assert_eq!(layout.total_width(), 200);
        assert_eq!(layout.col_left(2), Some(50));
        assert_eq!(layout.col_at_x(49), 0);
        assert_eq!(layout.col_at_x(50), 2);
        assert_eq!(layout.col_width(1), 0);
    }

    #[test]
    fn test_trailing_hidden_rows() {
        let (mut rows, cols) = layout(3, 1);
        rows[2].is_visible = false;
        let layout = SheetLayout::new(&rows, &cols);
        assert_eq!(layout.row_at_y(39), 1);
        assert_eq!(layout.row_at_y(40), 3);
    }

    #[test]
    fn test_resize_handles() {
        let (rows, mut cols) = layout(4, 4);
        cols[2].is_visible = false;
        let layout = SheetLayout::new(&rows, &cols);
        // leading edge of column 0 offers nothing
        assert_eq!(layout.column_resize_handle(0), None);
        assert_eq!(layout.column_resize_handle(2), None);
        assert_eq!(layout.column_resize_handle(47), Some(0));
        assert_eq!(layout.column_resize_handle(53), Some(0));
        assert_eq!(layout.column_resize_handle(54), None);
        // boundary at 100 is shared by column 1 and hidden column 2
        assert_eq!(layout.column_resize_handle(100), Some(1));
        assert_eq!(layout.row_resize_handle(41), Some(1));
        assert_eq!(layout.row_resize_handle(30), None);
    }

    #[test]
    fn test_range_rect() {
        let (rows, cols) = layout(10, 5);
        let layout = SheetLayout::new(&rows, &cols);
        let rect = layout.range_rect(&SheetRange::new(1, 1, 2, 3)).unwrap();
        assert_eq!(rect, CellRect { x: 50, y: 20, width: 150, height: 40 });
        assert_eq!(layout.range_rect(&SheetRange::UNSET), None);
    }
}
