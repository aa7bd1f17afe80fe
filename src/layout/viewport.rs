//! Viewport state: scroll offsets, widget size and the visible index range.

use super::{CellRect, SheetLayout};
use crate::types::{CellPos, ScrollAlign, SheetRange};

/// Viewport state - represents the visible area of the sheet widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal scroll position in cell-area coordinates
    pub scroll_x: i32,
    /// Vertical scroll position in cell-area coordinates
    pub scroll_y: i32,
    /// Widget width in pixels, title areas included
    pub width: i32,
    /// Widget height in pixels, title areas included
    pub height: i32,
    /// First/last partially visible row and column
    visible: SheetRange,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0,
            scroll_y: 0,
            width: 800,
            height: 600,
            visible: SheetRange::UNSET,
        }
    }

    /// Width available to cells once the row title area is taken off.
    pub fn content_width(&self, layout: &SheetLayout) -> i32 {
        (self.width - layout.header_width()).max(0)
    }

    /// Height available to cells once the column title area is taken off.
    pub fn content_height(&self, layout: &SheetLayout) -> i32 {
        (self.height - layout.header_height()).max(0)
    }

    /// The range computed by the last [`Viewport::recalc_visible_range`].
    pub fn visible_range(&self) -> SheetRange {
        self.visible
    }

    /// Recompute the first/last partially visible row and column.
    pub fn recalc_visible_range(&mut self, layout: &SheetLayout) {
        let max_row = i32::try_from(layout.row_count()).unwrap_or(i32::MAX) - 1;
        let max_col = i32::try_from(layout.col_count()).unwrap_or(i32::MAX) - 1;
        if max_row < 0 || max_col < 0 {
            self.visible = SheetRange::UNSET;
            return;
        }
        let last_x = self.scroll_x + (self.content_width(layout) - 1).max(0);
        let last_y = self.scroll_y + (self.content_height(layout) - 1).max(0);
        self.visible = SheetRange::new(
            layout.row_at_y(self.scroll_y).min(max_row),
            layout.col_at_x(self.scroll_x).min(max_col),
            layout.row_at_y(last_y).min(max_row),
            layout.col_at_x(last_x).min(max_col),
        );
    }

    /// Convert widget coordinates to cell-area coordinates
    pub fn to_sheet(&self, x: i32, y: i32, layout: &SheetLayout) -> (i32, i32) {
        (
            x - layout.header_width() + self.scroll_x,
            y - layout.header_height() + self.scroll_y,
        )
    }

    /// Convert cell-area coordinates to widget coordinates
    pub fn to_screen(&self, x: i32, y: i32, layout: &SheetLayout) -> (i32, i32) {
        (
            x - self.scroll_x + layout.header_width(),
            y - self.scroll_y + layout.header_height(),
        )
    }

    /// Logical cell under a widget pixel; indices past the last entry come back as `max + 1`.
    pub fn cell_at(&self, x: i32, y: i32, layout: &SheetLayout) -> CellPos {
        let (sx, sy) = self.to_sheet(x, y, layout);
        CellPos::new(layout.row_at_y(sy), layout.col_at_x(sx))
    }

    /// Cell rectangle in widget coordinates
    pub fn cell_area(&self, row: i32, col: i32, layout: &SheetLayout) -> Option<CellRect> {
        let rect = layout.cell_rect(row, col)?;
        let (x, y) = self.to_screen(rect.x, rect.y, layout);
        Some(CellRect { x, y, ..rect })
    }

    /// Clamp scroll position to valid range.
    pub fn clamp_scroll(&mut self, layout: &SheetLayout) {
        let max_x = (layout.total_width() - self.content_width(layout)).max(0);
        let max_y = (layout.total_height() - self.content_height(layout)).max(0);
        self.scroll_x = self.scroll_x.clamp(0, max_x);
        self.scroll_y = self.scroll_y.clamp(0, max_y);
    }

    /// Set absolute scroll position. Returns whether it changed.
    pub fn set_scroll(&mut self, x: i32, y: i32, layout: &SheetLayout) -> bool {
        let before = (self.scroll_x, self.scroll_y);
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
        self.recalc_visible_range(layout);
        before != (self.scroll_x, self.scroll_y)
    }

    /// Scroll by delta amounts. Returns whether the position changed.
    pub fn scroll_by(&mut self, delta_x: i32, delta_y: i32, layout: &SheetLayout) -> bool {
        self.set_scroll(
            self.scroll_x.saturating_add(delta_x),
            self.scroll_y.saturating_add(delta_y),
            layout,
        )
    }

    /// Resize the widget
    pub fn resize(&mut self, width: i32, height: i32, layout: &SheetLayout) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.clamp_scroll(layout);
        self.recalc_visible_range(layout);
    }

    /// Scroll so `row`/`col` sits at the requested edge. `None` leaves that axis alone.
    pub fn moveto(
        &mut self,
        row: i32,
        col: i32,
        row_align: Option<ScrollAlign>,
        col_align: Option<ScrollAlign>,
        layout: &SheetLayout,
    ) -> bool {
        let mut x = self.scroll_x;
        let mut y = self.scroll_y;
        if let (Some(align), Some(top)) = (row_align, layout.row_top(row)) {
            y = aligned(top, layout.row_height(row), self.content_height(layout), align);
        }
        if let (Some(align), Some(left)) = (col_align, layout.col_left(col)) {
            x = aligned(left, layout.col_width(col), self.content_width(layout), align);
        }
        self.set_scroll(x, y, layout)
    }

    /// Minimal scroll that brings the cell fully into view. Returns whether it moved.
    pub fn scroll_into_view(&mut self, row: i32, col: i32, layout: &SheetLayout) -> bool {
        let Some(rect) = layout.cell_rect(row, col) else {
            return false;
        };
        let x = nearest(self.scroll_x, rect.x, rect.width, self.content_width(layout));
        let y = nearest(self.scroll_y, rect.y, rect.height, self.content_height(layout));
        self.set_scroll(x, y, layout)
    }
}

fn aligned(lead: i32, size: i32, extent: i32, align: ScrollAlign) -> i32 {
    match align {
        ScrollAlign::Start => lead,
        ScrollAlign::Center => lead - (extent - size) / 2,
        ScrollAlign::End => lead + size - extent,
    }
}

fn nearest(scroll: i32, lead: i32, size: i32, extent: i32) -> i32 {
    if lead < scroll {
        lead
    } else if lead + size > scroll + extent {
        (lead + size - extent).min(lead)
    } else {
        scroll
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
    use crate::grid::{ColumnDescriptor, RowDescriptor};

    fn setup() -> (SheetLayout, Viewport) {
        let rows: Vec<_> = (0..100).map(|_| RowDescriptor::new(20)).collect();
        let cols: Vec<_> = (0..20).map(|_| ColumnDescriptor::new(50)).collect();
        let mut layout = SheetLayout::new(&rows, &cols);
        layout.set_header_dimensions(40, 20);
        let mut viewport = Viewport::new();
        viewport.resize(240, 220, &layout);
        (layout, viewport)
    }

    #[test]
    fn test_visible_range_at_origin() {
        let (_, viewport) = setup();
        // 200x200 content: columns 0..=3, rows 0..=9
        assert_eq!(viewport.visible_range(), SheetRange::new(0, 0, 9, 3));
    }

    #[test]
    fn test_visible_range_after_scroll() {
        let (layout, mut viewport) = setup();
        assert!(viewport.scroll_by(75, 30, &layout));
        assert_eq!(viewport.visible_range(), SheetRange::new(1, 1, 11, 5));
    }

    #[test]
    fn test_clamp_scroll() {
        let (layout, mut viewport) = setup();
        viewport.set_scroll(-10, 100_000, &layout);
        assert_eq!(viewport.scroll_x, 0);
        assert_eq!(viewport.scroll_y, 2000 - 200);
        assert!(!viewport.set_scroll(0, 1800, &layout));
    }

    #[test]
    fn test_cell_at_accounts_for_titles_and_scroll() {
        let (layout, mut viewport) = setup();
        assert_eq!(viewport.cell_at(40, 20, &layout), CellPos::new(0, 0));
        assert_eq!(viewport.cell_at(89, 39, &layout), CellPos::new(0, 0));
        assert_eq!(viewport.cell_at(90, 40, &layout), CellPos::new(1, 1));
        viewport.set_scroll(50, 20, &layout);
        assert_eq!(viewport.cell_at(40, 20, &layout), CellPos::new(1, 1));
    }

    #[test]
    fn test_cell_area_round_trips() {
        let (layout, mut viewport) = setup();
        viewport.set_scroll(33, 17, &layout);
        for (x, y) in [(40, 20), (57, 99), (239, 219), (100, 150)] {
            let pos = viewport.cell_at(x, y, &layout);
            let area = viewport.cell_area(pos.row, pos.col, &layout).unwrap();
            assert!(area.contains(x, y), "({x},{y}) not in {area:?}");
        }
    }

    #[test]
    fn test_moveto_alignments() {
        let (layout, mut viewport) = setup();
        viewport.moveto(10, 4, Some(ScrollAlign::Start), Some(ScrollAlign::Start), &layout);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (200, 200));
        viewport.moveto(10, 4, Some(ScrollAlign::End), None, &layout);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (200, 20));
        viewport.moveto(10, 4, Some(ScrollAlign::Center), Some(ScrollAlign::Center), &layout);
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (125, 110));
    }

    #[test]
    fn test_scroll_into_view() {
        let (layout, mut viewport) = setup();
        assert!(!viewport.scroll_into_view(3, 2, &layout));
        assert!(viewport.scroll_into_view(12, 0, &layout));
        assert_eq!(viewport.scroll_y, 60);
        assert!(viewport.scroll_into_view(0, 0, &layout));
        assert_eq!(viewport.scroll_y, 0);
    }
}
