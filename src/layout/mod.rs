//! Coordinate mapping between widget pixels and logical indices.
//!
//! This module handles:
//! - Cached leading offsets per row/column, skipping hidden entries
//! - Binary search for the row/column under a pixel
//! - Resize handle detection on title boundaries
//! - Viewport state (scroll position, visible range)

mod sheet_layout;
mod viewport;

pub use sheet_layout::{CellRect, SheetLayout, DRAG_WIDTH};
pub use viewport::Viewport;
