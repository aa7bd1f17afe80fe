//! Paint surface trait for pluggable rendering hosts.
//!
//! The sheet never draws. It tells a [`PaintSurface`] which logical area became
//! stale and hands painters [`CellRenderData`] snapshots on request.

use crate::layout::CellRect;
use crate::types::{CellAttributes, CellState, SheetRange};

/// Data needed to render a single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRenderData {
    pub row: i32,
    pub col: i32,
    pub text: Option<String>,
    /// Effective attributes (override, column and sheet defaults resolved)
    pub attributes: CellAttributes,
    pub state: CellState,
    /// Bounds in widget coordinates
    pub rect: CellRect,
    pub is_active: bool,
}

/// Receives repaint requests
pub trait PaintSurface {
    /// Cells of `range` need repainting.
    fn invalidate(&mut self, range: &SheetRange);

    /// Everything, title areas included, needs repainting.
    fn invalidate_all(&mut self);
}

/// Surface that ignores every request; used until the host installs one.
#[derive(Debug, Default)]
pub struct NullSurface;

impl PaintSurface for NullSurface {
    fn invalidate(&mut self, _range: &SheetRange) {}

    fn invalidate_all(&mut self) {}
}
