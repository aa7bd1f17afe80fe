//! Rendering collaborators.
//!
//! This module provides:
//! - The paint surface trait the sheet reports stale areas to
//! - Per-cell render snapshots for painters

pub mod backend;

pub use backend::{CellRenderData, NullSurface, PaintSurface};
