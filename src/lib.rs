//! gridsheet - headless spreadsheet grid engine
//!
//! Everything a spreadsheet widget needs except the drawing:
//! - Sparse cell storage with per-row and per-column descriptors
//! - Pixel to cell mapping with resize handles and scrolling
//! - Active cell, range selection and drag gestures (select, move, resize)
//! - Per-cell attribute overrides on top of sheet defaults
//!
//! The host plugs in a paint surface, an editor factory, a signal sink and a
//! timer service, then feeds pointer events in widget pixels.
//!
//! # Usage
//!
//! ```
//! use gridsheet::{Modifiers, Sheet};
//!
//! let mut sheet = Sheet::new(10, 5, Some("demo")).unwrap();
//! sheet.set_cell_text(2, 1, "hello").unwrap();
//! let rect = sheet.cell_area(2, 1).unwrap();
//! sheet.button_press(rect.x + 1, rect.y + 1, Modifiers::empty());
//! sheet.button_release(rect.x + 1, rect.y + 1);
//! assert_eq!(sheet.active_cell().row, 2);
//! ```

pub mod cell_ref;
pub mod color;
pub mod editor;
pub mod error;
pub mod grid;
pub mod layout;
pub mod render;
pub mod sheet;
pub mod styles;
pub mod types;

pub use color::Rgba;
pub use editor::{EditorFactory, EditorSession, TextEditor, TextEditorFactory};
pub use error::{Result, SheetError};
pub use render::{CellRenderData, NullSurface, PaintSurface};
pub use sheet::{
    Gesture, HitTarget, ManualScheduler, Modifiers, NoSignals, Scheduler, Sheet, SheetSignals,
    TimerId,
};
pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
