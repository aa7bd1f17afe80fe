//! Data types for the grid engine.

mod cell;
mod config;
mod range;
mod selection;
mod style;

pub use cell::*;
pub use config::*;
pub use range::*;
pub use selection::*;
pub use style::*;
