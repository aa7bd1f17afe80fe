//! Structured error types for gridsheet.
//!
//! Out-of-range indices and vetoed transitions are not errors: those are
//! silent no-ops or `false` returns. Only resource and input failures land here.

use std::collections::TryReserveError;

/// All errors that can occur while growing, configuring or scripting a sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// Cell storage could not be grown.
    #[error("Cell storage allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Requested dimensions do not fit the index space.
    #[error("Sheet capacity exceeded: {rows} rows x {cols} columns")]
    Capacity { rows: usize, cols: usize },

    /// Invalid cell reference or range literal.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Invalid `#RRGGBB` color literal.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Configuration or script JSON could not be decoded.
    #[error("JSON: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A replay script referenced something it cannot drive.
    #[error("Script error: {0}")]
    Script(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetError>;
