use serde::{Deserialize, Serialize};

use super::SelectionMode;
use crate::color::Rgba;
use crate::error::Result;

/// Default column width in pixels
pub const DEFAULT_COLUMN_WIDTH: i32 = 80;

/// Columns narrower than this are clamped up
pub const MIN_COLUMN_WIDTH: i32 = 10;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: i32 = 24;

/// Rows lower than this are clamped up
pub const MIN_ROW_HEIGHT: i32 = 1;

/// Default width of the row title area in pixels
pub const DEFAULT_ROW_TITLE_WIDTH: i32 = 60;

/// Default height of the column title area in pixels
pub const DEFAULT_COLUMN_TITLE_HEIGHT: i32 = 24;

/// Autoscroll timer period in milliseconds
pub const DEFAULT_AUTOSCROLL_INTERVAL_MS: u32 = 20;

/// Sheet-wide configuration.
///
/// Every field has a default so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    pub default_row_height: i32,
    pub default_column_width: i32,
    pub min_row_height: i32,
    pub min_column_width: i32,
    /// Width of the row title area (used when row titles are visible)
    pub row_title_width: i32,
    /// Height of the column title area (used when column titles are visible)
    pub column_title_height: i32,
    pub row_titles_visible: bool,
    pub column_titles_visible: bool,
    pub rows_resizable: bool,
    pub columns_resizable: bool,
    /// Scroll toward the pointer while a drag gesture leaves the view
    pub autoscroll: bool,
    pub autoscroll_interval_ms: u32,
    /// Locked sheets reject editing and move/resize gestures
    pub locked: bool,
    pub selection_mode: SelectionMode,
    /// Sheet default cell background
    pub background: Rgba,
    /// Sheet default text color
    pub foreground: Rgba,
    pub grid_color: Rgba,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            min_row_height: MIN_ROW_HEIGHT,
            min_column_width: MIN_COLUMN_WIDTH,
            row_title_width: DEFAULT_ROW_TITLE_WIDTH,
            column_title_height: DEFAULT_COLUMN_TITLE_HEIGHT,
            row_titles_visible: true,
            column_titles_visible: true,
            rows_resizable: true,
            columns_resizable: true,
            autoscroll: true,
            autoscroll_interval_ms: DEFAULT_AUTOSCROLL_INTERVAL_MS,
            locked: false,
            selection_mode: SelectionMode::Multiple,
            background: Rgba::WHITE,
            foreground: Rgba::BLACK,
            grid_color: Rgba::rgb(0xCC, 0xCC, 0xCC),
        }
    }
}

impl SheetConfig {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or a color literal is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SheetConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp sizes to their minimums.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.min_row_height = self.min_row_height.max(1);
        self.min_column_width = self.min_column_width.max(1);
        self.default_row_height = self.default_row_height.max(self.min_row_height);
        self.default_column_width = self.default_column_width.max(self.min_column_width);
        self.row_title_width = self.row_title_width.max(0);
        self.column_title_height = self.column_title_height.max(0);
        self
    }
}
