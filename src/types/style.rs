use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Horizontal text justification inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Right,
    Center,
    Fill,
}

bitflags! {
    /// Which sides of a cell carry a border
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BorderMask: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const ALL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Serialize for BorderMask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for BorderMask {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(BorderMask::from_bits_truncate(bits))
    }
}

/// Border drawn around a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBorder {
    pub mask: BorderMask,
    /// Line width in pixels
    pub width: u32,
    pub color: Rgba,
}

/// Formatting attributes of a cell.
///
/// A cell record may carry a full override; otherwise the effective value is
/// resolved from the column and the sheet defaults (see [`crate::styles`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellAttributes {
    pub justification: Justification,
    /// Font description string (e.g. "Sans 10"), `None` means the toolkit default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    pub foreground: Rgba,
    pub background: Rgba,
    pub border: CellBorder,
    pub is_editable: bool,
    pub is_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
}

impl Default for CellAttributes {
    fn default() -> Self {
        Self {
            justification: Justification::Left,
            font: None,
            foreground: Rgba::BLACK,
            background: Rgba::WHITE,
            border: CellBorder::default(),
            is_editable: true,
            is_visible: true,
            css_class: None,
        }
    }
}
