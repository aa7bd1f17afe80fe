//! Color values for cell attributes.
//!
//! Colors are stored as 8-bit RGBA and parsed from `#RRGGBB` or `#AARRGGBB`
//! literals, the same forms the configuration file uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SheetError;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Rgba = Rgba {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0,
    };

    /// Opaque color from RGB components.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0xFF,
        }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| hex.get(i..i + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                alpha: byte(0)?,
                red: byte(2)?,
                green: byte(4)?,
                blue: byte(6)?,
            }),
            _ => None,
        }
    }

    /// `#RRGGBB` for opaque colors, `#AARRGGBB` otherwise.
    pub fn to_hex(&self) -> String {
        if self.alpha == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.alpha, self.red, self.green, self.blue
            )
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| SheetError::InvalidColor(s.to_string()))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_colors() {
        let test_cases = [
            ("#FF0000", Rgba::rgb(0xFF, 0, 0)),
            ("00FF00", Rgba::rgb(0, 0xFF, 0)),
            ("#0000ff", Rgba::rgb(0, 0, 0xFF)),
            ("#FFFFFF", Rgba::WHITE),
            ("#000000", Rgba::BLACK),
        ];

        for (input, expected) in test_cases {
            assert_eq!(Rgba::from_hex(input), Some(expected), "parsing {input}");
        }
    }

    #[test]
    fn test_parse_argb() {
        let c = Rgba::from_hex("#80112233").unwrap();
        assert_eq!(c.alpha, 0x80);
        assert_eq!(c.red, 0x11);
        assert_eq!(c.to_hex(), "#80112233");
    }

    #[test]
    fn test_reject_malformed() {
        assert!(Rgba::from_hex("#FFF").is_none());
        assert!(Rgba::from_hex("#GG0000").is_none());
        assert!(Rgba::from_hex("#ÄÄÄ").is_none());
        assert!("red".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgba::rgb(0x12, 0xAB, 0x00)).unwrap();
        assert_eq!(json, "\"#12AB00\"");
        let back: Rgba = serde_json::from_str("\"#CFD8E8\"").unwrap();
        assert_eq!(back, Rgba::rgb(0xCF, 0xD8, 0xE8));
    }
}
