//! Strip background colors.
//!
//! Colors travel as `#RRGGBB` hex strings, the same shape the editing UI
//! palette uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoothError, Result};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const CREAM: Self = Self::new(0xFB, 0xF0, 0xDD);
    pub const GOLD: Self = Self::new(0xE9, 0xA5, 0x4D);
    pub const PINK: Self = Self::new(0xFF, 0xC0, 0xCB);

    /// The background palette offered by the editing surface.
    pub const PALETTE: [(&'static str, Self); 5] = [
        ("black", Self::BLACK),
        ("white", Self::WHITE),
        ("cream", Self::CREAM),
        ("gold", Self::GOLD),
        ("pink", Self::PINK),
    ];

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive). Palette
    /// names (`white`, `pink`, ...) are accepted as well.
    pub fn parse(value: &str) -> Result<Self> {
        let named = Self::PALETTE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value));
        if let Some((_, color)) = named {
            return Ok(*color);
        }

        let digits = value.strip_prefix('#').unwrap_or(value);
        let bytes = hex::decode(digits).map_err(|_| BoothError::InvalidColor {
            value: value.to_string(),
        })?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(BoothError::InvalidColor {
                value: value.to_string(),
            }),
        }
    }

    /// The color as an `image` crate RGBA pixel.
    #[must_use]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 0xFF])
    }
}

impl Default for Rgb {
    /// White, the default strip background.
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode_upper([self.r, self.g, self.b]))
    }
}

impl FromStr for Rgb {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
