//! Cosmetic photo filters.
//!
//! A filter is a named tag selecting a per-pixel transform applied by the
//! rasterizer; the composition model only stores the tag.

use clap::ValueEnum;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Cosmetic transform applied to every photo in the strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoFilter {
    /// Identity: photos unchanged.
    #[default]
    None,
    /// Black & white.
    Grayscale,
    Sepia,
    /// Red boost, blue cut.
    Warm,
    /// Blue boost, red cut.
    Cold,
    /// Desaturated with a slight blue cast.
    Cool,
}

impl PhotoFilter {
    /// Display name matching the editing surface's filter buttons.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::None => "No Filter",
            Self::Grayscale => "Black & White",
            Self::Sepia => "Sepia",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
            Self::Cool => "Cool",
        }
    }

    /// Apply the transform in place.
    pub fn apply(self, image: &mut RgbaImage) {
        if self == Self::None {
            return;
        }
        for pixel in image.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            pixel.0 = self.transform([r, g, b, a]);
        }
    }

    fn transform(self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
        let out = match self {
            Self::None => [rf, gf, bf],
            Self::Grayscale => {
                // ITU-R BT.601 luma weights.
                let y = 0.299 * rf + 0.587 * gf + 0.114 * bf;
                [y, y, y]
            }
            Self::Sepia => [
                0.393 * rf + 0.769 * gf + 0.189 * bf,
                0.349 * rf + 0.686 * gf + 0.168 * bf,
                0.272 * rf + 0.534 * gf + 0.131 * bf,
            ],
            Self::Warm => [rf * 1.12 + 10.0, gf * 1.02, bf * 0.88],
            Self::Cold => [rf * 0.88, gf * 1.02, bf * 1.12 + 10.0],
            Self::Cool => {
                let y = 0.299 * rf + 0.587 * gf + 0.114 * bf;
                // Pull halfway toward luma, then tint the blue channel.
                [
                    (rf + y) * 0.5 * 0.95,
                    (gf + y) * 0.5,
                    (bf + y) * 0.5 * 1.10 + 6.0,
                ]
            }
        };
        [
            clamp_channel(out[0]),
            clamp_channel(out[1]),
            clamp_channel(out[2]),
            a,
        ]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
