//! Encoded image payloads.
//!
//! A payload is the opaque unit handed from the capture sequencer to the
//! composition model: a compressed image blob plus its container format.
//! Payloads can round-trip through `data:` URLs, matching the wire shape
//! produced by canvas snapshots and file-reader uploads.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{BoothError, Result};

/// Container format of an encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    Jpeg,
    Png,
}

impl PayloadFormat {
    /// MIME type for the format.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    const fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// An encoded image blob.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    format: PayloadFormat,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    /// Wrap already-encoded bytes. The caller asserts the format matches.
    #[must_use]
    pub fn from_encoded(format: PayloadFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Encode a raster as JPEG, the snapshot wire format.
    pub fn encode_jpeg(image: &DynamicImage) -> Result<Self> {
        let mut bytes = Vec::new();
        // JPEG has no alpha; flatten first so encoding cannot fail on RGBA.
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .map_err(|e| BoothError::ImageProcessing(e.to_string()))?;
        Ok(Self {
            format: PayloadFormat::Jpeg,
            bytes,
        })
    }

    /// Encode a raster as PNG, the export wire format.
    pub fn encode_png(image: &RgbaImage) -> Result<Self> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| BoothError::ImageProcessing(e.to_string()))?;
        Ok(Self {
            format: PayloadFormat::Png,
            bytes,
        })
    }

    /// Decode the payload back into a raster.
    pub fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory_with_format(&self.bytes, self.format.image_format())
            .map_err(|e| BoothError::ImageProcessing(e.to_string()))
    }

    /// Read `(width, height)` from the encoded header without a full decode.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        image::ImageReader::with_format(Cursor::new(&self.bytes), self.format.image_format())
            .into_dimensions()
            .map_err(|e| BoothError::ImageProcessing(e.to_string()))
    }

    /// Container format of the payload.
    #[must_use]
    pub const fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Raw encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the payload, returning the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Render as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime(), BASE64.encode(&self.bytes))
    }

    /// Parse a `data:image/...;base64,` URL back into a payload.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| BoothError::ImageProcessing("not a data URL".into()))?;
        let (mime, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| BoothError::ImageProcessing("data URL is not base64".into()))?;
        let format = match mime {
            "image/jpeg" => PayloadFormat::Jpeg,
            "image/png" => PayloadFormat::Png,
            other => {
                return Err(BoothError::ImageProcessing(format!(
                    "unsupported data URL media type: {other}"
                )))
            }
        };
        let bytes = BASE64
            .decode(data)
            .map_err(|e| BoothError::ImageProcessing(e.to_string()))?;
        Ok(Self { format, bytes })
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the payload holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
