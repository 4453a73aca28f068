//! File decode capability for uploaded images.
//!
//! Uploads substitute for live capture: a batch of user-selected files is
//! filtered to image types and decoded into payloads, preserving selection
//! order. Only a batch with zero usable images is an error.

use std::fs;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, warn};

use crate::error::{BoothError, Result};
use crate::payload::{ImagePayload, PayloadFormat};

/// A user-selected file, as delivered by the picker.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name, for messages only.
    pub name: String,
    /// Declared MIME type, when the picker supplies one.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, deriving the MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BoothError::ImageNotFound {
                path: path.display().to_string(),
            });
        }
        let bytes = fs::read(path)?;
        let content_type = ImageFormat::from_path(path)
            .ok()
            .map(|f| f.to_mime_type().to_string());
        Ok(Self {
            name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            content_type,
            bytes,
        })
    }
}

/// Decode a single upload into a payload.
///
/// Rejects files whose declared MIME type is not `image/*`, and files whose
/// content does not decode as an image regardless of what they claim.
pub fn decode_upload(file: &UploadFile) -> Result<ImagePayload> {
    if let Some(mime) = &file.content_type {
        if !mime.starts_with("image/") {
            return Err(BoothError::InvalidUploadType { rejected: 1 });
        }
    }

    let format = image::guess_format(&file.bytes)
        .map_err(|_| BoothError::InvalidUploadType { rejected: 1 })?;

    match format {
        // Native wire formats pass through untranscoded.
        ImageFormat::Jpeg => {
            validate(&file.bytes, format)?;
            Ok(ImagePayload::from_encoded(PayloadFormat::Jpeg, file.bytes.clone()))
        }
        ImageFormat::Png => {
            validate(&file.bytes, format)?;
            Ok(ImagePayload::from_encoded(PayloadFormat::Png, file.bytes.clone()))
        }
        // Anything else decodable (gif, webp, bmp, ...) is normalized to PNG.
        other => {
            let decoded = image::load_from_memory_with_format(&file.bytes, other)
                .map_err(|_| BoothError::InvalidUploadType { rejected: 1 })?;
            ImagePayload::encode_png(&decoded.to_rgba8())
        }
    }
}

fn validate(bytes: &[u8], format: ImageFormat) -> Result<()> {
    image::load_from_memory_with_format(bytes, format)
        .map(|_| ())
        .map_err(|_| BoothError::InvalidUploadType { rejected: 1 })
}

/// Decode a whole batch, filtering out non-image files.
///
/// Returns payloads in file-selection order. Errors only when the batch
/// contains no valid image at all, leaving the caller's state untouched.
pub fn decode_batch(files: Vec<UploadFile>) -> Result<Vec<ImagePayload>> {
    let total = files.len();
    let mut photos = Vec::with_capacity(total);
    for file in &files {
        match decode_upload(file) {
            Ok(payload) => {
                debug!(name = %file.name, len = payload.len(), "Upload decoded");
                photos.push(payload);
            }
            Err(err) => {
                warn!(name = %file.name, error = %err, "Upload skipped");
            }
        }
    }
    if photos.is_empty() {
        return Err(BoothError::InvalidUploadType { rejected: total });
    }
    Ok(photos)
}
