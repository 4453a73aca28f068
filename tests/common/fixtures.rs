//! Test fixture helpers for creating temporary test data.
//!
//! Provides utilities for generating image payloads and temporary
//! directories with image files that are automatically cleaned up.

use std::path::PathBuf;

use booth::payload::ImagePayload;
use booth::upload::UploadFile;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

/// A solid-color PNG payload.
#[must_use]
pub fn png_payload(width: u32, height: u32, color: [u8; 4]) -> ImagePayload {
    ImagePayload::encode_png(&RgbaImage::from_pixel(width, height, Rgba(color)))
        .expect("encode fixture png")
}

/// A solid-color JPEG payload.
#[must_use]
pub fn jpeg_payload(width: u32, height: u32, color: [u8; 3]) -> ImagePayload {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    ImagePayload::encode_jpeg(&img).expect("encode fixture jpeg")
}

/// An in-memory upload of a solid-color PNG.
#[must_use]
pub fn png_upload(name: &str, color: [u8; 4]) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: png_payload(24, 24, color).into_bytes(),
    }
}

/// An upload that only claims to be an image.
#[must_use]
pub fn bogus_upload(name: &str) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        content_type: Some("text/plain".to_string()),
        bytes: b"definitely not pixels".to_vec(),
    }
}

/// Temporary directory holding generated image files.
///
/// The directory is cleaned up when the value is dropped.
pub struct TestImages {
    pub dir: TempDir,
}

impl TestImages {
    /// Create `count` solid-color PNGs named `photo-1.png`, `photo-2.png`, ...
    /// Colors vary by index for visual distinction.
    #[must_use]
    pub fn create_batch(count: u8, size: u32) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        for i in 0..count {
            let color = [
                i.wrapping_mul(40).wrapping_add(40),
                i.wrapping_mul(80),
                200u8.wrapping_sub(i.wrapping_mul(30)),
                255,
            ];
            let payload = png_payload(size, size, color);
            std::fs::write(dir.path().join(format!("photo-{}.png", i + 1)), payload.as_bytes())
                .expect("write fixture image");
        }
        Self { dir }
    }

    /// Path of the generated image with 1-based index `i`.
    #[must_use]
    pub fn path(&self, i: u8) -> PathBuf {
        self.dir.path().join(format!("photo-{i}.png"))
    }

    /// Write a non-image file alongside the photos and return its path.
    #[must_use]
    pub fn write_text_file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, "not an image").expect("write text fixture");
        path
    }
}
