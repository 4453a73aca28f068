//! Strip rasterization.
//!
//! [`Rasterizer`] is the consumed capability that turns a resolved
//! [`StripLayout`] into a flat image blob. [`StripRasterizer`] is the
//! built-in backend (the stand-in for the browser's canvas capture), and
//! [`MockRasterizer`] records calls for tests.

mod font;

use std::sync::Mutex;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, instrument};

use crate::error::{BoothError, Result};
use crate::filters::PhotoFilter;
use crate::payload::ImagePayload;
use crate::strip::{LayoutMode, StripLayout};

/// Renders a resolved strip layout into an image blob.
///
/// Implementations never draw interactive sticker controls: export consumes
/// the Presentation layout variant, which has them suppressed.
pub trait Rasterizer {
    fn rasterize(&self, layout: &StripLayout<'_>) -> Result<ImagePayload>;
}

/// Built-in rasterizer backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripRasterizer;

impl StripRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for StripRasterizer {
    #[instrument(skip_all, fields(photos = layout.photos.len(), stickers = layout.stickers.len()))]
    fn rasterize(&self, layout: &StripLayout<'_>) -> Result<ImagePayload> {
        let mut canvas =
            RgbaImage::from_pixel(layout.width, layout.height, layout.background.to_rgba());

        for slot in &layout.photos {
            let decoded = slot.image.decode()?.to_rgba8();
            let mut resized = imageops::resize(
                &decoded,
                slot.rect.width.max(1),
                slot.rect.height.max(1),
                FilterType::Lanczos3,
            );
            layout.filter.apply(&mut resized);
            imageops::overlay(
                &mut canvas,
                &resized,
                i64::from(slot.rect.x),
                i64::from(slot.rect.y),
            );
        }

        if let Some(date) = &layout.date {
            font::draw_label(&mut canvas, &date.text, date.center_x, date.y, date.height);
        }

        // Stickers sit above photos and the stamp. Positions may hang off
        // the strip edge; overlay clips.
        for sticker in &layout.stickers {
            let decoded = sticker.image.decode()?.to_rgba8();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let size = sticker.size.round().max(1.0) as u32;
            let resized = imageops::resize(&decoded, size, size, FilterType::Lanczos3);
            #[allow(clippy::cast_possible_truncation)]
            imageops::overlay(
                &mut canvas,
                &resized,
                sticker.x.round() as i64,
                sticker.y.round() as i64,
            );
        }

        debug!(width = layout.width, height = layout.height, "Strip rasterized");
        ImagePayload::encode_png(&canvas)
    }
}

/// A call recorded by [`MockRasterizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExport {
    pub mode: LayoutMode,
    pub background: crate::color::Rgb,
    pub filter: PhotoFilter,
    pub photo_count: usize,
    pub sticker_count: usize,
    pub controls_present: bool,
}

/// Rasterizer test double: records what each call saw and optionally fails.
#[derive(Debug, Default)]
pub struct MockRasterizer {
    calls: Mutex<Vec<RecordedExport>>,
    failure: Mutex<Option<String>>,
}

impl MockRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `reason`.
    pub fn fail_next(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    /// Everything recorded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedExport> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent recorded call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedExport> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Rasterizer for MockRasterizer {
    fn rasterize(&self, layout: &StripLayout<'_>) -> Result<ImagePayload> {
        self.calls.lock().unwrap().push(RecordedExport {
            mode: layout.mode,
            background: layout.background,
            filter: layout.filter,
            photo_count: layout.photos.len(),
            sticker_count: layout.stickers.len(),
            controls_present: layout.stickers.iter().any(|s| s.controls),
        });
        if let Some(reason) = self.failure.lock().unwrap().take() {
            return Err(BoothError::ExportFailure { reason });
        }
        ImagePayload::encode_png(&RgbaImage::from_pixel(1, 1, layout.background.to_rgba()))
    }
}
