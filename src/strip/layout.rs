//! Strip layout resolution.
//!
//! Turns a [`StripState`](super::StripState) into absolute pixel geometry:
//! photos stacked vertically inside a fixed-width frame, the date stamp
//! overlaying the last photo, stickers scaled about their centers. The
//! Presentation mode is what the rasterizer consumes; Interactive adds the
//! sticker control affordances the editing surface shows.

use serde::Serialize;

use super::{StickerId, StripState, STICKER_BASE_SIZE};
use crate::color::Rgb;
use crate::error::Result;
use crate::filters::PhotoFilter;
use crate::payload::ImagePayload;

/// Fixed strip width in pixels.
pub const STRIP_WIDTH: u32 = 320;

/// Frame padding around the photo column.
pub const STRIP_PADDING: u32 = 16;

/// Vertical gap between photos.
pub const PHOTO_GAP: u32 = 12;

/// Pixel height of the date stamp glyphs.
pub const DATE_STAMP_HEIGHT: u32 = 14;

/// Inset of the date stamp from the last photo's bottom edge.
const DATE_STAMP_INSET: u32 = 10;

/// Which audience the layout is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Editing view: sticker control affordances included.
    Interactive,
    /// Export/preview view: controls suppressed.
    Presentation,
}

/// Integer rectangle in strip coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One photo resolved to its slot in the column.
#[derive(Debug, Serialize)]
pub struct PhotoSlot<'a> {
    pub index: usize,
    #[serde(skip)]
    pub image: &'a ImagePayload,
    pub rect: Rect,
}

/// One sticker resolved to its drawn rectangle.
#[derive(Debug, Serialize)]
pub struct StickerPlacement<'a> {
    pub id: StickerId,
    #[serde(skip)]
    pub image: &'a ImagePayload,
    /// Top-left of the drawn (scaled) square.
    pub x: f32,
    pub y: f32,
    /// Edge length of the drawn square.
    pub size: f32,
    pub scale: f32,
    /// Whether zoom/delete affordances accompany the sticker.
    pub controls: bool,
}

/// The date stamp resolved to its anchor.
#[derive(Debug, Clone, Serialize)]
pub struct DateLabel {
    pub text: String,
    /// Horizontal center of the stamp.
    pub center_x: u32,
    /// Top of the glyph row.
    pub y: u32,
    pub height: u32,
}

/// A fully resolved strip: everything the rasterizer needs.
#[derive(Debug, Serialize)]
pub struct StripLayout<'a> {
    pub mode: LayoutMode,
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub filter: PhotoFilter,
    pub photos: Vec<PhotoSlot<'a>>,
    pub stickers: Vec<StickerPlacement<'a>>,
    pub date: Option<DateLabel>,
}

/// Resolve absolute geometry for the given state.
pub(super) fn resolve(state: &StripState, mode: LayoutMode) -> Result<StripLayout<'_>> {
    let inner_width = STRIP_WIDTH - 2 * STRIP_PADDING;

    let mut photos = Vec::with_capacity(state.photos().len());
    let mut cursor = STRIP_PADDING;
    for (index, image) in state.photos().iter().enumerate() {
        let (w, h) = image.dimensions()?;
        // Fit to the column width, preserving aspect ratio.
        let height = if w == 0 {
            inner_width
        } else {
            ((u64::from(h) * u64::from(inner_width)) / u64::from(w)).max(1) as u32
        };
        photos.push(PhotoSlot {
            index,
            image,
            rect: Rect {
                x: STRIP_PADDING,
                y: cursor,
                width: inner_width,
                height,
            },
        });
        cursor += height + PHOTO_GAP;
    }
    let height = if photos.is_empty() {
        2 * STRIP_PADDING
    } else {
        cursor - PHOTO_GAP + STRIP_PADDING
    };

    // The stamp overlays the bottom of the last photo.
    let date = match (state.date_enabled(), photos.last()) {
        (true, Some(last)) => Some(DateLabel {
            text: state.date_text().to_string(),
            center_x: STRIP_WIDTH / 2,
            y: (last.rect.y + last.rect.height)
                .saturating_sub(DATE_STAMP_INSET + DATE_STAMP_HEIGHT),
            height: DATE_STAMP_HEIGHT,
        }),
        _ => None,
    };

    let stickers = state
        .stickers()
        .map(|(id, sticker)| {
            // Scale is applied about the unscaled box center.
            let base = STICKER_BASE_SIZE as f32;
            let size = base * sticker.scale;
            let center_x = sticker.x + base / 2.0;
            let center_y = sticker.y + base / 2.0;
            StickerPlacement {
                id,
                image: &sticker.image,
                x: center_x - size / 2.0,
                y: center_y - size / 2.0,
                size,
                scale: sticker.scale,
                controls: mode == LayoutMode::Interactive,
            }
        })
        .collect();

    Ok(StripLayout {
        mode,
        width: STRIP_WIDTH,
        height,
        background: state.background(),
        filter: state.filter(),
        photos,
        stickers,
        date,
    })
}
