//! Photo-strip composition model.
//!
//! Holds the edit-time state of a strip (ordered photos, filter,
//! background, date stamp and sticker overlays) and exposes the only
//! mutation path for it. Rendering is a projection: [`StripState::layout`]
//! resolves absolute geometry and [`StripState::request_export`] hands a
//! presentation-only layout to a [`Rasterizer`] without touching state.

mod layout;

pub use layout::{DateLabel, LayoutMode, PhotoSlot, Rect, StickerPlacement, StripLayout};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::color::Rgb;
use crate::error::{BoothError, Result};
use crate::filters::PhotoFilter;
use crate::payload::ImagePayload;
use crate::render::Rasterizer;

/// Floor below which a sticker cannot be shrunk.
pub const MIN_STICKER_SCALE: f32 = 0.2;

/// Unscaled sticker edge length in strip pixels.
pub const STICKER_BASE_SIZE: u32 = 60;

/// Scale change applied per zoom step by the editing surface.
pub const ZOOM_STEP: f32 = 0.1;

/// Deterministic export file name.
pub const EXPORT_FILE_NAME: &str = "photostrip.png";

/// Identifier of a sticker overlay. Generator-assigned, unique for the
/// lifetime of the state, never reused (also not across `retake`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StickerId(u64);

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sticker-{}", self.0)
    }
}

impl StickerId {
    /// Raw id value, for error reporting.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// A pointer position in strip coordinates. One shared representation for
/// mouse and touch input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A sticker overlay: image plus position (top-left, strip pixels) and
/// scale (applied about the sticker's center).
#[derive(Debug, Clone)]
pub struct Sticker {
    pub image: ImagePayload,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Exclusive drag bookkeeping: at most one sticker mid-drag per pointer
/// sequence, transitions only on begin/update/end.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        id: StickerId,
        /// Pointer position at drag start.
        anchor: Point,
        /// Sticker position at drag start.
        origin: Point,
    },
}

/// The editable strip state.
pub struct StripState {
    photos: Vec<ImagePayload>,
    filter: PhotoFilter,
    background: Rgb,
    date_enabled: bool,
    date_text: String,
    stickers: BTreeMap<StickerId, Sticker>,
    next_sticker: u64,
    drag: DragState,
}

impl StripState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            photos: Vec::new(),
            filter: PhotoFilter::None,
            background: Rgb::default(),
            date_enabled: false,
            date_text: default_date_text(),
            stickers: BTreeMap::new(),
            next_sticker: 0,
            drag: DragState::Idle,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn photos(&self) -> &[ImagePayload] {
        &self.photos
    }

    #[must_use]
    pub const fn filter(&self) -> PhotoFilter {
        self.filter
    }

    #[must_use]
    pub const fn background(&self) -> Rgb {
        self.background
    }

    #[must_use]
    pub const fn date_enabled(&self) -> bool {
        self.date_enabled
    }

    #[must_use]
    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    /// Stickers in stable z-order (insertion order).
    pub fn stickers(&self) -> impl Iterator<Item = (StickerId, &Sticker)> {
        self.stickers.iter().map(|(id, sticker)| (*id, sticker))
    }

    #[must_use]
    pub fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.get(&id)
    }

    #[must_use]
    pub fn sticker_count(&self) -> usize {
        self.stickers.len()
    }

    /// True while a sticker drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    // === Setters ===

    /// Seed (or fully replace, on retake) the photo sequence.
    pub fn set_photos(&mut self, photos: Vec<ImagePayload>) {
        info!(count = photos.len(), "Strip photos set");
        self.photos = photos;
    }

    pub fn set_filter(&mut self, filter: PhotoFilter) {
        debug!(?filter, "Filter set");
        self.filter = filter;
    }

    pub fn set_background(&mut self, color: Rgb) {
        debug!(color = %color, "Background set");
        self.background = color;
    }

    pub fn set_date_enabled(&mut self, enabled: bool) {
        self.date_enabled = enabled;
        if enabled && self.date_text.is_empty() {
            self.date_text = default_date_text();
        }
    }

    /// Edit the date stamp text. Has effect only while the stamp is enabled.
    pub fn set_date_text(&mut self, text: impl Into<String>) {
        if self.date_enabled {
            self.date_text = text.into();
        }
    }

    // === Stickers ===

    /// Add a sticker with a fresh id at `position`, or centered within the
    /// strip's current layout bounds when no position is given.
    pub fn add_sticker(&mut self, image: ImagePayload, position: Option<Point>) -> Result<StickerId> {
        let position = match position {
            Some(p) => p,
            None => {
                let bounds = self.layout(LayoutMode::Interactive)?;
                let half = STICKER_BASE_SIZE as f32 / 2.0;
                Point::new(
                    bounds.width as f32 / 2.0 - half,
                    bounds.height as f32 / 2.0 - half,
                )
            }
        };
        let id = StickerId(self.next_sticker);
        self.next_sticker += 1;
        self.stickers.insert(
            id,
            Sticker {
                image,
                x: position.x,
                y: position.y,
                scale: 1.0,
            },
        );
        info!(%id, x = position.x, y = position.y, "Sticker added");
        Ok(id)
    }

    /// Begin dragging a sticker. Exclusive: rejected while another drag is
    /// in progress.
    pub fn begin_drag(&mut self, id: StickerId, pointer: Point) -> Result<()> {
        if self.drag != DragState::Idle {
            return Err(BoothError::DragInProgress);
        }
        let sticker = self
            .stickers
            .get(&id)
            .ok_or(BoothError::StickerNotFound { id: id.value() })?;
        self.drag = DragState::Dragging {
            id,
            anchor: pointer,
            origin: Point::new(sticker.x, sticker.y),
        };
        trace!(%id, "Drag started");
        Ok(())
    }

    /// Move the dragged sticker by the pointer delta since drag start.
    ///
    /// Delta-based: the sticker never jumps to the pointer location. Events
    /// for a sticker that is not mid-drag are ignored, as a pointer-move
    /// arriving after the drag ended is normal input noise.
    pub fn update_drag(&mut self, id: StickerId, pointer: Point) {
        let DragState::Dragging {
            id: drag_id,
            anchor,
            origin,
        } = self.drag
        else {
            return;
        };
        if drag_id != id {
            return;
        }
        if let Some(sticker) = self.stickers.get_mut(&id) {
            sticker.x = origin.x + (pointer.x - anchor.x);
            sticker.y = origin.y + (pointer.y - anchor.y);
        }
    }

    /// Finish a drag. Ignored unless `id` is the sticker mid-drag.
    pub fn end_drag(&mut self, id: StickerId) {
        if let DragState::Dragging { id: drag_id, .. } = self.drag {
            if drag_id == id {
                trace!(%id, "Drag ended");
                self.drag = DragState::Idle;
            }
        }
    }

    /// Adjust a sticker's scale by `delta`, clamped to the 0.2 floor.
    pub fn zoom_sticker(&mut self, id: StickerId, delta: f32) -> Result<()> {
        let sticker = self
            .stickers
            .get_mut(&id)
            .ok_or(BoothError::StickerNotFound { id: id.value() })?;
        sticker.scale = (sticker.scale + delta).max(MIN_STICKER_SCALE);
        Ok(())
    }

    /// Remove a sticker. No-op when the id is absent.
    pub fn delete_sticker(&mut self, id: StickerId) {
        if self.stickers.remove(&id).is_some() {
            info!(%id, "Sticker deleted");
        }
        if let DragState::Dragging { id: drag_id, .. } = self.drag {
            if drag_id == id {
                self.drag = DragState::Idle;
            }
        }
    }

    // === Lifecycle ===

    /// Full reset back to a capture-ready state: photos, stickers, filter,
    /// date flag and background all return to defaults. Sticker ids are not
    /// reused afterwards.
    pub fn retake(&mut self) {
        info!("Strip retake");
        self.photos.clear();
        self.stickers.clear();
        self.filter = PhotoFilter::None;
        self.date_enabled = false;
        self.date_text = default_date_text();
        self.background = Rgb::default();
        self.drag = DragState::Idle;
    }

    // === Projection ===

    /// Resolve the strip into absolute pixel geometry.
    pub fn layout(&self, mode: LayoutMode) -> Result<StripLayout<'_>> {
        layout::resolve(self, mode)
    }

    /// Render the strip through the rasterizer capability.
    ///
    /// A read-only projection: the presentation layout (interactive sticker
    /// controls suppressed) is built from the state at the moment of the
    /// call, and failures leave the strip unchanged.
    pub fn request_export(&self, rasterizer: &dyn Rasterizer) -> Result<ImagePayload> {
        let layout = self.layout(LayoutMode::Presentation)?;
        rasterizer.rasterize(&layout).map_err(|err| match err {
            already @ BoothError::ExportFailure { .. } => already,
            other => BoothError::ExportFailure {
                reason: other.to_string(),
            },
        })
    }
}

impl Default for StripState {
    fn default() -> Self {
        Self::new()
    }
}

/// Today's date in the short local form the date stamp defaults to.
fn default_date_text() -> String {
    chrono::Local::now().format("%-m/%-d/%Y").to_string()
}
