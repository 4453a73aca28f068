//! Integration tests for layout resolution and rasterization.

use booth::color::Rgb;
use booth::error::BoothError;
use booth::filters::PhotoFilter;
use booth::render::{MockRasterizer, StripRasterizer};
use booth::strip::{LayoutMode, Point, StripState};

use crate::common::fixtures::{jpeg_payload, png_payload};

fn seeded_strip() -> StripState {
    let mut strip = StripState::new();
    strip.set_photos(vec![
        jpeg_payload(160, 120, [200, 40, 40]),
        png_payload(160, 120, [40, 200, 40, 255]),
    ]);
    strip
}

#[test]
fn test_export_reflects_state_at_call_time() {
    let mock = MockRasterizer::new();
    let mut strip = seeded_strip();
    strip.set_background(Rgb::PINK);
    strip.set_filter(PhotoFilter::Grayscale);

    strip.request_export(&mock).unwrap();

    // Values set after the call must not show up in the recorded export.
    strip.set_background(Rgb::BLACK);
    strip.set_filter(PhotoFilter::Sepia);

    let call = mock.last_call().unwrap();
    assert_eq!(call.background, Rgb::PINK);
    assert_eq!(call.filter, PhotoFilter::Grayscale);
    assert_eq!(call.photo_count, 2);
}

#[test]
fn test_export_uses_presentation_layout() {
    let mock = MockRasterizer::new();
    let mut strip = seeded_strip();
    strip.add_sticker(png_payload(60, 60, [0, 0, 255, 255]), None).unwrap();

    strip.request_export(&mock).unwrap();

    let call = mock.last_call().unwrap();
    assert_eq!(call.mode, LayoutMode::Presentation);
    assert_eq!(call.sticker_count, 1);
    // Zoom/delete affordances never reach the rasterizer.
    assert!(!call.controls_present);

    // The editing surface still sees them.
    let editing = strip.layout(LayoutMode::Interactive).unwrap();
    assert!(editing.stickers[0].controls);
}

#[test]
fn test_export_failure_leaves_strip_unchanged() {
    let mock = MockRasterizer::new();
    mock.fail_next("canvas lost");

    let mut strip = seeded_strip();
    strip.set_background(Rgb::CREAM);
    strip.add_sticker(png_payload(60, 60, [1, 1, 1, 255]), None).unwrap();

    let err = strip.request_export(&mock).unwrap_err();
    assert!(matches!(err, BoothError::ExportFailure { .. }));

    // Export is a read-only projection: retrying costs nothing.
    assert_eq!(strip.photos().len(), 2);
    assert_eq!(strip.sticker_count(), 1);
    assert_eq!(strip.background(), Rgb::CREAM);
    strip.request_export(&mock).unwrap();
}

#[test]
fn test_builtin_rasterizer_produces_png_strip() {
    let mut strip = seeded_strip();
    strip.set_background(Rgb::PINK);

    let export = strip.request_export(&StripRasterizer::new()).unwrap();
    let image = export.decode().unwrap().to_rgba8();

    let layout = strip.layout(LayoutMode::Presentation).unwrap();
    assert_eq!(image.dimensions(), (layout.width, layout.height));
    // Frame corner shows the background.
    assert_eq!(image.get_pixel(1, 1).0, [0xFF, 0xC0, 0xCB, 0xFF]);
    // First photo's interior is its (JPEG-approximate) red.
    let rect = layout.photos[0].rect;
    let px = image.get_pixel(rect.x + rect.width / 2, rect.y + rect.height / 2).0;
    assert!(px[0] > 150 && px[1] < 100 && px[2] < 100, "unexpected pixel {px:?}");
}

#[test]
fn test_builtin_rasterizer_honors_filter_and_sticker() {
    let mut strip = seeded_strip();
    strip.set_filter(PhotoFilter::Grayscale);
    strip
        .add_sticker(png_payload(60, 60, [255, 255, 0, 255]), Some(Point::new(130.0, 60.0)))
        .unwrap();

    let export = strip.request_export(&StripRasterizer::new()).unwrap();
    let image = export.decode().unwrap().to_rgba8();

    // A photo pixel outside the sticker area is gray now.
    let [r, g, b, _] = image.get_pixel(40, 40).0;
    assert_eq!(r, g);
    assert_eq!(g, b);
    // Sticker center stays yellow (stickers are not filtered).
    assert_eq!(image.get_pixel(160, 90).0, [255, 255, 0, 255]);
}
