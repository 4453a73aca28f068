//! Integration tests for the upload substitution policy.
//!
//! Policy under test: filter to image files, replace the captured set,
//! truncate to the session target, preserve file-selection order.

use booth::camera::mock::MockProvider;
use booth::capture::{CaptureSequencer, Phase};
use booth::error::BoothError;

use crate::common::fixtures::{bogus_upload, png_upload};

#[test]
fn test_two_valid_one_invalid_yields_two_in_order() {
    let mut seq = CaptureSequencer::new();
    seq.set_target_count(3).unwrap();

    let stored = seq
        .upload_images(vec![
            png_upload("first.png", [255, 0, 0, 255]),
            bogus_upload("resume.txt"),
            png_upload("second.png", [0, 0, 255, 255]),
        ])
        .unwrap();

    assert_eq!(stored, 2);
    assert_eq!(seq.photos().len(), 2);

    // Selection order survives the filtering.
    let first = seq.photos()[0].decode().unwrap().to_rgba8();
    let second = seq.photos()[1].decode().unwrap().to_rgba8();
    assert_eq!(first.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(second.get_pixel(0, 0).0, [0, 0, 255, 255]);

    // Two of three: ready for hand-off but not a complete session.
    assert!(seq.ready_for_handoff());
    assert_ne!(seq.phase(), Phase::SessionComplete);
}

#[test]
fn test_batch_truncated_to_target_count() {
    let mut seq = CaptureSequencer::new();
    seq.set_target_count(2).unwrap();

    let stored = seq
        .upload_images(vec![
            png_upload("a.png", [1, 1, 1, 255]),
            png_upload("b.png", [2, 2, 2, 255]),
            png_upload("c.png", [3, 3, 3, 255]),
        ])
        .unwrap();

    assert_eq!(stored, 2);
    assert_eq!(seq.photos().len(), 2);
    assert_eq!(seq.phase(), Phase::SessionComplete);
}

#[test]
fn test_upload_replaces_previous_set() {
    let mut seq = CaptureSequencer::new();
    seq.set_target_count(2).unwrap();
    seq.upload_images(vec![png_upload("old.png", [9, 9, 9, 255])])
        .unwrap();

    seq.upload_images(vec![png_upload("new.png", [7, 7, 7, 255])])
        .unwrap();

    assert_eq!(seq.photos().len(), 1);
    let photo = seq.photos()[0].decode().unwrap().to_rgba8();
    assert_eq!(photo.get_pixel(0, 0).0, [7, 7, 7, 255]);
}

#[test]
fn test_all_invalid_batch_rejected_and_state_untouched() {
    let mut seq = CaptureSequencer::new();
    seq.set_target_count(2).unwrap();
    seq.upload_images(vec![png_upload("keep.png", [5, 5, 5, 255])])
        .unwrap();

    let err = seq
        .upload_images(vec![bogus_upload("a.txt"), bogus_upload("b.txt")])
        .unwrap_err();
    assert!(matches!(err, BoothError::InvalidUploadType { rejected: 2 }));

    // Prior photos survive the rejected batch.
    assert_eq!(seq.photos().len(), 1);
}

#[test]
fn test_upload_rejected_mid_session() {
    let provider = MockProvider::tiny();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();
    seq.start_session().unwrap();

    let err = seq
        .upload_images(vec![png_upload("a.png", [1, 1, 1, 255])])
        .unwrap_err();
    assert!(matches!(err, BoothError::SessionBusy));
}
