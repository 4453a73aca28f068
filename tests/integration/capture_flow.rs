//! Integration tests for the capture sequencer driven end to end.
//!
//! The mock camera stands in for hardware; the runner drives the countdown
//! over tokio virtual time.

use booth::camera::mock::MockProvider;
use booth::capture::{CaptureSequencer, Phase, Tick, COUNTDOWN_START, PHOTO_COUNT_CHOICES};
use booth::error::BoothError;
use booth::runner::{run_session, SessionEvent};
use booth::strip::StripState;

// ===== Session Completion Tests =====

#[tokio::test(start_paused = true)]
async fn test_completed_session_has_exactly_target_photos() {
    for &count in PHOTO_COUNT_CHOICES {
        let provider = MockProvider::tiny();
        let mut seq = CaptureSequencer::new();
        seq.start_camera(&provider).unwrap();
        seq.set_target_count(count).unwrap();

        run_session(&mut seq, |_| {}).await.unwrap();

        assert_eq!(seq.phase(), Phase::SessionComplete);
        assert_eq!(seq.photos().len(), usize::from(count));
    }
}

#[tokio::test(start_paused = true)]
async fn test_countdown_runs_three_to_zero_before_every_snapshot() {
    let provider = MockProvider::tiny();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();
    seq.set_target_count(3).unwrap();

    let mut events = Vec::new();
    run_session(&mut seq, |e| events.push(e)).await.unwrap();

    // Every capture must be directly preceded by ticks 3, 2, 1.
    for (i, event) in events.iter().enumerate() {
        if let SessionEvent::PhotoCaptured { .. } = event {
            assert!(i >= 3, "capture happened before a full countdown");
            assert_eq!(events[i - 3], SessionEvent::CountdownTick(COUNTDOWN_START));
            assert_eq!(events[i - 2], SessionEvent::CountdownTick(2));
            assert_eq!(events[i - 1], SessionEvent::CountdownTick(1));
        }
    }
}

#[test]
fn test_capture_never_reenters_synchronously() {
    let provider = MockProvider::tiny();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();
    seq.set_target_count(2).unwrap();
    seq.start_session().unwrap();

    // Drive to the first capture.
    seq.tick();
    seq.tick();
    assert!(matches!(seq.tick(), Tick::Captured { index: 0 }));

    // The very next tick must be a re-arm, never a second capture.
    assert_eq!(seq.tick(), Tick::Rearmed);
    assert_eq!(seq.photos().len(), 1);
}

// ===== Camera Lifecycle Tests =====

#[test]
fn test_camera_failure_is_stored_and_retryable() {
    let provider = MockProvider::hd();
    provider.fail_next(BoothError::CameraBusy);

    let mut seq = CaptureSequencer::new();
    assert!(seq.start_camera(&provider).is_err());
    assert_eq!(seq.phase(), Phase::CameraError);
    assert!(seq
        .camera_error()
        .unwrap()
        .contains("already in use"));

    // Same entry point retries cleanly.
    seq.start_camera(&provider).unwrap();
    assert_eq!(seq.phase(), Phase::CameraReady);
}

#[test]
fn test_no_stale_stream_after_failure() {
    let provider = MockProvider::hd();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();

    provider.fail_next(BoothError::CameraUnknown {
        reason: "flaky".into(),
    });
    assert!(seq.start_camera(&provider).is_err());

    // The old stream was released before the failed re-acquire.
    assert!(provider.acquired()[0].released());
    assert!(seq.camera_info().is_none());
    assert!(seq.take_snapshot().is_none());
}

// ===== Hand-off Tests =====

#[tokio::test(start_paused = true)]
async fn test_capture_to_composition_handoff() {
    let provider = MockProvider::tiny();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();
    seq.set_target_count(2).unwrap();
    run_session(&mut seq, |_| {}).await.unwrap();

    let mut strip = StripState::new();
    strip.set_photos(seq.take_photos());

    assert_eq!(strip.photos().len(), 2);
    // Sequencer is back to capture-ready after the hand-off.
    assert_eq!(seq.phase(), Phase::CameraReady);
    assert!(seq.photos().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_retake_discards_and_recaptures() {
    let provider = MockProvider::tiny();
    let mut seq = CaptureSequencer::new();
    seq.start_camera(&provider).unwrap();
    seq.set_target_count(1).unwrap();
    run_session(&mut seq, |_| {}).await.unwrap();
    assert_eq!(seq.photos().len(), 1);

    // Retake: everything discarded, session can run again.
    seq.reset();
    assert!(seq.photos().is_empty());
    run_session(&mut seq, |_| {}).await.unwrap();
    assert_eq!(seq.photos().len(), 1);
}
