//! Countdown-driven capture sequencer.
//!
//! Owns the camera feed for the lifetime of one camera visit and drives the
//! countdown-then-snapshot loop until the configured number of photos has
//! been collected, or accepts an uploaded batch as a substitute. The
//! sequencer is a plain state machine advanced by [`CaptureSequencer::tick`]
//! once per second; the async driver lives in [`crate::runner`], which keeps
//! the timer discipline (one live interval, cancelled before re-arm) out of
//! the state logic and the state logic deterministic under test.

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::camera::{BoxedSource, CameraConstraints, CameraInfo, CameraProvider};
use crate::error::{BoothError, Result};
use crate::payload::ImagePayload;
use crate::upload::{decode_batch, UploadFile};

/// Countdown seconds before every snapshot.
pub const COUNTDOWN_START: u8 = 3;

/// Photo counts a session may target.
pub const PHOTO_COUNT_CHOICES: &[u8] = &[1, 2, 3, 4];

/// Default photos per session.
pub const DEFAULT_PHOTO_COUNT: u8 = 3;

/// Lifecycle phase of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    CameraInitializing,
    CameraReady,
    CameraError,
    CountingDown,
    CaptureInFlight,
    SessionComplete,
}

/// Outcome of one 1-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No session is running; the tick was stale.
    Idle,
    /// Countdown decremented; value is the seconds still remaining.
    Counting(u8),
    /// A snapshot was taken and appended at `index`.
    Captured { index: usize },
    /// The inter-photo pause elapsed; countdown re-armed at 3.
    Rearmed,
    /// The session already holds all its photos.
    Complete,
    /// The snapshot failed and the session was abandoned.
    Aborted,
}

/// Summary of sequencer state for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session: Uuid,
    pub phase: Phase,
    pub target_count: u8,
    pub captured: usize,
    pub mirrored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_error: Option<String>,
}

/// The capture sequencer. See the module docs for the driving contract.
pub struct CaptureSequencer {
    session: Uuid,
    constraints: CameraConstraints,
    source: Option<BoxedSource>,
    phase: Phase,
    countdown: u8,
    target_count: u8,
    mirrored: bool,
    captured: Vec<ImagePayload>,
    /// User-facing message of the last classified camera failure.
    camera_error: Option<String>,
}

impl CaptureSequencer {
    /// Sequencer with default constraints (1280x720, user-facing).
    #[must_use]
    pub fn new() -> Self {
        Self::with_constraints(CameraConstraints::default())
    }

    #[must_use]
    pub fn with_constraints(constraints: CameraConstraints) -> Self {
        Self {
            session: Uuid::new_v4(),
            constraints,
            source: None,
            phase: Phase::Idle,
            countdown: 0,
            target_count: DEFAULT_PHOTO_COUNT,
            mirrored: true,
            captured: Vec::new(),
            camera_error: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds remaining in the current countdown; 0 means not counting.
    #[must_use]
    pub const fn countdown(&self) -> u8 {
        self.countdown
    }

    #[must_use]
    pub const fn target_count(&self) -> u8 {
        self.target_count
    }

    #[must_use]
    pub const fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Captured photos so far, in capture order.
    #[must_use]
    pub fn photos(&self) -> &[ImagePayload] {
        &self.captured
    }

    /// True while a countdown/capture loop is in progress.
    #[must_use]
    pub const fn is_session_running(&self) -> bool {
        matches!(self.phase, Phase::CountingDown | Phase::CaptureInFlight)
    }

    /// Description of the held feed, if any.
    #[must_use]
    pub fn camera_info(&self) -> Option<&CameraInfo> {
        self.source.as_deref().map(|source| source.info())
    }

    /// User-facing message of the last camera failure, if in `CameraError`.
    #[must_use]
    pub fn camera_error(&self) -> Option<&str> {
        self.camera_error.as_deref()
    }

    /// True once at least one photo is held, i.e. the set can be handed to
    /// the composition model.
    #[must_use]
    pub fn ready_for_handoff(&self) -> bool {
        !self.captured.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session: self.session,
            phase: self.phase,
            target_count: self.target_count,
            captured: self.captured.len(),
            mirrored: self.mirrored,
            camera: self.camera_info().cloned(),
            camera_error: self.camera_error.clone(),
        }
    }

    // === Camera lifecycle ===

    /// Acquire (or re-acquire) the camera feed.
    ///
    /// Any previously held feed is released first so a retry can never leak
    /// a hardware handle. On failure the classified reason is stored as
    /// session state and the same error is returned; `start_camera` remains
    /// the retry entry point.
    pub fn start_camera(&mut self, provider: &dyn CameraProvider) -> Result<()> {
        self.release_source();
        self.cancel_countdown();
        self.camera_error = None;
        self.phase = Phase::CameraInitializing;

        match provider.acquire(&self.constraints) {
            Ok(source) => {
                info!(session = %self.session, camera = %source.info().device, "Camera ready");
                self.source = Some(source);
                self.phase = Phase::CameraReady;
                Ok(())
            }
            Err(err) => {
                warn!(session = %self.session, error = %err, "Camera acquisition failed");
                self.camera_error = Some(err.to_string());
                self.phase = Phase::CameraError;
                Err(err)
            }
        }
    }

    /// Release the held feed and cancel any running session. Idempotent.
    pub fn stop_camera(&mut self) {
        self.release_source();
        self.cancel_countdown();
        if self.phase != Phase::SessionComplete {
            self.phase = Phase::Idle;
        }
    }

    fn release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }

    fn cancel_countdown(&mut self) {
        self.countdown = 0;
    }

    // === Configuration ===

    /// Toggle horizontal flip. Affects only future snapshots.
    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    /// Set how many photos the session should collect.
    ///
    /// Rejected while a countdown/capture loop is running.
    pub fn set_target_count(&mut self, count: u8) -> Result<()> {
        if self.is_session_running() {
            return Err(BoothError::SessionBusy);
        }
        if !PHOTO_COUNT_CHOICES.contains(&count) {
            return Err(BoothError::InvalidPhotoCount {
                count,
                allowed: PHOTO_COUNT_CHOICES,
            });
        }
        self.target_count = count;
        Ok(())
    }

    // === Session ===

    /// Begin a countdown/capture loop.
    ///
    /// Guarded: requires a ready camera and no session already running.
    /// Clears previously captured photos.
    pub fn start_session(&mut self) -> Result<()> {
        if self.is_session_running() {
            return Err(BoothError::SessionBusy);
        }
        if self.phase != Phase::CameraReady {
            return Err(BoothError::CameraNotReady);
        }
        self.session = Uuid::new_v4();
        self.captured.clear();
        self.phase = Phase::CountingDown;
        self.countdown = COUNTDOWN_START;
        info!(session = %self.session, target = self.target_count, "Session started");
        Ok(())
    }

    /// Advance the session by one second. Called by the runner's interval;
    /// never re-enters capture synchronously, so two snapshots can only be
    /// separated by at least one re-armed countdown.
    pub fn tick(&mut self) -> Tick {
        match self.phase {
            Phase::CountingDown => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown > 0 {
                    debug!(session = %self.session, countdown = self.countdown, "Counting down");
                    return Tick::Counting(self.countdown);
                }
                // Snapshots append only in CaptureInFlight.
                self.phase = Phase::CaptureInFlight;
                match self.take_snapshot() {
                    Some(payload) => {
                        self.captured.push(payload);
                        let index = self.captured.len() - 1;
                        info!(
                            session = %self.session,
                            photo = index + 1,
                            of = self.target_count,
                            "Photo captured"
                        );
                        if self.captured.len() >= usize::from(self.target_count) {
                            self.phase = Phase::SessionComplete;
                        }
                        Tick::Captured { index }
                    }
                    None => {
                        warn!(session = %self.session, "Snapshot failed, abandoning session");
                        self.phase = if self.source.as_ref().is_some_and(|s| s.is_live()) {
                            Phase::CameraReady
                        } else {
                            Phase::CameraError
                        };
                        self.countdown = 0;
                        Tick::Aborted
                    }
                }
            }
            // The 1-second inter-photo pause: re-arm the countdown.
            Phase::CaptureInFlight => {
                self.phase = Phase::CountingDown;
                self.countdown = COUNTDOWN_START;
                Tick::Rearmed
            }
            Phase::SessionComplete => Tick::Complete,
            _ => Tick::Idle,
        }
    }

    /// Snapshot the current live frame: native feed dimensions, horizontal
    /// flip first when mirrored, JPEG-encoded.
    ///
    /// Returns `None` without mutating state when no live feed is held.
    pub fn take_snapshot(&mut self) -> Option<ImagePayload> {
        let source = self.source.as_mut()?;
        if !source.is_live() {
            return None;
        }
        let frame = match source.grab_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "Frame grab failed");
                return None;
            }
        };
        let frame = if self.mirrored {
            image::imageops::flip_horizontal(&frame)
        } else {
            frame
        };
        match ImagePayload::encode_jpeg(&DynamicImage::ImageRgb8(frame)) {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "Snapshot encode failed");
                None
            }
        }
    }

    /// Substitute an uploaded batch for live capture.
    ///
    /// Policy (applied identically at every call site): non-image files are
    /// filtered out, the batch replaces the captured set, and the result is
    /// truncated to `target_count`, preserving file-selection order. A batch
    /// with zero valid images is rejected whole and prior state is kept.
    pub fn upload_images(&mut self, files: Vec<UploadFile>) -> Result<usize> {
        if self.is_session_running() {
            return Err(BoothError::SessionBusy);
        }
        let mut photos = decode_batch(files)?;
        photos.truncate(usize::from(self.target_count));
        let stored = photos.len();
        self.captured = photos;
        info!(session = %self.session, stored, "Upload accepted");
        if self.captured.len() >= usize::from(self.target_count) {
            self.phase = Phase::SessionComplete;
        }
        Ok(stored)
    }

    /// Discard everything captured and return to a capture-ready state.
    pub fn reset(&mut self) {
        self.captured.clear();
        self.cancel_countdown();
        self.phase = match (&self.source, &self.camera_error) {
            (Some(source), _) if source.is_live() => Phase::CameraReady,
            (_, Some(_)) => Phase::CameraError,
            _ => Phase::Idle,
        };
        info!(session = %self.session, "Session reset");
    }

    /// Move the captured photos out for hand-off to the composition model,
    /// leaving the sequencer reset.
    #[must_use]
    pub fn take_photos(&mut self) -> Vec<ImagePayload> {
        let photos = std::mem::take(&mut self.captured);
        self.reset();
        photos
    }
}

impl Default for CaptureSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CaptureSequencer {
    // Leaving the owning screen tears the feed down.
    fn drop(&mut self) {
        self.release_source();
    }
}
