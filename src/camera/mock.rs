//! Mock camera implementation for unit testing.
//!
//! Records all operations and supports error injection, so sequencer tests
//! can assert exactly how the feed was used without any hardware.
//!
//! # Example
//!
//! ```rust,ignore
//! use booth::camera::mock::{MockCamera, Operation};
//! use booth::camera::CameraSource;
//!
//! let mut cam = MockCamera::hd();
//! let handle = cam.handle();
//!
//! cam.grab_frame().unwrap();
//! cam.release();
//!
//! handle.assert_operations(&[Operation::GrabFrame, Operation::Release]);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};
use tracing::{debug, trace};

use super::{CameraConstraints, CameraInfo, CameraProvider, CameraSource};
use crate::error::{BoothError, Result};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    GrabFrame,
    Release,
}

/// Configuration for mock behavior.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Fail after N grabs (for testing error recovery).
    pub fail_after_grabs: Option<usize>,
    /// Initial live state.
    pub live: bool,
    /// Frame color when the queue is empty.
    pub fill: [u8; 3],
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fail_after_grabs: None,
            live: true,
            fill: [0x30, 0x60, 0x90],
        }
    }
}

#[derive(Debug)]
struct MockInner {
    live: AtomicBool,
    grab_count: AtomicUsize,
    frame_queue: Mutex<VecDeque<RgbImage>>,
    operation_log: Mutex<Vec<Operation>>,
    error_injection: Mutex<Option<BoothError>>,
    config: MockConfig,
}

/// Mock camera feed for testing without real hardware.
pub struct MockCamera {
    info: CameraInfo,
    inner: Arc<MockInner>,
}

/// Shared assertion surface for a [`MockCamera`] whose ownership has been
/// handed to a sequencer.
#[derive(Clone)]
pub struct MockHandle {
    inner: Arc<MockInner>,
}

impl MockCamera {
    /// Create a mock feed with the given native dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, MockConfig::default())
    }

    /// Create a mock feed with explicit behavior configuration.
    #[must_use]
    pub fn with_config(width: u32, height: u32, config: MockConfig) -> Self {
        debug!(width, height, "Creating mock camera");
        let live = config.live;
        Self {
            info: CameraInfo {
                label: "Mock Camera".to_string(),
                device: "MOCK-001".to_string(),
                width,
                height,
            },
            inner: Arc::new(MockInner {
                live: AtomicBool::new(live),
                grab_count: AtomicUsize::new(0),
                frame_queue: Mutex::new(VecDeque::new()),
                operation_log: Mutex::new(Vec::new()),
                error_injection: Mutex::new(None),
                config,
            }),
        }
    }

    /// Create a 1280x720 mock (the default acquisition constraint).
    #[must_use]
    pub fn hd() -> Self {
        Self::new(1280, 720)
    }

    /// Create a small mock for fast raster tests.
    #[must_use]
    pub fn tiny() -> Self {
        Self::new(32, 24)
    }

    /// Get a shared handle for assertions after handing the camera over.
    #[must_use]
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Queue a specific frame to be served by the next grab.
    pub fn queue_frame(&self, frame: RgbImage) {
        self.inner.frame_queue.lock().unwrap().push_back(frame);
    }

    fn fill_frame(&self) -> RgbImage {
        let [r, g, b] = self.inner.config.fill;
        RgbImage::from_pixel(self.info.width, self.info.height, Rgb([r, g, b]))
    }
}

impl CameraSource for MockCamera {
    fn info(&self) -> &CameraInfo {
        &self.info
    }

    fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    fn grab_frame(&mut self) -> Result<RgbImage> {
        self.inner.record(Operation::GrabFrame);

        if let Some(error) = self.inner.error_injection.lock().unwrap().take() {
            return Err(error);
        }
        if !self.is_live() {
            return Err(BoothError::CameraNotReady);
        }
        if let Some(limit) = self.inner.config.fail_after_grabs {
            if self.inner.grab_count.load(Ordering::SeqCst) >= limit {
                return Err(BoothError::CameraUnknown {
                    reason: "mock failure after grab limit".to_string(),
                });
            }
        }

        self.inner.grab_count.fetch_add(1, Ordering::SeqCst);
        let queued = self.inner.frame_queue.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.fill_frame()))
    }

    fn release(&mut self) {
        trace!("Mock camera released");
        self.inner.record(Operation::Release);
        self.inner.live.store(false, Ordering::SeqCst);
    }
}

impl MockInner {
    fn record(&self, op: Operation) {
        trace!(?op, "Recording camera operation");
        self.operation_log.lock().unwrap().push(op);
    }
}

impl MockHandle {
    /// Inject an error for the next grab.
    pub fn inject_error(&self, error: BoothError) {
        *self.inner.error_injection.lock().unwrap() = Some(error);
    }

    /// Simulate the feed dying mid-session (device unplugged, tab switch).
    pub fn kill_feed(&self) {
        self.inner.live.store(false, Ordering::SeqCst);
    }

    /// True while the feed is live (i.e. not yet released or killed).
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Number of frames successfully served.
    #[must_use]
    pub fn frames_served(&self) -> usize {
        self.inner.grab_count.load(Ordering::SeqCst)
    }

    /// All recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.inner.operation_log.lock().unwrap().clone()
    }

    /// True once `release` has been called at least once.
    #[must_use]
    pub fn released(&self) -> bool {
        self.operations().contains(&Operation::Release)
    }

    /// Assert the exact operation sequence.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }
}

/// Mock acquisition capability.
///
/// Either yields a [`MockCamera`] built per its configuration, or fails with
/// a chosen camera error. Keeps handles to everything it acquired so tests
/// can assert stream lifecycle (e.g. an old feed being released before a
/// re-acquire).
pub struct MockProvider {
    width: u32,
    height: u32,
    config: MockConfig,
    failure: Mutex<Option<BoothError>>,
    acquired: Mutex<Vec<MockHandle>>,
}

impl MockProvider {
    /// Provider that always succeeds with feeds of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            config: MockConfig::default(),
            failure: Mutex::new(None),
            acquired: Mutex::new(Vec::new()),
        }
    }

    /// 1280x720 provider.
    #[must_use]
    pub fn hd() -> Self {
        Self::new(1280, 720)
    }

    /// Small-frame provider for fast tests.
    #[must_use]
    pub fn tiny() -> Self {
        Self::new(32, 24)
    }

    /// Override mock camera behavior for subsequently acquired feeds.
    #[must_use]
    pub fn with_camera_config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

    /// Make the next `acquire` fail with the given error.
    pub fn fail_next(&self, error: BoothError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Provider whose every acquisition fails with the given error.
    #[must_use]
    pub fn failing(error: BoothError) -> Self {
        let provider = Self::hd();
        provider.fail_next(error);
        provider
    }

    /// Handles to every feed acquired so far, in order.
    #[must_use]
    pub fn acquired(&self) -> Vec<MockHandle> {
        self.acquired.lock().unwrap().clone()
    }

    /// Number of successful acquisitions.
    #[must_use]
    pub fn acquire_count(&self) -> usize {
        self.acquired.lock().unwrap().len()
    }

    /// Handle to the most recently acquired feed.
    #[must_use]
    pub fn last_acquired(&self) -> Option<MockHandle> {
        self.acquired.lock().unwrap().last().cloned()
    }
}

impl CameraProvider for MockProvider {
    fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraSource>> {
        debug!(?constraints, "Mock acquire");
        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }
        let camera = MockCamera::with_config(self.width, self.height, self.config.clone());
        self.acquired.lock().unwrap().push(camera.handle());
        Ok(Box::new(camera))
    }
}
