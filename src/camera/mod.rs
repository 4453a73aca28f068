//! Camera capability layer.
//!
//! This module provides a trait-based abstraction over real (V4L2) and mock
//! camera feeds, enabling the capture sequencer to be tested without
//! hardware. The sequencer exclusively owns an acquired [`CameraSource`];
//! no other component reads or mutates the feed.

mod info;
pub mod mock;
mod v4l;

pub use info::{CameraConstraints, CameraInfo, Facing};
pub use v4l::{enumerate_devices, V4lProvider};

use image::RgbImage;

use crate::error::Result;

/// A live camera feed.
///
/// # Implementation Notes
///
/// - `grab_frame` returns the current frame at the feed's native dimensions
/// - `release` must be idempotent; a released source never yields frames
pub trait CameraSource {
    /// Description of the acquired feed.
    fn info(&self) -> &CameraInfo;

    /// True while the feed can still deliver frames.
    fn is_live(&self) -> bool;

    /// Grab the current live frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed has been released, disconnected, or the
    /// driver fails to deliver a frame.
    fn grab_frame(&mut self) -> Result<RgbImage>;

    /// Release the underlying device handle. Safe to call repeatedly.
    fn release(&mut self);
}

/// Camera acquisition capability.
///
/// `acquire` either yields an exclusively-owned source or a classified
/// camera failure (`BoothError::Camera*`), one per reason, each carrying a
/// distinct user-facing message.
pub trait CameraProvider {
    /// Acquire a feed satisfying the constraints as closely as possible.
    ///
    /// # Errors
    ///
    /// Returns one of the classified camera failures; never panics and
    /// never leaves a half-open device behind.
    fn acquire(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraSource>>;
}

/// Type alias for a boxed camera feed.
pub type BoxedSource = Box<dyn CameraSource>;
