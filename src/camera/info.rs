//! Camera constraints and device descriptions.

use serde::{Deserialize, Serialize};

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Front/selfie camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

/// Acquisition constraints: preferred resolution and facing, never audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    /// Ideal frame width; the driver may negotiate down.
    pub ideal_width: u32,
    /// Ideal frame height.
    pub ideal_height: u32,
    pub facing: Facing,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: Facing::User,
        }
    }
}

/// Description of an acquired camera feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Human-readable device name.
    pub label: String,
    /// Device path or identifier (e.g. `/dev/video0`, `MOCK-001`).
    pub device: String,
    /// Native frame width actually negotiated.
    pub width: u32,
    /// Native frame height actually negotiated.
    pub height: u32,
}
