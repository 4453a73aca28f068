//! Error types for photo-booth operations.

use thiserror::Error;

/// Primary error type for photo-booth operations.
#[derive(Error, Debug)]
pub enum BoothError {
    // Camera acquisition errors, classified per failure reason so each maps
    // to a distinct user-facing message.
    #[error("Camera access denied. Please allow camera access in your system settings.")]
    CameraPermissionDenied,

    #[error("No camera found. Please ensure your device has a working camera.")]
    CameraNotFound,

    #[error("Camera is already in use by another application.")]
    CameraBusy,

    #[error("Camera cannot satisfy the required constraints.")]
    CameraConstraintsUnsatisfiable,

    #[error("Camera access was aborted. Please try again.")]
    CameraAborted,

    #[error("Camera access is blocked due to security restrictions.")]
    CameraSecurityBlocked,

    #[error("Camera error: {reason}")]
    CameraUnknown { reason: String },

    #[error("Camera is not ready for capture")]
    CameraNotReady,

    // Session errors
    #[error("A capture session is already running")]
    SessionBusy,

    #[error("Invalid photo count {count}: must be one of {allowed:?}")]
    InvalidPhotoCount { count: u8, allowed: &'static [u8] },

    // Upload errors
    #[error("No valid image files in upload batch ({rejected} file(s) rejected)")]
    InvalidUploadType { rejected: usize },

    // Composition errors
    #[error("Sticker not found: {id}")]
    StickerNotFound { id: u64 },

    #[error("Another sticker drag is already in progress")]
    DragInProgress,

    #[error("Invalid color '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    // Image / export errors
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Image file not found: {path}")]
    ImageNotFound { path: String },

    #[error("Export failed: {reason}")]
    ExportFailure { reason: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl BoothError {
    /// Returns true if the error is recoverable by the user.
    ///
    /// Camera failures are terminal for the current attempt but never fatal
    /// to the application: the sequencer exposes a retry entry point.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CameraPermissionDenied
                | Self::CameraNotFound
                | Self::CameraBusy
                | Self::CameraConstraintsUnsatisfiable
                | Self::CameraAborted
                | Self::CameraSecurityBlocked
                | Self::CameraUnknown { .. }
                | Self::CameraNotReady
                | Self::InvalidPhotoCount { .. }
                | Self::InvalidUploadType { .. }
                | Self::InvalidColor { .. }
                | Self::ImageNotFound { .. }
                | Self::ExportFailure { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CameraPermissionDenied => Some("Grant camera permission and retry"),
            Self::CameraNotFound => Some("Connect a camera, then run: booth cameras"),
            Self::CameraBusy => Some("Close the application using the camera and retry"),
            Self::CameraConstraintsUnsatisfiable => Some("Retry with a lower resolution"),
            Self::CameraAborted | Self::CameraUnknown { .. } => Some("Retry the camera"),
            Self::InvalidPhotoCount { .. } => Some("Use a photo count between 1 and 4"),
            Self::InvalidUploadType { .. } => Some("Select image files (PNG or JPEG)"),
            Self::InvalidColor { .. } => Some("Use a hex color like #FFC0CB"),
            Self::ExportFailure { .. } => Some("The strip is unchanged; retry the export"),
            _ => None,
        }
    }

    /// Returns true for any of the camera-acquisition failure reasons.
    pub const fn is_camera_failure(&self) -> bool {
        matches!(
            self,
            Self::CameraPermissionDenied
                | Self::CameraNotFound
                | Self::CameraBusy
                | Self::CameraConstraintsUnsatisfiable
                | Self::CameraAborted
                | Self::CameraSecurityBlocked
                | Self::CameraUnknown { .. }
        )
    }
}

/// Convenience type alias for Results using BoothError.
pub type Result<T> = std::result::Result<T, BoothError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| BoothError::Other(format!("{}: {e}", f().into())))
    }
}
