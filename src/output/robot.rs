//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use super::Output;
use crate::camera::CameraInfo;
use crate::capture::SessionSummary;
use crate::error::BoothError;

/// JSON flavor for robot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotFormat {
    Json,
    JsonCompact,
}

/// JSON output implementation for agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[must_use]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => {
                serde_json::to_string_pretty(data).expect("serialization failed")
            }
            RobotFormat::JsonCompact => serde_json::to_string(data).expect("serialization failed"),
        };
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }

    /// Output pretty JSON to stderr (errors go to stderr in every mode).
    fn output_json_stderr<T: Serialize>(&self, data: &T) {
        let json = serde_json::to_string_pretty(data).expect("serialization failed");
        eprintln!("{json}");
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    fn error(&self, error: &BoothError) {
        self.output_json_stderr(&serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    fn warning(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    fn camera_list(&self, cameras: &[CameraInfo]) {
        self.output_json(&serde_json::json!({
            "cameras": cameras,
            "count": cameras.len(),
        }));
    }

    fn session_summary(&self, summary: &SessionSummary, saved: &[std::path::PathBuf]) {
        self.output_json(&serde_json::json!({
            "session": summary,
            "saved": saved,
        }));
    }

    fn export_result(&self, path: &Path, width: u32, height: u32) {
        self.output_json(&serde_json::json!({
            "success": true,
            "path": path.display().to_string(),
            "width": width,
            "height": height,
        }));
    }
}
