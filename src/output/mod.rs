//! Output mode abstraction for robot and human output.

use std::path::Path;

use crate::camera::CameraInfo;
use crate::capture::SessionSummary;
use crate::error::BoothError;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::{RobotFormat, RobotOutput};

/// Presentation of command results to the user or to a machine.
pub trait Output {
    /// Report a successful operation.
    fn success(&self, message: &str);

    /// Report an error with recovery hints.
    fn error(&self, error: &BoothError);

    /// Report a non-fatal warning.
    fn warning(&self, message: &str);

    /// List detected cameras.
    fn camera_list(&self, cameras: &[CameraInfo]);

    /// Report a finished capture session and where its photos were saved.
    fn session_summary(&self, summary: &SessionSummary, saved: &[std::path::PathBuf]);

    /// Report a written export.
    fn export_result(&self, path: &Path, width: u32, height: u32);
}

/// Pick the output implementation for the CLI flags.
#[must_use]
pub fn for_flags(use_json: bool, compact: bool) -> Box<dyn Output> {
    if use_json {
        let format = if compact {
            RobotFormat::JsonCompact
        } else {
            RobotFormat::Json
        };
        Box::new(RobotOutput::new(format))
    } else {
        Box::new(HumanOutput::new())
    }
}
