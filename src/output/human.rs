//! Human-friendly terminal output.

use std::path::Path;

use console::style;

use super::Output;
use crate::camera::CameraInfo;
use crate::capture::SessionSummary;
use crate::error::BoothError;

/// Styled terminal output implementation for human users.
#[derive(Debug, Default)]
pub struct HumanOutput;

impl HumanOutput {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        println!("{} {message}", style("✓").green().bold());
    }

    fn error(&self, error: &BoothError) {
        eprintln!("{} {error}", style("✗").red().bold());
        if let Some(suggestion) = error.suggestion() {
            eprintln!("  {} {suggestion}", style("hint:").yellow());
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {message}", style("!").yellow().bold());
    }

    fn camera_list(&self, cameras: &[CameraInfo]) {
        if cameras.is_empty() {
            println!("No cameras detected");
            return;
        }
        println!("{}", style("Cameras").bold());
        for camera in cameras {
            println!(
                "  {}  {} ({}x{})",
                style(&camera.device).cyan(),
                camera.label,
                camera.width,
                camera.height
            );
        }
    }

    fn session_summary(&self, summary: &SessionSummary, saved: &[std::path::PathBuf]) {
        println!(
            "{} {}/{} photo(s) captured{}",
            style("✓").green().bold(),
            summary.captured,
            summary.target_count,
            if summary.mirrored { " (mirrored)" } else { "" },
        );
        for path in saved {
            println!("  {}", style(path.display()).dim());
        }
    }

    fn export_result(&self, path: &Path, width: u32, height: u32) {
        println!(
            "{} strip exported to {} ({width}x{height})",
            style("✓").green().bold(),
            style(path.display()).cyan()
        );
    }
}
