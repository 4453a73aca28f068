//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::filters::PhotoFilter;

/// Photo Booth CLI - capture webcam photo strips and compose them headlessly.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "booth", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "BOOTH_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (show debug information)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List detected cameras
    Cameras(CamerasArgs),

    /// Run a countdown-driven capture session against the webcam
    Capture(CaptureArgs),

    /// Compose a photo strip from image files
    Compose(ComposeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct CamerasArgs {}

#[derive(clap::Args, Debug)]
pub struct CaptureArgs {
    /// Photos to capture (1-4)
    #[arg(long, short = 'c', default_value_t = 3)]
    pub count: u8,

    /// Disable the horizontal mirror applied to snapshots
    #[arg(long)]
    pub no_mirror: bool,

    /// V4L2 device index (default: first capture-capable device)
    #[arg(long, short = 'd')]
    pub device: Option<usize>,

    /// Directory for the captured photos (default: current directory)
    #[arg(long, short = 'o')]
    pub out_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ComposeArgs {
    /// Photo files, top to bottom (non-image files are skipped)
    #[arg(required = true, value_name = "PHOTO")]
    pub photos: Vec<PathBuf>,

    /// Cosmetic filter applied to every photo
    #[arg(long, default_value = "none")]
    pub filter: PhotoFilter,

    /// Strip background: #RRGGBB or a palette name (white, black, cream, gold, pink)
    #[arg(long, short = 'b', default_value = "#FFFFFF")]
    pub background: String,

    /// Stamp a date on the strip
    #[arg(long)]
    pub date: bool,

    /// Date stamp text (default: today; implies --date)
    #[arg(long)]
    pub date_text: Option<String>,

    /// Sticker overlay: PATH[@X,Y[,SCALE]]; omitted position centers it
    #[arg(long, short = 's', value_name = "SPEC")]
    pub sticker: Vec<StickerSpec>,

    /// Output file (default: photostrip.png in the pictures directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Parsed `--sticker` specification.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerSpec {
    pub path: PathBuf,
    /// Top-left position; `None` centers the sticker.
    pub position: Option<(f32, f32)>,
    pub scale: f32,
}

impl FromStr for StickerSpec {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (path, placement) = match spec.rsplit_once('@') {
            Some((path, placement)) if !path.is_empty() => (path, Some(placement)),
            _ => (spec, None),
        };
        if path.is_empty() {
            return Err("sticker spec has no path".to_string());
        }

        let (position, scale) = match placement {
            None => (None, 1.0),
            Some(placement) => {
                let mut parts = placement.split(',');
                let x = parse_coord(parts.next(), "X")?;
                let y = parse_coord(parts.next(), "Y")?;
                let scale = match parts.next() {
                    None => 1.0,
                    Some(s) => s
                        .trim()
                        .parse::<f32>()
                        .map_err(|_| format!("invalid sticker scale '{s}'"))?,
                };
                if parts.next().is_some() {
                    return Err(format!("too many fields in sticker spec '{spec}'"));
                }
                if scale <= 0.0 {
                    return Err(format!("sticker scale must be positive, got {scale}"));
                }
                (Some((x, y)), scale)
            }
        };

        Ok(Self {
            path: PathBuf::from(path),
            position,
            scale,
        })
    }
}

fn parse_coord(part: Option<&str>, name: &str) -> Result<f32, String> {
    part.ok_or_else(|| format!("sticker spec missing {name}"))?
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid sticker {name} coordinate"))
}
