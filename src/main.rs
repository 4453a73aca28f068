//! Photo Booth CLI - capture webcam photo strips and compose them headlessly.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use booth::camera::{enumerate_devices, V4lProvider};
use booth::capture::CaptureSequencer;
use booth::cli::{Cli, Commands, CaptureArgs, CamerasArgs, ComposeArgs, CompletionsArgs};
use booth::color::Rgb;
use booth::error::{BoothError, Result};
use booth::output::{self, Output};
use booth::render::StripRasterizer;
use booth::runner::{run_session, SessionEvent};
use booth::strip::{Point, StripState, EXPORT_FILE_NAME};
use booth::upload::{decode_batch, decode_upload, UploadFile};

fn main() {
    let cli = Cli::parse();

    booth::logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    let out = output::for_flags(cli.use_json(), cli.use_compact_json());

    let result = run(&cli, out.as_ref());
    if let Err(e) = result {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => {
            print_quick_start();
            Ok(())
        }
        Some(Commands::Cameras(args)) => cmd_cameras(out, args),
        Some(Commands::Capture(args)) => cmd_capture(cli, out, args),
        Some(Commands::Compose(args)) => cmd_compose(out, args),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

fn print_quick_start() {
    println!("booth - photo strips from your webcam\n");
    println!("Quick start:");
    println!("  booth cameras                         List detected cameras");
    println!("  booth capture --count 3               Capture a 3-photo session");
    println!("  booth compose a.jpg b.jpg --date      Compose a strip from files");
    println!("\nSee 'booth --help' for all commands and flags.");
}

fn cmd_cameras(out: &dyn Output, _args: &CamerasArgs) -> Result<()> {
    let cameras = enumerate_devices();
    out.camera_list(&cameras);
    Ok(())
}

fn cmd_capture(cli: &Cli, out: &dyn Output, args: &CaptureArgs) -> Result<()> {
    let provider = args
        .device
        .map_or_else(V4lProvider::new, V4lProvider::with_device);

    let mut sequencer = CaptureSequencer::new();
    sequencer.set_target_count(args.count)?;
    sequencer.set_mirrored(!args.no_mirror);
    sequencer.start_camera(&provider)?;

    let progress = if cli.use_json() || cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(u64::from(args.count));
        bar.set_style(
            ProgressStyle::with_template("{bar:20.cyan} {pos}/{len} {msg}")
                .expect("static template"),
        );
        bar
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_session(&mut sequencer, |event| match event {
        SessionEvent::CountdownTick(n) => progress.set_message(format!("capturing in {n}...")),
        SessionEvent::PhotoCaptured { .. } => {
            progress.inc(1);
            progress.set_message("captured");
        }
        SessionEvent::Paused => progress.set_message("get ready..."),
        SessionEvent::Completed => progress.finish_with_message("done"),
        SessionEvent::Aborted => progress.abandon_with_message("aborted"),
    }))?;

    if !sequencer.ready_for_handoff() {
        return Err(BoothError::Other(
            "session ended without any photos".to_string(),
        ));
    }

    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;
    let mut saved = Vec::new();
    for (index, photo) in sequencer.photos().iter().enumerate() {
        let path = dir.join(format!("photo-{}.jpg", index + 1));
        std::fs::write(&path, photo.as_bytes())?;
        saved.push(path);
    }

    out.session_summary(&sequencer.summary(), &saved);
    sequencer.stop_camera();
    Ok(())
}

fn cmd_compose(out: &dyn Output, args: &ComposeArgs) -> Result<()> {
    let files = args
        .photos
        .iter()
        .map(|path| UploadFile::from_path(path))
        .collect::<Result<Vec<_>>>()?;
    let photos = decode_batch(files)?;

    let mut strip = StripState::new();
    strip.set_photos(photos);
    strip.set_filter(args.filter);
    strip.set_background(Rgb::parse(&args.background)?);
    if args.date || args.date_text.is_some() {
        strip.set_date_enabled(true);
        if let Some(text) = &args.date_text {
            strip.set_date_text(text.clone());
        }
    }

    for spec in &args.sticker {
        let file = UploadFile::from_path(&spec.path)?;
        let image = decode_upload(&file)?;
        let position = spec.position.map(|(x, y)| Point::new(x, y));
        let id = strip.add_sticker(image, position)?;
        if (spec.scale - 1.0).abs() > f32::EPSILON {
            strip.zoom_sticker(id, spec.scale - 1.0)?;
        }
    }

    let export = strip.request_export(&StripRasterizer::new())?;
    let (width, height) = export.dimensions()?;

    let path = args.output.clone().unwrap_or_else(default_export_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, export.as_bytes())?;

    out.export_result(&path, width, height);
    Ok(())
}

/// `photostrip.png` in the user's pictures directory, falling back to the
/// working directory.
fn default_export_path() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(EXPORT_FILE_NAME)
}

fn cmd_completions(args: &CompletionsArgs) -> Result<()> {
    clap_complete::generate(args.shell, &mut Cli::command(), "booth", &mut io::stdout());
    Ok(())
}
