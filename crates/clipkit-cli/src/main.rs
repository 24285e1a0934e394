//! ClipKit command line.
//!
//! Thin front end standing in for a host graph engine: each subcommand
//! binds its arguments into the matching typed spec and invokes the core
//! operation.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use clipkit_core::config::ConfigManager;
use clipkit_core::models::{
    ConcatMode, ConcatSpec, Container, CutRange, CutSpec, FileHandleResolver, MediaSource,
    OutputArtifact, OverlayAudio, OverlaySpec, RateSource,
};
use clipkit_core::ops::{self, OpContext};
use clipkit_core::probe;

#[derive(Parser)]
#[command(name = "clipkit", version)]
#[command(about = "FFmpeg-backed video cut / overlay / concat toolkit")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "clipkit.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// How the cut window is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CutModeArg {
    Time,
    Frame,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a window of a source video
    Cut {
        /// Source video file
        video: PathBuf,

        /// Cut by time (seconds) or by frames
        #[arg(long, value_enum, default_value = "time")]
        mode: CutModeArg,

        /// Start time in seconds (time mode)
        #[arg(long, default_value_t = 0.0)]
        start_time: f64,

        /// Duration in seconds; 0 or less means "to end" (time mode)
        #[arg(long, default_value_t = 5.0)]
        duration: f64,

        /// First frame to keep (frame mode)
        #[arg(long, default_value_t = 0)]
        start_frame: i64,

        /// Number of frames; 0 or less means "to end" (frame mode)
        #[arg(long, default_value_t = 0)]
        frame_count: i64,

        /// Use this frame rate instead of probing the source (frame mode)
        #[arg(long)]
        fps: Option<f64>,

        /// Fallback frame rate when probing fails (frame mode)
        #[arg(long, default_value_t = 30.0)]
        fallback_fps: f64,

        /// Drop the audio track instead of re-encoding it
        #[arg(long)]
        no_audio: bool,
    },

    /// Composite a scaled foreground video onto a background video
    Overlay {
        /// Background video file
        background: PathBuf,

        /// Foreground video file
        foreground: PathBuf,

        /// Horizontal placement; negative values allowed
        #[arg(long = "x", default_value_t = 0, allow_hyphen_values = true)]
        x: i32,

        /// Vertical placement; negative values allowed
        #[arg(long = "y", default_value_t = 0, allow_hyphen_values = true)]
        y: i32,

        /// Width the foreground is scaled to
        #[arg(long, default_value_t = 320)]
        fg_width: u32,

        /// Height the foreground is scaled to
        #[arg(long, default_value_t = 240)]
        fg_height: u32,

        /// Audio source: background, foreground, mix or none
        #[arg(long, default_value = "background")]
        audio_from: OverlayAudio,

        /// External audio file; overrides --audio-from entirely
        #[arg(long)]
        external_audio: Option<PathBuf>,
    },

    /// Join up to four videos into one output
    Concat {
        /// Source videos, in output order (1 to 4)
        #[arg(num_args = 1..=4, required = true)]
        videos: Vec<PathBuf>,

        /// Concat strategy: reencode or fast
        #[arg(long, default_value = "reencode")]
        mode: ConcatMode,

        /// Target width; 0 adopts the first source's (reencode mode)
        #[arg(long, default_value_t = 0)]
        width: u32,

        /// Target height; 0 adopts the first source's (reencode mode)
        #[arg(long, default_value_t = 0)]
        height: u32,

        /// Target frame rate; 0 adopts the first source's (reencode mode)
        #[arg(long, default_value_t = 0)]
        fps: u32,

        /// Output filename prefix
        #[arg(long, default_value = "concat")]
        prefix: String,

        /// Output container: mp4, mov or webm
        #[arg(long, default_value = "mp4")]
        format: Container,

        /// External audio file muxed onto the output
        #[arg(long)]
        external_audio: Option<PathBuf>,

        /// Do not stop at the shortest stream when muxing external audio
        #[arg(long)]
        no_shortest: bool,
    },

    /// Print the first video stream's metadata as JSON
    Probe {
        /// Media file to inspect
        video: PathBuf,
    },

    /// Classify a path against the served output/temp directories
    Preview {
        /// File to preview, relative to the output directory or absolute
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut manager = ConfigManager::new(&cli.config);
    manager
        .load_or_create()
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let settings = manager.settings().clone();

    let resolver = FileHandleResolver;
    let ctx = OpContext::new(&settings, Some(&resolver));

    match cli.command {
        Commands::Cut {
            video,
            mode,
            start_time,
            duration,
            start_frame,
            frame_count,
            fps,
            fallback_fps,
            no_audio,
        } => {
            let range = match mode {
                CutModeArg::Time => CutRange::Time {
                    start_secs: start_time,
                    duration_secs: duration,
                },
                CutModeArg::Frame => CutRange::Frames {
                    start_frame,
                    frame_count,
                    rate: match fps {
                        Some(fps) => RateSource::Manual { fps },
                        None => RateSource::Auto { fallback_fps },
                    },
                },
            };
            let spec = CutSpec {
                source: MediaSource::from_path(video),
                range,
                keep_audio: !no_audio,
            };
            report(ops::cut::run(&ctx, &spec)?);
        }

        Commands::Overlay {
            background,
            foreground,
            x,
            y,
            fg_width,
            fg_height,
            audio_from,
            external_audio,
        } => {
            let spec = OverlaySpec {
                background: MediaSource::from_path(background),
                foreground: MediaSource::from_path(foreground),
                x,
                y,
                fg_width,
                fg_height,
                audio: audio_from,
                external_audio: external_audio.map(MediaSource::from_path),
            };
            report(ops::overlay::run(&ctx, &spec)?);
        }

        Commands::Concat {
            videos,
            mode,
            width,
            height,
            fps,
            prefix,
            format,
            external_audio,
            no_shortest,
        } => {
            let spec = ConcatSpec {
                sources: videos.into_iter().map(MediaSource::from).collect(),
                mode,
                target_width: width,
                target_height: height,
                target_fps: fps,
                container: format,
                filename_prefix: prefix,
                external_audio: external_audio.map(MediaSource::from_path),
                shortest: !no_shortest,
            };
            report(ops::concat::run(&ctx, &spec)?);
        }

        Commands::Probe { video } => {
            let info = probe::probe_video(&settings.tools.ffprobe, &video);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Preview { path } => {
            let location = ops::preview::resolve_preview(
                &path,
                &ctx.output_dir(),
                &ctx.temp_dir(),
            )?;
            let root = match location.root {
                ops::preview::PreviewRoot::Output => "output",
                ops::preview::PreviewRoot::Temp => "temp",
            };
            if location.subfolder.is_empty() {
                println!("{root}: {}", location.file_name);
            } else {
                println!("{root}: {}/{}", location.subfolder, location.file_name);
            }
        }
    }

    Ok(())
}

fn report(artifact: OutputArtifact) {
    println!("{}", artifact.path.display());
}
