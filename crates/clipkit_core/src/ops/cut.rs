//! Cut: extract a window of a source video.
//!
//! Frame-based windows are converted to seconds with a frame rate resolved
//! from the prober or a manual value; seconds-based windows are used as-is
//! with negatives clamped to zero. The actual trimming is FFmpeg's.

use std::path::Path;

use crate::config::EncodeSettings;
use crate::error::{ClipError, OpResult};
use crate::models::{CutRange, CutSpec, OutputArtifact, RateSource};
use crate::{output, probe, runner};

use super::OpContext;

/// Filename prefix for cut outputs.
pub const CUT_PREFIX: &str = "cut_";
const CUT_PAD: usize = 2;
const CUT_EXT: &str = ".mp4";

/// Run the cut operation.
pub fn run(ctx: &OpContext, spec: &CutSpec) -> OpResult<OutputArtifact> {
    let source = spec.source.require_existing()?;

    let (start_secs, duration_secs) = resolve_window(&spec.range, || {
        probe::video_fps(&ctx.settings.tools.ffprobe, source)
    })?;

    runner::ensure_tool(&ctx.settings.tools.ffmpeg)?;

    let out_path = output::next_numbered_path(&ctx.output_dir(), CUT_PREFIX, CUT_PAD, CUT_EXT)?;
    let args = build_cut_command(
        source,
        start_secs,
        duration_secs,
        spec.keep_audio,
        &ctx.settings.encode,
        &out_path,
    );

    runner::run_command(&ctx.settings.tools.ffmpeg, &args)?;
    tracing::info!("Cut written to {}", out_path.display());

    let handle = ctx.require_resolver("cut")?.resolve(&out_path)?;
    Ok(OutputArtifact {
        path: out_path,
        handle: Some(handle),
    })
}

/// Resolve the effective (start, duration) window in seconds.
///
/// `probed_fps` is only invoked for frame-based ranges with automatic rate
/// detection. Fails with an invalid-parameter error when a frame-based
/// range has no usable frame rate from either detection or manual input.
pub fn resolve_window(
    range: &CutRange,
    probed_fps: impl FnOnce() -> Option<f64>,
) -> OpResult<(f64, f64)> {
    match *range {
        CutRange::Time {
            start_secs,
            duration_secs,
        } => Ok((start_secs.max(0.0), duration_secs.max(0.0))),
        CutRange::Frames {
            start_frame,
            frame_count,
            rate,
        } => {
            let fps = match rate {
                RateSource::Manual { fps } => fps,
                RateSource::Auto { fallback_fps } => match probed_fps() {
                    Some(fps) if fps > 0.0 => fps,
                    _ => fallback_fps,
                },
            };
            if fps <= 0.0 {
                return Err(ClipError::invalid_parameter(
                    "frame-based cut needs a positive frame rate; \
                     auto-detection failed and no usable manual value was given",
                ));
            }

            let start_frame = start_frame.max(0) as f64;
            let frame_count = frame_count.max(0) as f64;
            let duration = if frame_count > 0.0 {
                frame_count / fps
            } else {
                0.0
            };
            Ok((start_frame / fps, duration))
        }
    }
}

/// Build the FFmpeg argument list for a cut.
///
/// The seek flag is only emitted for a positive start, the duration flag
/// only for a positive duration (absent means "to end of source").
pub fn build_cut_command(
    source: &Path,
    start_secs: f64,
    duration_secs: f64,
    keep_audio: bool,
    encode: &EncodeSettings,
    out_path: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".to_string()];

    if start_secs > 0.0 {
        args.push("-ss".to_string());
        args.push(start_secs.to_string());
    }

    args.push("-i".to_string());
    args.push(source.to_string_lossy().into_owned());

    if duration_secs > 0.0 {
        args.push("-t".to_string());
        args.push(duration_secs.to_string());
    }

    args.extend([
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        encode.cut_preset.clone(),
        "-crf".to_string(),
        encode.crf.to_string(),
    ]);

    if keep_audio {
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            encode.audio_bitrate.clone(),
        ]);
    } else {
        args.push("-an".to_string());
    }

    args.push(out_path.to_string_lossy().into_owned());
    args
}
