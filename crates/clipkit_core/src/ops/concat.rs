//! Concat: join 1-4 sources into one output.
//!
//! Fast mode stream-copies via FFmpeg's concat demuxer and a temporary
//! manifest file (or a plain re-container for a single source). Re-encode
//! mode normalizes every source to a common box and frame rate with a
//! filter-graph concat; audio is never pulled from the sources themselves.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EncodeSettings;
use crate::error::{ClipError, OpResult};
use crate::models::{ConcatMode, ConcatSpec, OutputArtifact};
use crate::probe::VideoStreamInfo;
use crate::{output, probe, runner};

use super::OpContext;

/// Fixed name of the fast-concat manifest, written into the output
/// directory and removed after the run.
pub const MANIFEST_NAME: &str = "temp_concat_list_fast.txt";
const CONCAT_PAD: usize = 5;

/// Defaults when the first source cannot be probed.
const FALLBACK_WIDTH: u32 = 1920;
const FALLBACK_HEIGHT: u32 = 1080;
const FALLBACK_FPS: u32 = 30;

/// Run the concat operation.
pub fn run(ctx: &OpContext, spec: &ConcatSpec) -> OpResult<OutputArtifact> {
    spec.validate()?;

    let mut sources = Vec::with_capacity(spec.sources.len());
    for source in &spec.sources {
        sources.push(source.require_existing()?);
    }
    let external_audio = spec
        .external_audio
        .as_ref()
        .map(|a| a.require_existing())
        .transpose()?;

    runner::ensure_tool(&ctx.settings.tools.ffmpeg)?;

    let prefix = format!("{}_", spec.filename_prefix.trim_end_matches('_'));
    let out_path = output::next_numbered_path(
        &ctx.output_dir(),
        &prefix,
        CONCAT_PAD,
        spec.container.extension(),
    )?;

    match spec.mode {
        ConcatMode::Fast => {
            if uses_direct_copy(spec) {
                let args = build_single_copy_command(sources[0], &out_path);
                runner::run_command(&ctx.settings.tools.ffmpeg, &args)?;
            } else {
                let manifest = write_manifest(&ctx.output_dir(), &sources)?;
                let args = build_manifest_concat_command(
                    &manifest,
                    external_audio,
                    spec.shortest,
                    &out_path,
                );
                let result = runner::run_command(&ctx.settings.tools.ffmpeg, &args);
                remove_manifest(&manifest);
                result?;
            }
        }
        ConcatMode::Reencode => {
            let first = probe::probe_video(&ctx.settings.tools.ffprobe, sources[0]);
            let (width, height, fps) = resolve_targets(spec, &first);
            let args = build_reencode_command(
                &sources,
                external_audio,
                spec.shortest,
                width,
                height,
                fps,
                &ctx.settings.encode,
                &out_path,
            );
            runner::run_command(&ctx.settings.tools.ffmpeg, &args)?;
        }
    }

    tracing::info!("Concat written to {}", out_path.display());

    // Tolerant of a missing handle capability: fall back to the bare path.
    let handle = ctx
        .resolver
        .map(|r| r.resolve(&out_path))
        .transpose()?;
    Ok(OutputArtifact {
        path: out_path,
        handle,
    })
}

/// Fast mode skips the manifest when there is exactly one source and no
/// external audio: a plain re-container is enough.
pub(crate) fn uses_direct_copy(spec: &ConcatSpec) -> bool {
    spec.sources.len() == 1 && spec.external_audio.is_none()
}

/// Resolve the target box and frame rate for re-encode mode.
///
/// Explicit values win when both dimensions (or the fps) are positive;
/// otherwise the first source's probed values are adopted, and 1920x1080
/// at 30 fps when nothing is probeable.
pub(crate) fn resolve_targets(spec: &ConcatSpec, first: &VideoStreamInfo) -> (u32, u32, u32) {
    let (width, height) = if spec.target_width > 0 && spec.target_height > 0 {
        (spec.target_width, spec.target_height)
    } else {
        (
            first.width.filter(|w| *w > 0).unwrap_or(FALLBACK_WIDTH),
            first.height.filter(|h| *h > 0).unwrap_or(FALLBACK_HEIGHT),
        )
    };

    let fps = if spec.target_fps > 0 {
        spec.target_fps
    } else {
        first
            .fps()
            .filter(|fps| *fps > 0.0)
            .map(|fps| (fps.round() as u32).max(1))
            .unwrap_or(FALLBACK_FPS)
    };

    (width, height, fps)
}

/// Write the concat demuxer manifest: one `file '<absolute-path>'` line per
/// source, forward-slash-normalized.
pub(crate) fn write_manifest(dir: &Path, sources: &[&Path]) -> OpResult<PathBuf> {
    let manifest = dir.join(MANIFEST_NAME);

    let mut content = String::new();
    for source in sources {
        let abs = std::path::absolute(source)
            .map_err(|e| ClipError::io_error(format!("resolving {}", source.display()), e))?;
        let line = abs.to_string_lossy().replace('\\', "/");
        content.push_str(&format!("file '{line}'\n"));
    }

    fs::write(&manifest, content)
        .map_err(|e| ClipError::io_error(format!("writing {}", manifest.display()), e))?;
    Ok(manifest)
}

/// Best-effort manifest removal; failures are logged and swallowed.
fn remove_manifest(manifest: &Path) {
    if let Err(e) = fs::remove_file(manifest) {
        tracing::warn!("Failed to remove manifest {}: {e}", manifest.display());
    }
}

/// Single source, no external audio: direct stream copy into the new
/// container.
pub(crate) fn build_single_copy_command(source: &Path, out_path: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        source.to_string_lossy().into_owned(),
        "-c".to_string(),
        "copy".to_string(),
        out_path.to_string_lossy().into_owned(),
    ]
}

/// Concat-demuxer command with stream copy.
pub(crate) fn build_manifest_concat_command(
    manifest: &Path,
    external_audio: Option<&Path>,
    shortest: bool,
    out_path: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        manifest.to_string_lossy().into_owned(),
    ];

    if let Some(audio) = external_audio {
        args.push("-i".to_string());
        args.push(audio.to_string_lossy().into_owned());
        args.extend([
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
        ]);
        if shortest {
            args.push("-shortest".to_string());
        }
        args.extend([
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "copy".to_string(),
        ]);
    } else {
        args.extend(["-c".to_string(), "copy".to_string()]);
    }

    args.push(out_path.to_string_lossy().into_owned());
    args
}

/// Re-encode command: per-source normalize chain, filter-graph concat,
/// optional external audio.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_reencode_command(
    sources: &[&Path],
    external_audio: Option<&Path>,
    shortest: bool,
    width: u32,
    height: u32,
    fps: u32,
    encode: &EncodeSettings,
    out_path: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".to_string()];

    for source in sources {
        args.push("-i".to_string());
        args.push(source.to_string_lossy().into_owned());
    }

    let audio_input_index = sources.len();
    if let Some(audio) = external_audio {
        args.push("-i".to_string());
        args.push(audio.to_string_lossy().into_owned());
    }

    // Scale down preserving aspect ratio, pad to exactly fill the box
    // (centered), normalize SAR, force the target rate.
    let mut filter_parts: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(idx, _)| {
            format!(
                "[{idx}:v:0]scale={width}:{height}:force_original_aspect_ratio=decrease,\
                 pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}[v{idx}]"
            )
        })
        .collect();

    let concat_inputs: String = (0..sources.len()).map(|i| format!("[v{i}]")).collect();
    filter_parts.push(format!(
        "{concat_inputs}concat=n={}:v=1:a=0[outv]",
        sources.len()
    ));

    args.extend([
        "-filter_complex".to_string(),
        filter_parts.join("; "),
        "-map".to_string(),
        "[outv]".to_string(),
    ]);

    if external_audio.is_some() {
        args.push("-map".to_string());
        args.push(format!("{audio_input_index}:a:0"));
        if shortest {
            args.push("-shortest".to_string());
        }
    } else {
        args.push("-an".to_string());
    }

    args.extend([
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        encode.concat_preset.clone(),
        "-crf".to_string(),
        encode.crf.to_string(),
    ]);

    if external_audio.is_some() {
        args.extend([
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            encode.audio_bitrate.clone(),
        ]);
    }

    args.push(out_path.to_string_lossy().into_owned());
    args
}
