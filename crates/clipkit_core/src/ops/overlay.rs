//! Overlay: composite a scaled foreground onto a background video.
//!
//! The filter graph scales the foreground to the target size, then overlays
//! it at (x, y) stopping at the shorter input. Audio comes from the selected
//! input, a two-way mix, or nowhere. An external audio file, when supplied,
//! overrides all of those and is mapped as a third input.

use std::path::Path;

use crate::config::EncodeSettings;
use crate::error::OpResult;
use crate::models::{OutputArtifact, OverlayAudio, OverlaySpec};
use crate::{output, runner};

use super::OpContext;

/// Filename prefix for overlay outputs.
pub const OVERLAY_PREFIX: &str = "overlay_";
const OVERLAY_PAD: usize = 2;
const OVERLAY_EXT: &str = ".mp4";

/// Run the overlay operation.
pub fn run(ctx: &OpContext, spec: &OverlaySpec) -> OpResult<OutputArtifact> {
    spec.validate()?;
    let background = spec.background.require_existing()?;
    let foreground = spec.foreground.require_existing()?;
    let external_audio = spec
        .external_audio
        .as_ref()
        .map(|a| a.require_existing())
        .transpose()?;

    runner::ensure_tool(&ctx.settings.tools.ffmpeg)?;

    let out_path =
        output::next_numbered_path(&ctx.output_dir(), OVERLAY_PREFIX, OVERLAY_PAD, OVERLAY_EXT)?;
    let args = build_overlay_command(
        background,
        foreground,
        spec,
        external_audio,
        &ctx.settings.encode,
        &out_path,
    );

    runner::run_command(&ctx.settings.tools.ffmpeg, &args)?;
    tracing::info!("Overlay written to {}", out_path.display());

    let handle = ctx.require_resolver("overlay")?.resolve(&out_path)?;
    Ok(OutputArtifact {
        path: out_path,
        handle: Some(handle),
    })
}

/// Audio portion of the command: extra filter stage, map arguments, and
/// whether an audio codec must be emitted at all.
struct AudioArgs {
    extra_filter: &'static str,
    maps: Vec<String>,
    needs_codec: bool,
}

fn audio_args_for_selection(selection: OverlayAudio) -> AudioArgs {
    match selection {
        OverlayAudio::Background => AudioArgs {
            extra_filter: "",
            maps: vec!["-map".to_string(), "0:a?".to_string()],
            needs_codec: true,
        },
        OverlayAudio::Foreground => AudioArgs {
            extra_filter: "",
            maps: vec!["-map".to_string(), "1:a?".to_string()],
            needs_codec: true,
        },
        OverlayAudio::Mix => AudioArgs {
            extra_filter: ";[0:a][1:a]amix=inputs=2:normalize=0[aout]",
            maps: vec!["-map".to_string(), "[aout]".to_string()],
            needs_codec: true,
        },
        OverlayAudio::None => AudioArgs {
            extra_filter: "",
            maps: vec![],
            needs_codec: false,
        },
    }
}

/// External audio is the third input (index 2) and its stream is mapped
/// directly, regardless of the selection.
fn audio_args_external() -> AudioArgs {
    AudioArgs {
        extra_filter: "",
        maps: vec!["-map".to_string(), "2:a?".to_string()],
        needs_codec: true,
    }
}

/// Build the FFmpeg argument list for an overlay.
pub fn build_overlay_command(
    background: &Path,
    foreground: &Path,
    spec: &OverlaySpec,
    external_audio: Option<&Path>,
    encode: &EncodeSettings,
    out_path: &Path,
) -> Vec<String> {
    let video_filter = format!(
        "[1:v]scale={}:{}[fg];[0:v][fg]overlay={}:{}:shortest=1[outv]",
        spec.fg_width, spec.fg_height, spec.x, spec.y
    );

    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        background.to_string_lossy().into_owned(),
        "-i".to_string(),
        foreground.to_string_lossy().into_owned(),
    ];

    let audio = if let Some(audio_path) = external_audio {
        args.push("-i".to_string());
        args.push(audio_path.to_string_lossy().into_owned());
        audio_args_external()
    } else {
        audio_args_for_selection(spec.audio)
    };

    let filter_complex = format!("{}{}", video_filter, audio.extra_filter);

    args.extend([
        "-filter_complex".to_string(),
        filter_complex,
        "-map".to_string(),
        "[outv]".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        encode.cut_preset.clone(),
        "-crf".to_string(),
        encode.crf.to_string(),
    ]);

    args.extend(audio.maps);

    if audio.needs_codec {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaSource;

    fn spec(audio: OverlayAudio) -> OverlaySpec {
        OverlaySpec {
            background: MediaSource::from_path("bg.mp4"),
            foreground: MediaSource::from_path("fg.mp4"),
            x: 10,
            y: -20,
            fg_width: 320,
            fg_height: 240,
            audio,
            external_audio: None,
        }
    }

    fn build(audio: OverlayAudio, external: Option<&Path>) -> Vec<String> {
        build_overlay_command(
            Path::new("bg.mp4"),
            Path::new("fg.mp4"),
            &spec(audio),
            external,
            &EncodeSettings::default(),
            Path::new("out.mp4"),
        )
    }

    #[test]
    fn filter_scales_then_overlays_with_shortest() {
        let args = build(OverlayAudio::Background, None);
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(
            args[fc + 1],
            "[1:v]scale=320:240[fg];[0:v][fg]overlay=10:-20:shortest=1[outv]"
        );
    }

    #[test]
    fn background_selection_maps_first_input_audio() {
        let args = build(OverlayAudio::Background, None);
        let map = args.iter().position(|a| a == "0:a?").unwrap();
        assert_eq!(args[map - 1], "-map");
        assert!(args.contains(&"-c:a".to_string()));
    }

    #[test]
    fn foreground_selection_maps_second_input_audio() {
        let args = build(OverlayAudio::Foreground, None);
        assert!(args.contains(&"1:a?".to_string()));
    }

    #[test]
    fn mix_selection_appends_amix_stage() {
        let args = build(OverlayAudio::Mix, None);
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(args[fc + 1].ends_with(";[0:a][1:a]amix=inputs=2:normalize=0[aout]"));
        assert!(args.contains(&"[aout]".to_string()));
    }

    #[test]
    fn none_selection_emits_no_audio_codec_at_all() {
        let args = build(OverlayAudio::None, None);
        assert!(!args.contains(&"-c:a".to_string()));
        assert!(!args.contains(&"-b:a".to_string()));
        assert!(!args.iter().any(|a| a.contains(":a?")));
    }

    #[test]
    fn external_audio_overrides_any_selection() {
        for selection in OverlayAudio::all() {
            let args = build(*selection, Some(Path::new("song.wav")));
            assert!(args.contains(&"song.wav".to_string()));
            assert!(args.contains(&"2:a?".to_string()));
            assert!(args.contains(&"-c:a".to_string()));
            assert!(!args.contains(&"0:a?".to_string()));
            assert!(!args.contains(&"[aout]".to_string()));
        }
    }

    #[test]
    fn output_path_is_last_argument() {
        let args = build(OverlayAudio::Background, None);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }
}
