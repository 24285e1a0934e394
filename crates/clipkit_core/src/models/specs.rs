//! Typed operation specs.
//!
//! These structs are the explicit, validated boundary of each operation,
//! the replacement for schema-driven input declarations. `validate()` is
//! called before any probing or command construction.

use serde::{Deserialize, Serialize};

use super::enums::{ConcatMode, Container, OverlayAudio};
use super::handle::MediaSource;
use crate::error::{ClipError, OpResult};

/// Where the frame rate for a frame-based cut comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Probe the source; fall back to the given value when probing fails.
    Auto { fallback_fps: f64 },
    /// Use this value, skipping the probe.
    Manual { fps: f64 },
}

/// The cut window, in seconds or frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutRange {
    /// Seconds-based window. A non-positive duration means "to end".
    Time { start_secs: f64, duration_secs: f64 },
    /// Frame-based window, converted to seconds via a resolved frame rate.
    /// A non-positive frame count means "to end".
    Frames {
        start_frame: i64,
        frame_count: i64,
        rate: RateSource,
    },
}

/// Parameters for the cut operation.
#[derive(Debug, Clone)]
pub struct CutSpec {
    pub source: MediaSource,
    pub range: CutRange,
    /// Keep (re-encode) the source audio, or drop it entirely.
    pub keep_audio: bool,
}

/// Parameters for the overlay operation.
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    pub background: MediaSource,
    pub foreground: MediaSource,
    /// Placement of the foreground's top-left corner. Negative values are
    /// allowed (off-canvas placement).
    pub x: i32,
    pub y: i32,
    /// Size the foreground is scaled to before compositing.
    pub fg_width: u32,
    pub fg_height: u32,
    /// Audio selection; overridden entirely by `external_audio`.
    pub audio: OverlayAudio,
    pub external_audio: Option<MediaSource>,
}

impl OverlaySpec {
    pub fn validate(&self) -> OpResult<()> {
        if self.fg_width == 0 || self.fg_height == 0 {
            return Err(ClipError::invalid_parameter(
                "foreground target size must be at least 1x1",
            ));
        }
        Ok(())
    }
}

/// Parameters for the concat operation.
#[derive(Debug, Clone)]
pub struct ConcatSpec {
    /// 1 to 4 sources, in output order.
    pub sources: Vec<MediaSource>,
    pub mode: ConcatMode,
    /// Target box for re-encode mode; 0 means "adopt from the first source".
    pub target_width: u32,
    pub target_height: u32,
    /// Target frame rate for re-encode mode; 0 means "adopt from the first
    /// source".
    pub target_fps: u32,
    pub container: Container,
    /// Output filename prefix (the sequential counter is appended).
    pub filename_prefix: String,
    pub external_audio: Option<MediaSource>,
    /// Stop at the shortest stream when muxing external audio.
    pub shortest: bool,
}

/// Maximum number of concat sources.
pub const MAX_CONCAT_SOURCES: usize = 4;

impl ConcatSpec {
    pub fn validate(&self) -> OpResult<()> {
        if self.sources.is_empty() {
            return Err(ClipError::invalid_parameter(
                "at least one source video is required",
            ));
        }
        if self.sources.len() > MAX_CONCAT_SOURCES {
            return Err(ClipError::invalid_parameter(format!(
                "at most {MAX_CONCAT_SOURCES} sources are supported, got {}",
                self.sources.len()
            )));
        }
        if self.filename_prefix.trim_matches('_').is_empty() {
            return Err(ClipError::invalid_parameter(
                "filename prefix must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat_spec(sources: usize) -> ConcatSpec {
        ConcatSpec {
            sources: (0..sources)
                .map(|i| MediaSource::from_path(format!("/in/{i}.mp4")))
                .collect(),
            mode: ConcatMode::Fast,
            target_width: 0,
            target_height: 0,
            target_fps: 0,
            container: Container::Mp4,
            filename_prefix: "concat_".to_string(),
            external_audio: None,
            shortest: true,
        }
    }

    #[test]
    fn concat_rejects_empty_sources() {
        let spec = concat_spec(0);
        assert!(matches!(
            spec.validate(),
            Err(ClipError::InvalidParameter(_))
        ));
    }

    #[test]
    fn concat_rejects_too_many_sources() {
        let spec = concat_spec(5);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn concat_rejects_blank_prefix() {
        let mut spec = concat_spec(1);
        spec.filename_prefix = "__".to_string();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn concat_accepts_valid_spec() {
        assert!(concat_spec(2).validate().is_ok());
    }

    #[test]
    fn overlay_rejects_zero_size() {
        let spec = OverlaySpec {
            background: MediaSource::from_path("/in/bg.mp4"),
            foreground: MediaSource::from_path("/in/fg.mp4"),
            x: 0,
            y: 0,
            fg_width: 0,
            fg_height: 240,
            audio: OverlayAudio::Background,
            external_audio: None,
        };
        assert!(spec.validate().is_err());
    }
}
