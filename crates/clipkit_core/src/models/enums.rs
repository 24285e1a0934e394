//! Enumerated operation modes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which audio track an overlay output carries.
///
/// Ignored entirely when an external audio file is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAudio {
    /// Background video's audio.
    #[default]
    Background,
    /// Foreground video's audio.
    Foreground,
    /// Both inputs mixed two-way, unnormalized.
    Mix,
    /// No audio track at all.
    None,
}

impl OverlayAudio {
    /// Get all selectable values.
    pub fn all() -> &'static [OverlayAudio] {
        &[Self::Background, Self::Foreground, Self::Mix, Self::None]
    }
}

impl std::fmt::Display for OverlayAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayAudio::Background => write!(f, "background"),
            OverlayAudio::Foreground => write!(f, "foreground"),
            OverlayAudio::Mix => write!(f, "mix"),
            OverlayAudio::None => write!(f, "none"),
        }
    }
}

impl FromStr for OverlayAudio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(Self::Background),
            "foreground" => Ok(Self::Foreground),
            "mix" => Ok(Self::Mix),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown audio source '{other}' (expected background, foreground, mix or none)"
            )),
        }
    }
}

/// Concatenation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcatMode {
    /// Re-encode every source to a common resolution and frame rate.
    #[default]
    Reencode,
    /// Stream-copy via the concat demuxer; sources must already be
    /// parameter-compatible.
    Fast,
}

impl std::fmt::Display for ConcatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcatMode::Reencode => write!(f, "reencode"),
            ConcatMode::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for ConcatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reencode" => Ok(Self::Reencode),
            "fast" => Ok(Self::Fast),
            other => Err(format!(
                "unknown concat mode '{other}' (expected reencode or fast)"
            )),
        }
    }
}

/// Output container format for concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mov,
    Webm,
}

impl Container {
    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp4 => ".mp4",
            Container::Mov => ".mov",
            Container::Webm => ".webm",
        }
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Container::Mp4 => write!(f, "mp4"),
            Container::Mov => write!(f, "mov"),
            Container::Webm => write!(f, "webm"),
        }
    }
}

impl FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(Self::Mp4),
            "mov" => Ok(Self::Mov),
            "webm" => Ok(Self::Webm),
            other => Err(format!(
                "unknown container '{other}' (expected mp4, mov or webm)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_audio_serializes_lowercase() {
        let json = serde_json::to_string(&OverlayAudio::Background).unwrap();
        assert_eq!(json, "\"background\"");
    }

    #[test]
    fn overlay_audio_parses_all_values() {
        for value in OverlayAudio::all() {
            assert_eq!(value.to_string().parse::<OverlayAudio>(), Ok(*value));
        }
        assert!("stereo".parse::<OverlayAudio>().is_err());
    }

    #[test]
    fn container_extension_includes_dot() {
        assert_eq!(Container::Mp4.extension(), ".mp4");
        assert_eq!(Container::Webm.extension(), ".webm");
    }

    #[test]
    fn concat_mode_round_trips() {
        assert_eq!("fast".parse::<ConcatMode>(), Ok(ConcatMode::Fast));
        assert_eq!(ConcatMode::Reencode.to_string(), "reencode");
    }
}
