//! Settings struct with TOML-based sections.
//!
//! Sections map to TOML tables; every field carries a serde default so a
//! partial file (or none at all) always yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Encoding parameters shared by all operations.
    #[serde(default)]
    pub encode: EncodeSettings,
}

/// Output and staging directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory generated media files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Staging directory (frame dumps, temporary audio).
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_temp_dir() -> String {
    ".temp".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

/// Names (or absolute paths) of the external binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Processing/muxing tool.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Stream inspection tool.
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

/// Encoding parameters.
///
/// These are the fixed codec/quality constants of the operations, lifted
/// into configuration so they live in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Constant rate factor for libx264.
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// x264 preset for cut and overlay.
    #[serde(default = "default_cut_preset")]
    pub cut_preset: String,

    /// x264 preset for re-encode concatenation.
    #[serde(default = "default_concat_preset")]
    pub concat_preset: String,

    /// AAC bitrate for re-encoded audio.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

fn default_crf() -> u32 {
    18
}

fn default_cut_preset() -> String {
    "fast".to_string()
}

fn default_concat_preset() -> String {
    "medium".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            cut_preset: default_cut_preset(),
            concat_preset: default_concat_preset(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}
