//! Source metadata probing via ffprobe.
//!
//! Probing is strictly best-effort: any process, exit, or parse failure
//! collapses to "unknown" and the caller supplies a fallback. The only
//! stream inspected is video stream 0.

use std::path::Path;
use std::process::Command;

use serde::Serialize;
use serde_json::Value;

/// Metadata of the first video stream of a file.
///
/// Every field is optional; `None` means the value could not be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VideoStreamInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Average frame rate over the whole stream.
    pub avg_fps: Option<f64>,
    /// Container-declared (real base) frame rate.
    pub real_fps: Option<f64>,
}

impl VideoStreamInfo {
    /// Best available frame rate, preferring the stream average.
    pub fn fps(&self) -> Option<f64> {
        self.avg_fps.or(self.real_fps)
    }
}

/// Probe the first video stream of `path`.
///
/// Never fails: a missing file, unlaunchable ffprobe, non-zero exit, or
/// malformed JSON all yield an all-unknown [`VideoStreamInfo`].
pub fn probe_video(ffprobe: &str, path: &Path) -> VideoStreamInfo {
    if !path.exists() {
        return VideoStreamInfo::default();
    }

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path)
        .output();

    let output = match output {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            tracing::debug!(
                "ffprobe exited with {:?} for {}",
                o.status.code(),
                path.display()
            );
            return VideoStreamInfo::default();
        }
        Err(e) => {
            tracing::debug!("Failed to run ffprobe: {e}");
            return VideoStreamInfo::default();
        }
    };

    match serde_json::from_slice::<Value>(&output.stdout) {
        Ok(json) => parse_probe_json(&json),
        Err(e) => {
            tracing::debug!("Failed to parse ffprobe output: {e}");
            VideoStreamInfo::default()
        }
    }
}

/// Frame rate of the first video stream, preferring the declared base rate.
///
/// Returns `None` when it cannot be determined or is not positive.
pub fn video_fps(ffprobe: &str, path: &Path) -> Option<f64> {
    let info = probe_video(ffprobe, path);
    info.real_fps.or(info.avg_fps).filter(|fps| *fps > 0.0)
}

/// Parse the JSON document produced by `ffprobe -of json`.
fn parse_probe_json(json: &Value) -> VideoStreamInfo {
    let Some(stream) = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
    else {
        return VideoStreamInfo::default();
    };

    VideoStreamInfo {
        width: stream
            .get("width")
            .and_then(|v| v.as_u64())
            .map(|w| w as u32),
        height: stream
            .get("height")
            .and_then(|v| v.as_u64())
            .map(|h| h as u32),
        avg_fps: stream
            .get("avg_frame_rate")
            .and_then(|v| v.as_str())
            .and_then(parse_frame_rate),
        real_fps: stream
            .get("r_frame_rate")
            .and_then(|v| v.as_str())
            .and_then(parse_frame_rate),
    }
}

/// Parse a frame rate string like "30000/1001" or "25" into a float.
///
/// Zero denominators and anything unparsable yield `None`; this function
/// never panics.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let parts: Vec<&str> = rate.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].trim().parse().ok()?;
        let den: f64 = parts[1].trim().parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frame_rate_handles_rational() {
        let fps = parse_frame_rate("30000/1001").unwrap();
        assert!((fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn parse_frame_rate_handles_plain_number() {
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("23.976"), Some(23.976));
    }

    #[test]
    fn parse_frame_rate_rejects_zero_denominator() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("30/0"), None);
    }

    #[test]
    fn parse_frame_rate_rejects_garbage() {
        assert_eq!(parse_frame_rate(""), None);
        assert_eq!(parse_frame_rate("x/y"), None);
        assert_eq!(parse_frame_rate("a25"), None);
    }

    #[test]
    fn parse_probe_json_reads_stream_fields() {
        let json: Value = serde_json::from_str(
            r#"{"streams":[{"width":1280,"height":720,"avg_frame_rate":"24/1","r_frame_rate":"24000/1001"}]}"#,
        )
        .unwrap();
        let info = parse_probe_json(&json);
        assert_eq!(info.width, Some(1280));
        assert_eq!(info.height, Some(720));
        assert_eq!(info.avg_fps, Some(24.0));
        assert!((info.real_fps.unwrap() - 23.976).abs() < 0.001);
    }

    #[test]
    fn parse_probe_json_tolerates_missing_streams() {
        let json: Value = serde_json::from_str("{}").unwrap();
        assert_eq!(parse_probe_json(&json), VideoStreamInfo::default());
    }

    #[test]
    fn probe_missing_file_is_unknown_not_error() {
        let info = probe_video("ffprobe", Path::new("/nonexistent/clip.mp4"));
        assert_eq!(info, VideoStreamInfo::default());
    }
}
