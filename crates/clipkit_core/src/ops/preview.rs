//! Preview path resolution.
//!
//! Classifies a user-supplied path against the served output and temp
//! roots so a front end can preview an existing file without copying it.
//! Pure path logic; nothing is rendered or read.

use std::path::{Path, PathBuf};

use crate::error::{ClipError, OpResult};

/// Which served root a preview file lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewRoot {
    Output,
    Temp,
}

/// A preview-servable location: root + subfolder + file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLocation {
    pub root: PreviewRoot,
    /// Forward-slash-joined subfolder, empty when the file sits at the root.
    pub subfolder: String,
    pub file_name: String,
}

/// Resolve a path for previewing.
///
/// Relative paths resolve under the output root. Absolute paths must lie
/// inside the output or temp root; anything else is rejected with both
/// roots named in the error.
pub fn resolve_preview(
    raw_path: &str,
    output_dir: &Path,
    temp_dir: &Path,
) -> OpResult<PreviewLocation> {
    let trimmed = raw_path.trim();
    if trimmed.is_empty() {
        return Err(ClipError::invalid_parameter("preview path must not be empty"));
    }

    let normalized = trimmed.replace('\\', "/");
    let path = Path::new(&normalized);

    let (root, rel) = if path.is_absolute() {
        let abs = absolutize(path)?;
        let output_abs = absolutize(output_dir)?;
        let temp_abs = absolutize(temp_dir)?;

        if let Ok(rel) = abs.strip_prefix(&output_abs) {
            (PreviewRoot::Output, rel.to_path_buf())
        } else if let Ok(rel) = abs.strip_prefix(&temp_abs) {
            (PreviewRoot::Temp, rel.to_path_buf())
        } else {
            return Err(ClipError::invalid_parameter(format!(
                "absolute preview path is outside the served directories \
                 (output: {}, temp: {})",
                output_abs.display(),
                temp_abs.display()
            )));
        }
    } else {
        (PreviewRoot::Output, path.to_path_buf())
    };

    let file_name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClipError::invalid_parameter("preview path has no file name"))?;

    let subfolder = rel
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    Ok(PreviewLocation {
        root,
        subfolder,
        file_name,
    })
}

fn absolutize(path: &Path) -> OpResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| ClipError::io_error(format!("resolving {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_resolves_under_output() {
        let loc = resolve_preview(
            "video/clip_01.mp4",
            Path::new("/srv/output"),
            Path::new("/srv/temp"),
        )
        .unwrap();
        assert_eq!(loc.root, PreviewRoot::Output);
        assert_eq!(loc.subfolder, "video");
        assert_eq!(loc.file_name, "clip_01.mp4");
    }

    #[test]
    fn root_level_file_has_empty_subfolder() {
        let loc = resolve_preview(
            "cut_01.mp4",
            Path::new("/srv/output"),
            Path::new("/srv/temp"),
        )
        .unwrap();
        assert_eq!(loc.subfolder, "");
        assert_eq!(loc.file_name, "cut_01.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn absolute_path_inside_output_is_classified() {
        let loc = resolve_preview(
            "/srv/output/nested/overlay_02.mp4",
            Path::new("/srv/output"),
            Path::new("/srv/temp"),
        )
        .unwrap();
        assert_eq!(loc.root, PreviewRoot::Output);
        assert_eq!(loc.subfolder, "nested");
        assert_eq!(loc.file_name, "overlay_02.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn absolute_path_inside_temp_is_classified() {
        let loc = resolve_preview(
            "/srv/temp/frames_xyz.mp4",
            Path::new("/srv/output"),
            Path::new("/srv/temp"),
        )
        .unwrap();
        assert_eq!(loc.root, PreviewRoot::Temp);
    }

    #[cfg(unix)]
    #[test]
    fn absolute_path_outside_roots_is_rejected() {
        let result = resolve_preview(
            "/etc/passwd",
            Path::new("/srv/output"),
            Path::new("/srv/temp"),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ClipError::InvalidParameter(_)));
        assert!(err.to_string().contains("/srv/output"));
        assert!(err.to_string().contains("/srv/temp"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let result = resolve_preview("  ", Path::new("/o"), Path::new("/t"));
        assert!(result.is_err());
    }
}
