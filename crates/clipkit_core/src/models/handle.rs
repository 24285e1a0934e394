//! Media references and the host media-handle capability.
//!
//! Inputs arrive as a [`MediaSource`], an explicit tagged union resolved
//! once at the operation boundary, never inferred by attribute probing.
//! Outputs are wrapped into a [`VideoHandle`] by a [`HandleResolver`]
//! capability resolved at startup: operations either require it or degrade
//! to a bare path when it is absent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipError, OpResult};

/// A reference to an input media file.
///
/// Purely borrowed: the file is owned by whoever produced it and must exist
/// at time of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaSource {
    /// A raw filesystem path.
    Path(PathBuf),
    /// An already-constructed media handle.
    Handle(VideoHandle),
}

impl MediaSource {
    /// Create a source from a path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        match self {
            MediaSource::Path(p) => p,
            MediaSource::Handle(h) => h.path(),
        }
    }

    /// Resolve to a path, verifying the file exists.
    ///
    /// Checked before any subprocess is spawned so a dangling reference
    /// surfaces as [`ClipError::MissingInput`] rather than a tool error.
    pub fn require_existing(&self) -> OpResult<&Path> {
        let path = self.as_path();
        if !path.exists() {
            return Err(ClipError::missing_input(path));
        }
        Ok(path)
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// The host-native media object: a produced file plus its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoHandle {
    path: PathBuf,
}

impl VideoHandle {
    /// Construct a handle for a produced file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this handle refers to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Capability for wrapping an output path into a [`VideoHandle`].
///
/// Resolved once at startup and injected into the operation context.
pub trait HandleResolver {
    fn resolve(&self, path: &Path) -> OpResult<VideoHandle>;
}

/// Standard resolver backed by the local filesystem.
pub struct FileHandleResolver;

impl HandleResolver for FileHandleResolver {
    fn resolve(&self, path: &Path) -> OpResult<VideoHandle> {
        if !path.exists() {
            return Err(ClipError::missing_input(path));
        }
        Ok(VideoHandle::new(path))
    }
}

/// The (path, handle) pair every operation returns.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    /// Absolute or settings-relative path of the produced file.
    pub path: PathBuf,
    /// Host handle, when a resolver capability was available.
    pub handle: Option<VideoHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn require_existing_rejects_missing_file() {
        let source = MediaSource::from_path("/nonexistent/in.mp4");
        let result = source.require_existing();
        assert!(matches!(result, Err(ClipError::MissingInput { .. })));
    }

    #[test]
    fn require_existing_accepts_present_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.mp4");
        File::create(&path).unwrap();

        let source = MediaSource::from_path(&path);
        assert_eq!(source.require_existing().unwrap(), path.as_path());
    }

    #[test]
    fn file_resolver_wraps_existing_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        File::create(&path).unwrap();

        let handle = FileHandleResolver.resolve(&path).unwrap();
        assert_eq!(handle.path(), path.as_path());
    }

    #[test]
    fn handle_source_exposes_inner_path() {
        let source = MediaSource::Handle(VideoHandle::new("/tmp/clip.mp4"));
        assert_eq!(source.as_path(), Path::new("/tmp/clip.mp4"));
    }
}
