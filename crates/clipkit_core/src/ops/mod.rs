//! Media operations: cut, overlay, concat, preview resolution.
//!
//! Every operation follows the same shape: validate the typed spec,
//! optionally probe the source, allocate an output path, build the FFmpeg
//! argument list, run it, and wrap the produced path.

pub mod concat;
pub mod cut;
pub mod overlay;
pub mod preview;

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{ClipError, OpResult};
use crate::models::HandleResolver;

/// Execution context shared by all operations.
///
/// Carries the settings and the optional host-handle capability. Whether a
/// missing capability is an error is decided per operation.
pub struct OpContext<'a> {
    pub settings: &'a Settings,
    pub resolver: Option<&'a dyn HandleResolver>,
}

impl<'a> OpContext<'a> {
    /// Create a context.
    pub fn new(settings: &'a Settings, resolver: Option<&'a dyn HandleResolver>) -> Self {
        Self { settings, resolver }
    }

    /// The configured output directory.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.output_dir)
    }

    /// The configured temp directory.
    pub fn temp_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.temp_dir)
    }

    /// The handle capability, required.
    pub(crate) fn require_resolver(&self, op: &str) -> OpResult<&'a dyn HandleResolver> {
        self.resolver.ok_or_else(|| {
            ClipError::environment_incompatible(format!(
                "the {op} operation requires a media handle resolver, but none is installed"
            ))
        })
    }
}
