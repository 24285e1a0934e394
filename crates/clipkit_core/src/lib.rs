//! ClipKit core - FFmpeg-backed media operations.
//!
//! This crate contains all business logic with zero UI dependencies:
//! typed operation specs, output path allocation, source probing, and the
//! subprocess plumbing around FFmpeg. It can be used by the CLI or embedded
//! in another front end.

pub mod config;
pub mod error;
pub mod models;
pub mod ops;
pub mod output;
pub mod probe;
pub mod runner;

pub use error::{ClipError, OpResult};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
