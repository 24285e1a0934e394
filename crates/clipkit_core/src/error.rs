//! Error types for ClipKit operations.
//!
//! A single taxonomy covers every failure class an operation can hit,
//! from missing inputs (caught before any subprocess is spawned) to
//! non-zero exits of the external tool.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by ClipKit operations.
#[derive(Error, Debug)]
pub enum ClipError {
    /// A required input file does not exist on disk.
    #[error("Input file not found: {path}")]
    MissingInput { path: PathBuf },

    /// An external tool cannot be invoked at all.
    #[error("Cannot invoke '{tool}': {message}. Install it and make sure it is on PATH")]
    ToolUnavailable { tool: String, message: String },

    /// A parameter failed validation before command construction.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An external tool exited non-zero.
    ///
    /// Carries the full rendered command line and the tool's diagnostic
    /// text so filter-graph syntax errors can be debugged from the message.
    #[error("{tool} failed with exit code {exit_code}\ncommand: {command}\nstderr:\n{stderr}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        command: String,
        stderr: String,
    },

    /// A capability the operation requires is not installed in the context.
    #[error("Host environment incompatible: {0}")]
    EnvironmentIncompatible(String),

    /// File I/O error with operation context.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ClipError {
    /// Create a missing input error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Create a tool unavailable error.
    pub fn tool_unavailable(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        command: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create an environment incompatible error.
    pub fn environment_incompatible(message: impl Into<String>) -> Self {
        Self::EnvironmentIncompatible(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for ClipKit operations.
pub type OpResult<T> = Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_displays_full_context() {
        let err = ClipError::command_failed(
            "ffmpeg",
            1,
            "ffmpeg -y -i in.mp4 out.mp4",
            "Unknown encoder 'libx999'",
        );
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg failed with exit code 1"));
        assert!(msg.contains("ffmpeg -y -i in.mp4 out.mp4"));
        assert!(msg.contains("Unknown encoder"));
    }

    #[test]
    fn tool_unavailable_mentions_path_guidance() {
        let err = ClipError::tool_unavailable("ffprobe", "No such file or directory");
        assert!(err.to_string().contains("on PATH"));
    }
}
