//! Synchronous runner for external tool invocations.
//!
//! Every operation shells out to FFmpeg; this module owns tool discovery,
//! the version-query preflight, and command execution with captured output.
//! There is no timeout: a hung binary hangs the invocation.

use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{ClipError, OpResult};

/// Captured output of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Look up a tool on the search path.
///
/// Returns the first matching file. On Windows, `<tool>.exe` is also tried.
/// Absolute or relative paths containing a separator are checked directly.
pub fn find_tool(tool: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(tool);
    if direct.components().count() > 1 {
        return direct.is_file().then_some(direct);
    }

    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let full = dir.join(tool);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{tool}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// Verify a tool is callable by running its version query.
///
/// This is the preflight check every operation runs before doing real work,
/// so a missing binary surfaces as a clear error instead of a confusing
/// spawn failure mid-operation.
pub fn ensure_tool(tool: &str) -> OpResult<()> {
    let status = Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| ClipError::tool_unavailable(tool, e.to_string()))?;

    if !status.success() {
        return Err(ClipError::tool_unavailable(
            tool,
            format!("version query exited with {:?}", status.code()),
        ));
    }
    Ok(())
}

/// Run a command synchronously, capturing both streams.
///
/// Output is decoded permissively (invalid byte sequences are replaced).
/// A non-zero exit becomes [`ClipError::CommandFailed`] embedding the full
/// rendered command line and the captured stderr.
pub fn run_command(program: &str, args: &[String]) -> OpResult<CommandOutput> {
    tracing::debug!("Running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ClipError::tool_unavailable(program, e.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(ClipError::command_failed(
            program,
            output.status.code().unwrap_or(-1),
            render_command(program, args),
            stderr,
        ));
    }

    Ok(CommandOutput { stdout, stderr })
}

/// Render a program and its arguments as a single shell-like line.
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_tool_misses_nonexistent() {
        assert!(find_tool("clipkit-no-such-tool-a7f3").is_none());
    }

    #[test]
    fn ensure_tool_reports_unavailable() {
        let result = ensure_tool("clipkit-no-such-tool-a7f3");
        assert!(matches!(result, Err(ClipError::ToolUnavailable { .. })));
    }

    #[test]
    fn render_command_joins_tokens() {
        let args = vec!["-y".to_string(), "-i".to_string(), "a.mp4".to_string()];
        assert_eq!(render_command("ffmpeg", &args), "ffmpeg -y -i a.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn run_command_embeds_failure_context() {
        let args = vec!["no-such-file-a7f3".to_string()];
        let err = run_command("ls", &args).unwrap_err();
        match err {
            ClipError::CommandFailed { tool, command, .. } => {
                assert_eq!(tool, "ls");
                assert!(command.contains("no-such-file-a7f3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
