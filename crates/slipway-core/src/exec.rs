//! Subprocess invocation helpers for the external CLIs slipway wraps
//! (docker, kubectl, helm, aws, k8s-secretgen, pip, pytest, flake8).
//!
//! Every wrapped tool is located with `which` so a missing binary fails with a
//! clear error naming it, before anything is spawned. Failures carry the
//! tool's exit code so the CLI can propagate it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Result, SlipwayError};

/// Locate `tool` on PATH.
pub fn require(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| SlipwayError::ToolMissing(tool.to_string()))
}

/// Build a command for `tool`, failing early when it is not installed.
pub fn command(tool: &str, args: &[&str]) -> Result<Command> {
    let bin = require(tool)?;
    let mut cmd = Command::new(bin);
    cmd.args(args);
    Ok(cmd)
}

/// Run a command with stdout/stderr flowing to the terminal. Long-running
/// tools (docker build, helm --wait) stream their own progress this way.
pub fn run_streamed(cmd: &mut Command, tool: &str) -> Result<()> {
    let status = cmd
        .stdin(Stdio::null())
        .status()
        .map_err(|e| spawn_failed(tool, e))?;
    if !status.success() {
        return Err(SlipwayError::ToolFailed {
            tool: tool.to_string(),
            code: status.code(),
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Run a command capturing stdout; non-zero exit is an error carrying the
/// trimmed stderr.
pub fn run_capture(cmd: &mut Command, tool: &str) -> Result<String> {
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_failed(tool, e))?;
    if !output.status.success() {
        return Err(SlipwayError::ToolFailed {
            tool: tool.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command feeding `input` to its stdin (docker login --password-stdin,
/// psql restore). Stdout is discarded, stderr is captured for the error path.
pub fn run_with_stdin(cmd: &mut Command, tool: &str, input: &str) -> Result<()> {
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_failed(tool, e))?;
    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(input.as_bytes())?;
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().map_err(|e| spawn_failed(tool, e))?;
    if !output.status.success() {
        return Err(SlipwayError::ToolFailed {
            tool: tool.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Run a command where a non-zero exit is an answer, not an error — existence
/// probes like `kubectl get namespace`. Output is suppressed.
pub fn probe(cmd: &mut Command, tool: &str) -> Result<bool> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| spawn_failed(tool, e))?;
    Ok(status.success())
}

/// Run `tool` with `args` in `dir`, streaming output. Convenience for the
/// wrapper commands (lint, deps, test) that run a tool in the project root.
pub fn run_in(dir: &Path, tool: &str, args: &[&str]) -> Result<()> {
    let mut cmd = command(tool, args)?;
    cmd.current_dir(dir);
    run_streamed(&mut cmd, tool)
}

fn spawn_failed(tool: &str, e: std::io::Error) -> SlipwayError {
    SlipwayError::ToolFailed {
        tool: tool.to_string(),
        code: None,
        stderr: format!("failed to spawn: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_names_the_binary() {
        let err = require("definitely-not-a-real-tool-xyz").unwrap_err();
        assert!(matches!(err, SlipwayError::ToolMissing(ref t) if t.contains("xyz")));
    }

    // `true`/`false` are safe, universally present test subjects.
    #[test]
    fn probe_reports_exit_status() {
        assert!(probe(&mut command("true", &[]).unwrap(), "true").unwrap());
        assert!(!probe(&mut command("false", &[]).unwrap(), "false").unwrap());
    }

    #[test]
    fn run_capture_returns_stdout() {
        let out = run_capture(&mut command("echo", &["hello"]).unwrap(), "echo").unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn run_streamed_failure_carries_exit_code() {
        let err = run_streamed(&mut command("false", &[]).unwrap(), "false").unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }
}
