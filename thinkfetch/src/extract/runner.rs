//! Timed execution of external extraction tools.
//!
//! Every invocation gets a deadline. A tool that runs past it is killed
//! and reported as [`ToolOutcome::TimedOut`] rather than hanging the
//! whole pipeline.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use super::error::ExtractError;

/// How often the runner polls a child process for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one tool invocation.
#[derive(Debug)]
pub enum ToolOutcome {
    /// Exit status 0.
    Success,
    /// Non-zero exit; carries the code (if any) and captured stderr.
    Failed { code: Option<i32>, stderr: String },
    /// Killed after exceeding the deadline.
    TimedOut,
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success)
    }
}

/// Run `command` to completion or until `timeout` elapses.
///
/// stdout is discarded; stderr is captured on a helper thread so the
/// child never blocks on a full pipe.
pub fn run_with_timeout(
    mut command: Command,
    tool_name: &str,
    timeout: Duration,
) -> Result<ToolOutcome, ExtractError> {
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::piped());

    debug!(tool = tool_name, ?timeout, "running extraction tool");

    let mut child = command.spawn().map_err(|e| ExtractError::ToolMissing {
        tool: tool_name.to_string(),
        hint: e.to_string(),
    })?;

    let stderr_handle = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf).ok();
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    debug!(tool = tool_name, "tool killed after deadline");
                    return Ok(ToolOutcome::TimedOut);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                child.kill().ok();
                return Err(ExtractError::Io {
                    path: std::path::PathBuf::new(),
                    source: e,
                });
            }
        }
    };

    if status.success() {
        Ok(ToolOutcome::Success)
    } else {
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        Ok(ToolOutcome::Failed {
            code: status.code(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        let mut cmd = Command::new("true");
        cmd.arg("");
        let outcome = run_with_timeout(cmd, "true", Duration::from_secs(5)).unwrap();
        assert!(outcome.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_command_reports_code() {
        let cmd = Command::new("false");
        let outcome = run_with_timeout(cmd, "false", Duration::from_secs(5)).unwrap();
        match outcome {
            ToolOutcome::Failed { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = Instant::now();
        let outcome = run_with_timeout(cmd, "sleep", Duration::from_millis(300)).unwrap();
        assert!(matches!(outcome, ToolOutcome::TimedOut));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_tool_is_an_error() {
        let cmd = Command::new("definitely-not-a-real-binary-xyz");
        let result = run_with_timeout(cmd, "definitely-not-a-real-binary-xyz", Duration::from_secs(1));
        assert!(matches!(result, Err(ExtractError::ToolMissing { .. })));
    }
}
