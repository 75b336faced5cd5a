//! Bounded subprocess execution shared by the command adapters
//!
//! Every external collaborator is a command: feed it a body on stdin, wait
//! for it under a deadline, collect stdout. The child is killed if the
//! deadline passes or the future is dropped; no orphaned reviewers.

use crate::config::file_config::CommandSpec;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Error, Debug)]
pub(crate) enum ProcessError {
    #[error("could not spawn '{program}': {detail}")]
    Spawn { program: String, detail: String },

    #[error("'{program}' produced no output within {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("'{program}' exited with status {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("i/o error talking to '{program}': {detail}")]
    Io { program: String, detail: String },
}

/// Run a command to completion under `timeout`, writing `stdin_body` (if
/// any) to its stdin first. Returns trimmed stdout on a zero exit status.
pub(crate) async fn run(
    spec: &CommandSpec,
    extra_args: &[String],
    stdin_body: Option<&str>,
    timeout: Duration,
) -> Result<String, ProcessError> {
    let program = spec.program.clone();

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .args(extra_args)
        .stdin(if stdin_body.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|e| ProcessError::Spawn {
        program: program.clone(),
        detail: e.to_string(),
    })?;

    if let Some(body) = stdin_body {
        // Take stdin so it closes once written; the child sees EOF
        let mut stdin = child.stdin.take().ok_or_else(|| ProcessError::Io {
            program: program.clone(),
            detail: "stdin unavailable".to_string(),
        })?;
        stdin
            .write_all(body.as_bytes())
            .await
            .map_err(|e| ProcessError::Io {
                program: program.clone(),
                detail: e.to_string(),
            })?;
        drop(stdin);
    }

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| ProcessError::Timeout {
            program: program.clone(),
            timeout_ms: timeout.as_millis() as u64,
        })?
        .map_err(|e| ProcessError::Io {
            program: program.clone(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProcessError::Failed {
            program,
            code: output.status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn test_stdout_returned_on_success() {
        let out = run(&sh("echo hello"), &[], None, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_stdin_reaches_child() {
        let out = run(&sh("cat"), &[], Some("fed via stdin"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "fed via stdin");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let error = run(
            &sh("echo broken >&2; exit 3"),
            &[],
            None,
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        match error {
            ProcessError::Failed { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let error = run(&sh("sleep 30"), &[], None, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(error, ProcessError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let spec = CommandSpec::new("definitely-not-a-real-binary-xyz");
        let error = run(&spec, &[], None, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(error, ProcessError::Spawn { .. }));
    }
}
