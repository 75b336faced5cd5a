//! Legacy reviewer call path
//!
//! Adapter for reviewer commands that predate the structured protocol: the
//! mode and document reference are passed as argv, the entire stdout is the
//! content, and token usage cannot be reported so it is estimated from the
//! output size and flagged as such.

use crate::config::file_config::CommandSpec;
use crate::process::{self, ProcessError};
use crate::reviewers::routing::CommandRoster;
use async_trait::async_trait;
use council_application::{BackendCall, BackendError, BackendReply, BackendUsage, ReviewerBackend};
use std::time::{Duration, Instant};
use tracing::debug;

/// Rough chars-per-token divisor for the usage estimate
const CHARS_PER_TOKEN: u64 = 4;

pub struct LegacyCliBackend {
    roster: CommandRoster,
}

impl LegacyCliBackend {
    pub fn new(roster: CommandRoster) -> Self {
        Self { roster }
    }

    fn spec_for(&self, call: &BackendCall) -> Result<&CommandSpec, BackendError> {
        self.roster
            .resolve(&call.reviewer)
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ReviewerBackend for LegacyCliBackend {
    async fn complete(&self, call: &BackendCall) -> Result<BackendReply, BackendError> {
        let spec = self.spec_for(call)?;

        let mut extra_args = vec![
            "--mode".to_string(),
            call.mode.as_str().to_string(),
            call.input_ref.clone(),
        ];
        if let Some(context_ref) = &call.system_context_ref {
            extra_args.push("--context".to_string());
            extra_args.push(context_ref.clone());
        }

        let started = Instant::now();
        let stdout = process::run(
            spec,
            &extra_args,
            None,
            Duration::from_millis(call.timeout_ms),
        )
        .await
        .map_err(|error| match error {
            ProcessError::Timeout { .. } => BackendError::Timeout,
            ProcessError::Spawn { .. } => BackendError::Unavailable(error.to_string()),
            ProcessError::Failed { .. } | ProcessError::Io { .. } => {
                BackendError::Transport(error.to_string())
            }
        })?;
        let latency_ms = started.elapsed().as_millis() as u64;

        if stdout.is_empty() {
            return Err(BackendError::Malformed("empty reply".to_string()));
        }

        debug!(
            reviewer = %call.reviewer,
            mode = %call.mode,
            latency_ms,
            "legacy reviewer call completed"
        );

        // The legacy path cannot report counts; approximate from sizes so
        // the ledger still moves, and mark the usage estimated.
        let usage = BackendUsage {
            input_tokens: call.input_ref.len() as u64 / CHARS_PER_TOKEN,
            output_tokens: stdout.len() as u64 / CHARS_PER_TOKEN,
            estimated: true,
        };

        Ok(BackendReply {
            content: stdout,
            usage,
            latency_ms,
        })
    }
}
