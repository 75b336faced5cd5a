//! Direct reviewer call path
//!
//! Speaks the structured protocol: the call descriptor goes to the reviewer
//! command as one JSON object on stdin, the reply comes back as one JSON
//! object on stdout carrying content, real token usage, and latency.

use crate::config::file_config::CommandSpec;
use crate::process::{self, ProcessError};
use crate::reviewers::routing::CommandRoster;
use async_trait::async_trait;
use council_application::{BackendCall, BackendError, BackendReply, BackendUsage, ReviewerBackend};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    reviewer: &'a str,
    mode: &'a str,
    input_ref: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_context_ref: Option<&'a str>,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    content: String,
    #[serde(default)]
    usage: Option<WireUsage>,
    #[serde(default)]
    latency_ms: Option<u64>,
}

pub struct DirectProcessBackend {
    roster: CommandRoster,
}

impl DirectProcessBackend {
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
impl ReviewerBackend for DirectProcessBackend {
    async fn complete(&self, call: &BackendCall) -> Result<BackendReply, BackendError> {
        let spec = self.spec_for(call)?;

        let request = WireRequest {
            reviewer: call.reviewer.as_str(),
            mode: call.mode.as_str(),
            input_ref: &call.input_ref,
            system_context_ref: call.system_context_ref.as_deref(),
            timeout_ms: call.timeout_ms,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let started = Instant::now();
        let stdout = process::run(
            spec,
            &[],
            Some(&body),
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
        let wall_ms = started.elapsed().as_millis() as u64;

        let reply: WireReply = serde_json::from_str(&stdout)
            .map_err(|e| BackendError::Malformed(format!("reply is not valid JSON: {e}")))?;

        let usage = reply.usage.map_or(
            BackendUsage {
                input_tokens: 0,
                output_tokens: 0,
                estimated: true,
            },
            |u| BackendUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
                estimated: false,
            },
        );

        debug!(
            reviewer = %call.reviewer,
            mode = %call.mode,
            wall_ms,
            "direct reviewer call completed"
        );

        Ok(BackendReply {
            content: reply.content,
            usage,
            latency_ms: reply.latency_ms.unwrap_or(wall_ms),
        })
    }
}
