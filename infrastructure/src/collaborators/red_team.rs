//! Red-team pipeline adapter
//!
//! Red-team mode delegates wholesale to an external attack-surface command
//! with its own depth/budget parameters. An unconfigured pipeline is a
//! valid state for the other modes; invoking it is an error.

use crate::config::file_config::CommandSpec;
use crate::process;
use async_trait::async_trait;
use council_application::{RedTeamEnvelope, RedTeamError, RedTeamPipeline, RedTeamRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    findings: Value,
    #[serde(default)]
    cost_cents: u64,
    #[serde(default)]
    latency_ms: Option<u64>,
}

pub struct CommandRedTeamPipeline {
    spec: Option<CommandSpec>,
}

impl CommandRedTeamPipeline {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec: Some(spec) }
    }

    /// Placeholder for deployments without a red-team collaborator; every
    /// invocation fails with a pipeline error.
    pub fn unconfigured() -> Self {
        Self { spec: None }
    }

    pub fn is_configured(&self) -> bool {
        self.spec.is_some()
    }
}

#[async_trait]
impl RedTeamPipeline for CommandRedTeamPipeline {
    async fn run(&self, request: &RedTeamRequest) -> Result<RedTeamEnvelope, RedTeamError> {
        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| RedTeamError::Pipeline("no red-team command configured".to_string()))?;

        let body = json!({
            "document": request.document_ref,
            "depth": request.depth,
            "budget_cents": request.budget_cents,
            "timeout_ms": request.timeout_ms,
        })
        .to_string();

        let started = Instant::now();
        let stdout = process::run(
            spec,
            &[],
            Some(&body),
            Duration::from_millis(request.timeout_ms),
        )
        .await
        .map_err(|e| RedTeamError::Pipeline(e.to_string()))?;
        let wall_ms = started.elapsed().as_millis() as u64;

        let wire: WireEnvelope = serde_json::from_str(&stdout)
            .map_err(|e| RedTeamError::Pipeline(format!("envelope is not valid JSON: {e}")))?;

        debug!(cost_cents = wire.cost_cents, "red-team pipeline completed");
        Ok(RedTeamEnvelope {
            findings: wire.findings,
            cost_cents: wire.cost_cents,
            latency_ms: wire.latency_ms.unwrap_or(wall_ms),
        })
    }
}
