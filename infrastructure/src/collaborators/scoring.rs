//! Scoring backend adapter
//!
//! Hands the prepared score/skeptic artifacts to the external scoring
//! command and returns its summary verbatim. The numeric consensus formula
//! lives entirely on the other side of this boundary.

use crate::config::file_config::CommandSpec;
use crate::process::{self, ProcessError};
use async_trait::async_trait;
use council_application::{ScoreArtifacts, ScoringBackend, ScoringError, ScoringSummary};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct CommandScoringBackend {
    spec: CommandSpec,
    timeout: Duration,
}

impl CommandScoringBackend {
    pub fn new(spec: CommandSpec, timeout: Duration) -> Self {
        Self { spec, timeout }
    }
}

#[async_trait]
impl ScoringBackend for CommandScoringBackend {
    async fn summarize(&self, artifacts: &ScoreArtifacts) -> Result<ScoringSummary, ScoringError> {
        let body = serde_json::to_string(artifacts)
            .map_err(|e| ScoringError::Unavailable(e.to_string()))?;

        let stdout = process::run(&self.spec, &[], Some(&body), self.timeout)
            .await
            .map_err(|error| match error {
                ProcessError::Failed { .. } => ScoringError::Malformed(error.to_string()),
                _ => ScoringError::Unavailable(error.to_string()),
            })?;

        let payload: Value = serde_json::from_str(&stdout)
            .map_err(|e| ScoringError::Malformed(format!("summary is not valid JSON: {e}")))?;

        debug!(items = artifacts.items.len(), "scoring backend summarized");
        Ok(ScoringSummary { payload })
    }
}
