//! Red-team pipeline port
//!
//! Red-team mode delegates wholesale to an external attack-surface pipeline
//! with its own depth/budget parameters. The engine performs mode
//! validation, budget translation, and result envelope merging only.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Delegated red-team run
#[derive(Debug, Clone)]
pub struct RedTeamRequest {
    pub document_ref: String,
    /// Attack depth derived from the run budget
    pub depth: u8,
    pub budget_cents: u64,
    pub timeout_ms: u64,
}

/// Result envelope from the pipeline
#[derive(Debug, Clone)]
pub struct RedTeamEnvelope {
    pub findings: Value,
    pub cost_cents: u64,
    pub latency_ms: u64,
}

#[derive(Error, Debug)]
pub enum RedTeamError {
    #[error("red-team pipeline failed: {0}")]
    Pipeline(String),
}

#[async_trait]
pub trait RedTeamPipeline: Send + Sync {
    async fn run(&self, request: &RedTeamRequest) -> Result<RedTeamEnvelope, RedTeamError>;
}
