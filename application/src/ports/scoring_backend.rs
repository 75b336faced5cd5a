//! Scoring backend port
//!
//! The consensus phase prepares score/skeptic artifacts and hands them to an
//! external scoring service for the numeric consensus summary. The detailed
//! scoring formula lives behind this port; the engine only merges its output
//! with the domain classification.

use async_trait::async_trait;
use council_domain::{CrossScore, ImprovementItem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Prepared artifacts for the scoring backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreArtifacts {
    pub items: Vec<ImprovementItem>,
    pub cross_scores: Vec<CrossScore>,
    pub skeptic_concerns: Vec<String>,
}

/// Numeric consensus summary returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSummary {
    /// Backend-specific summary payload, merged verbatim into the report
    pub payload: Value,
}

impl ScoringSummary {
    pub fn empty() -> Self {
        Self {
            payload: Value::Null,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("scoring backend unavailable: {0}")]
    Unavailable(String),

    #[error("scoring backend returned malformed output: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ScoringBackend: Send + Sync {
    async fn summarize(&self, artifacts: &ScoreArtifacts) -> Result<ScoringSummary, ScoringError>;
}

/// No-op scoring backend for tests and unconfigured deployments: the
/// consensus phase then reports classification only.
pub struct NoScoring;

#[async_trait]
impl ScoringBackend for NoScoring {
    async fn summarize(&self, _artifacts: &ScoreArtifacts) -> Result<ScoringSummary, ScoringError> {
        Ok(ScoringSummary::empty())
    }
}
