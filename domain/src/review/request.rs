//! Review request types

use crate::core::reviewer::ReviewerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode a reviewer is invoked in.
///
/// - `Review`: independent assessment producing improvement items
/// - `Skeptic`: risk/blocker pass, independent of the main review
/// - `Score`: cross-scoring of another reviewer's items
/// - `Dissent`: adversarial counter-position (used by the red-team pipeline)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    Review,
    Skeptic,
    Score,
    Dissent,
}

impl ReviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewMode::Review => "review",
            ReviewMode::Skeptic => "skeptic",
            ReviewMode::Score => "score",
            ReviewMode::Dissent => "dissent",
        }
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" => Ok(ReviewMode::Review),
            "skeptic" => Ok(ReviewMode::Skeptic),
            "score" => Ok(ReviewMode::Score),
            "dissent" => Ok(ReviewMode::Dissent),
            _ => Err(format!(
                "unknown review mode: {}. Valid: review, skeptic, score, dissent",
                s
            )),
        }
    }
}

/// A single bounded reviewer call.
///
/// Immutable once created; the invoker never mutates a request, it only
/// produces a [`ReviewResult`](super::result::ReviewResult) from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Reviewer to invoke
    pub reviewer: ReviewerId,
    /// Invocation mode
    pub mode: ReviewMode,
    /// Reference to the document under review (path or handle)
    pub document_ref: String,
    /// Optional reference to supplementary context (knowledge output,
    /// perspective key, or the items being cross-scored)
    pub context_ref: Option<String>,
    /// Hard per-call timeout including all I/O
    pub timeout_ms: u64,
}

impl ReviewRequest {
    pub fn new(
        reviewer: ReviewerId,
        mode: ReviewMode,
        document_ref: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            reviewer,
            mode,
            document_ref: document_ref.into(),
            context_ref: None,
            timeout_ms,
        }
    }

    pub fn with_context(mut self, context_ref: impl Into<String>) -> Self {
        self.context_ref = Some(context_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("review".parse::<ReviewMode>().ok(), Some(ReviewMode::Review));
        assert_eq!("SKEPTIC".parse::<ReviewMode>().ok(), Some(ReviewMode::Skeptic));
        assert_eq!("score".parse::<ReviewMode>().ok(), Some(ReviewMode::Score));
        assert_eq!("dissent".parse::<ReviewMode>().ok(), Some(ReviewMode::Dissent));
        assert!("audit".parse::<ReviewMode>().is_err());
    }

    #[test]
    fn test_request_builder() {
        let request = ReviewRequest::new(
            ReviewerId::new("claude-sonnet-4.5"),
            ReviewMode::Review,
            "docs/prd.md",
            120_000,
        )
        .with_context("knowledge:auth-domain");

        assert_eq!(request.mode, ReviewMode::Review);
        assert_eq!(request.timeout_ms, 120_000);
        assert_eq!(request.context_ref.as_deref(), Some("knowledge:auth-domain"));
    }
}
