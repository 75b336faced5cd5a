//! Consensus item types

use crate::core::reviewer::ReviewerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Classification of an improvement item after merging cross-scores and
/// skeptic flags.
///
/// Skeptic flags override score-based classification: a flagged item is a
/// `Blocker` regardless of how favorably it was scored. Ties resolve to
/// `Disputed`, never silently upgraded to consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    HighConsensus,
    Disputed,
    LowValue,
    Blocker,
}

impl Classification {
    /// Rank for report ordering: blockers first, then settled consensus,
    /// then the contested tail.
    pub fn rank(&self) -> u8 {
        match self {
            Classification::Blocker => 0,
            Classification::HighConsensus => 1,
            Classification::Disputed => 2,
            Classification::LowValue => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::HighConsensus => "high_consensus",
            Classification::Disputed => "disputed",
            Classification::LowValue => "low_value",
            Classification::Blocker => "blocker",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An improvement item proposed by one reviewer during its independent pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementItem {
    pub source_reviewer: ReviewerId,
    pub description: String,
}

impl ImprovementItem {
    pub fn new(source_reviewer: impl Into<ReviewerId>, description: impl Into<String>) -> Self {
        Self {
            source_reviewer: source_reviewer.into(),
            description: description.into(),
        }
    }
}

/// A classified improvement item. Computed once during the consensus phase,
/// then immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusItem {
    pub source_reviewer: ReviewerId,
    pub description: String,
    /// Scores the other reviewers assigned, keyed by reviewer id.
    /// BTreeMap keeps serialization and classification deterministic.
    pub scores_by_reviewer: BTreeMap<String, f64>,
    pub skeptic_flagged: bool,
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        assert!(Classification::Blocker.rank() < Classification::HighConsensus.rank());
        assert!(Classification::HighConsensus.rank() < Classification::Disputed.rank());
        assert!(Classification::Disputed.rank() < Classification::LowValue.rank());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Classification::HighConsensus).unwrap();
        assert_eq!(json, "\"high_consensus\"");
    }
}
