//! Cross-score aggregation and classification
//!
//! Pure domain logic: no I/O. Given the items, the triangular cross-scores,
//! and the skeptic concerns, every item is classified deterministically —
//! identical inputs always yield identical classifications. The detailed
//! numeric scoring formula lives in the external scoring backend; this module
//! owns only the classification contract.

use super::item::{Classification, ConsensusItem, ImprovementItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cross-score: `scorer` rated `item_description` (authored by another
/// reviewer) on a 1-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossScore {
    pub scorer: String,
    pub item_description: String,
    pub score: f64,
}

impl CrossScore {
    pub fn new(scorer: impl Into<String>, item_description: impl Into<String>, score: f64) -> Self {
        Self {
            scorer: scorer.into(),
            item_description: item_description.into(),
            score,
        }
    }
}

/// Summary counts over a classified item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    pub total: usize,
    pub high_consensus: usize,
    pub disputed: usize,
    pub low_value: usize,
    pub blockers: usize,
    /// Share of items every other reviewer endorsed, 0-100.
    pub percent_agreement: f64,
}

/// Classify each item from the cross-scores of the *other* reviewers and the
/// skeptic flags, then rank the list (blockers first, classification rank,
/// stable within a class).
///
/// Rules, in order:
/// - flagged by any skeptic pass → `Blocker`, regardless of score
/// - no cross-score from any other reviewer → `Disputed`
/// - every other reviewer scored at/above `acceptance_threshold` → `HighConsensus`
/// - a strict majority scored below the threshold → `LowValue`
/// - splits and exact ties → `Disputed`
pub fn classify_items(
    items: &[ImprovementItem],
    scores: &[CrossScore],
    skeptic_concerns: &[String],
    acceptance_threshold: f64,
) -> Vec<ConsensusItem> {
    let mut classified: Vec<ConsensusItem> = items
        .iter()
        .map(|item| classify_one(item, scores, skeptic_concerns, acceptance_threshold))
        .collect();

    // Stable sort keeps source order within a classification
    classified.sort_by_key(|item| item.classification.rank());
    classified
}

fn classify_one(
    item: &ImprovementItem,
    scores: &[CrossScore],
    skeptic_concerns: &[String],
    acceptance_threshold: f64,
) -> ConsensusItem {
    // Scores from reviewers other than the item's author, deterministic order
    let mut scores_by_reviewer: BTreeMap<String, f64> = BTreeMap::new();
    for score in scores {
        if score.scorer != item.source_reviewer.as_str()
            && descriptions_match(&score.item_description, &item.description)
        {
            scores_by_reviewer.insert(score.scorer.clone(), score.score);
        }
    }

    let skeptic_flagged = skeptic_concerns
        .iter()
        .any(|concern| descriptions_match(concern, &item.description));

    let classification = if skeptic_flagged {
        Classification::Blocker
    } else if scores_by_reviewer.is_empty() {
        Classification::Disputed
    } else {
        let total = scores_by_reviewer.len();
        let unfavorable = scores_by_reviewer
            .values()
            .filter(|s| **s < acceptance_threshold)
            .count();

        if unfavorable == 0 {
            Classification::HighConsensus
        } else if unfavorable * 2 > total {
            Classification::LowValue
        } else {
            Classification::Disputed
        }
    };

    ConsensusItem {
        source_reviewer: item.source_reviewer.clone(),
        description: item.description.clone(),
        scores_by_reviewer,
        skeptic_flagged,
        classification,
    }
}

/// Match a score or concern back to an item description.
///
/// Reviewer output quotes descriptions imperfectly, so containment in either
/// direction counts, case-insensitive.
fn descriptions_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a == b || a.contains(&b) || b.contains(&a))
}

/// Compute the summary counts for a classified list.
pub fn summarize(items: &[ConsensusItem]) -> ConsensusSummary {
    let total = items.len();
    let count = |c: Classification| items.iter().filter(|i| i.classification == c).count();

    let high_consensus = count(Classification::HighConsensus);
    let percent_agreement = if total == 0 {
        0.0
    } else {
        high_consensus as f64 * 100.0 / total as f64
    };

    ConsensusSummary {
        total,
        high_consensus,
        disputed: count(Classification::Disputed),
        low_value: count(Classification::LowValue),
        blockers: count(Classification::Blocker),
        percent_agreement,
    }
}
