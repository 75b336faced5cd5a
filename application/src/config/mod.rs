//! Run configuration
//!
//! [`RunConfig`] groups the static parameters that control one run: the
//! roster, budgets, timeouts, stagger, per-phase quorum minimums, and skip
//! flags. Validated before any reviewer call is dispatched.

use council_domain::{CouncilError, DocumentPhase, PricingTable, ReviewerId, RunMode};
use std::time::Duration;

/// Explicit per-phase quorum minimums.
///
/// The minimum is configuration, never inferred from call counts at runtime:
/// a phase is usable when `success_count >= minimum`, zero successes is a
/// hard phase failure regardless of the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumThresholds {
    /// Independent review phase ("some succeeded" for a pair, 2-of-3 when
    /// the tertiary reviewer is enabled)
    pub phase1: usize,
    /// Cross-scoring + skeptic phase (counts both waves' jobs)
    pub phase2: usize,
    /// Inquiry perspectives (2-of-3)
    pub inquiry: usize,
}

impl QuorumThresholds {
    /// Default minimums for a roster of `n` reviewers.
    pub fn for_roster(n: usize) -> Self {
        Self {
            phase1: n.saturating_sub(1).max(1),
            phase2: n.max(1),
            inquiry: 2,
        }
    }
}

/// Static parameters for one council run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: RunMode,
    pub document_ref: String,
    pub doc_phase: DocumentPhase,
    pub reviewers: Vec<ReviewerId>,
    /// Cumulative wall-clock deadline spanning all phases
    pub deadline: Duration,
    /// Hard per-call timeout including all I/O
    pub call_timeout: Duration,
    pub budget_ceiling_cents: u64,
    /// Pre-phase admission estimate per call
    pub estimated_call_cost_cents: u64,
    /// Delay between wave launches; zero disables waves
    pub stagger: Duration,
    pub quorum: QuorumThresholds,
    /// Cross-score acceptance threshold on the 1-10 scale
    pub acceptance_threshold: f64,
    pub skip_knowledge: bool,
    pub skip_consensus: bool,
    /// Allow one whole-phase re-run after a zero-quorum phase
    pub retry_failed_phase: bool,
    pub pricing: PricingTable,
}

impl RunConfig {
    pub fn new(
        mode: RunMode,
        document_ref: impl Into<String>,
        doc_phase: DocumentPhase,
        reviewers: Vec<ReviewerId>,
    ) -> Self {
        let quorum = QuorumThresholds::for_roster(reviewers.len());
        Self {
            mode,
            document_ref: document_ref.into(),
            doc_phase,
            reviewers,
            deadline: Duration::from_secs(600),
            call_timeout: Duration::from_secs(120),
            budget_ceiling_cents: 500,
            estimated_call_cost_cents: 25,
            stagger: Duration::ZERO,
            quorum,
            acceptance_threshold: 6.0,
            skip_knowledge: false,
            skip_consensus: false,
            retry_failed_phase: false,
            pricing: PricingTable::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_budget_ceiling_cents(mut self, ceiling: u64) -> Self {
        self.budget_ceiling_cents = ceiling;
        self
    }

    pub fn with_estimated_call_cost_cents(mut self, estimate: u64) -> Self {
        self.estimated_call_cost_cents = estimate;
        self
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_quorum(mut self, quorum: QuorumThresholds) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_skip_knowledge(mut self, skip: bool) -> Self {
        self.skip_knowledge = skip;
        self
    }

    pub fn with_skip_consensus(mut self, skip: bool) -> Self {
        self.skip_consensus = skip;
        self
    }

    pub fn with_retry_failed_phase(mut self, retry: bool) -> Self {
        self.retry_failed_phase = retry;
        self
    }

    // ==================== Validation ====================

    /// Validate the configuration. Always runs before any dispatch so an
    /// invalid config fails with zero spend.
    pub fn validate(&self) -> Result<(), CouncilError> {
        if self.reviewers.is_empty() {
            return Err(CouncilError::Configuration(
                "no reviewers configured".to_string(),
            ));
        }
        if self.document_ref.trim().is_empty() {
            return Err(CouncilError::Configuration(
                "document reference is empty".to_string(),
            ));
        }
        if self.budget_ceiling_cents == 0 {
            return Err(CouncilError::Configuration(
                "budget ceiling must be positive".to_string(),
            ));
        }
        if self.quorum.phase1 > self.reviewers.len() {
            return Err(CouncilError::Configuration(format!(
                "phase1 quorum minimum {} exceeds roster size {}",
                self.quorum.phase1,
                self.reviewers.len()
            )));
        }
        if self.quorum.phase2 > self.reviewers.len() * 2 {
            return Err(CouncilError::Configuration(format!(
                "phase2 quorum minimum {} exceeds job count {}",
                self.quorum.phase2,
                self.reviewers.len() * 2
            )));
        }
        if !(1.0..=10.0).contains(&self.acceptance_threshold) {
            return Err(CouncilError::Configuration(format!(
                "acceptance threshold {} outside 1-10",
                self.acceptance_threshold
            )));
        }
        Ok(())
    }

    /// Whether the tertiary reviewer slot is in play.
    pub fn tertiary_enabled(&self) -> bool {
        self.reviewers.len() >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<ReviewerId> {
        (0..n).map(|i| ReviewerId::new(format!("reviewer-{}", i))).collect()
    }

    #[test]
    fn test_default_quorum_for_pair_and_triple() {
        let pair = QuorumThresholds::for_roster(2);
        assert_eq!(pair.phase1, 1);
        assert_eq!(pair.phase2, 2);

        let triple = QuorumThresholds::for_roster(3);
        assert_eq!(triple.phase1, 2);
        assert_eq!(triple.phase2, 3);
        assert_eq!(triple.inquiry, 2);
    }

    #[test]
    fn test_validate_empty_roster() {
        let config = RunConfig::new(RunMode::Review, "doc.md", DocumentPhase::Prd, vec![]);
        assert!(matches!(
            config.validate(),
            Err(CouncilError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_quorum_exceeds_roster() {
        let config = RunConfig::new(RunMode::Review, "doc.md", DocumentPhase::Prd, roster(2))
            .with_quorum(QuorumThresholds {
                phase1: 3,
                phase2: 2,
                inquiry: 2,
            });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let config = RunConfig::new(RunMode::Review, "doc.md", DocumentPhase::Sdd, roster(3));
        assert!(config.validate().is_ok());
        assert!(config.tertiary_enabled());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new(RunMode::Inquiry, "doc.md", DocumentPhase::Sprint, roster(2))
            .with_deadline(Duration::from_secs(60))
            .with_budget_ceiling_cents(100)
            .with_skip_knowledge(true);

        assert_eq!(config.deadline, Duration::from_secs(60));
        assert_eq!(config.budget_ceiling_cents, 100);
        assert!(config.skip_knowledge);
        assert!(!config.tertiary_enabled());
    }
}
