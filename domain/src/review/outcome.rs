//! Phase outcome and quorum accounting

use crate::review::result::ReviewResult;
use serde::{Deserialize, Serialize};

/// Joined results of one phase's scatter-gather.
///
/// Invariants:
/// - `success_count + failure_count` equals the number of jobs launched
/// - `quorum_met` holds exactly when `success_count >= required_minimum`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub phase_name: String,
    pub results: Vec<ReviewResult>,
    pub success_count: usize,
    pub failure_count: usize,
    pub required_minimum: usize,
    pub quorum_met: bool,
}

impl PhaseOutcome {
    /// Build an outcome from joined results and the phase's configured
    /// quorum minimum.
    pub fn from_results(
        phase_name: impl Into<String>,
        results: Vec<ReviewResult>,
        required_minimum: usize,
    ) -> Self {
        let success_count = results.iter().filter(|r| r.succeeded).count();
        let failure_count = results.len() - success_count;

        Self {
            phase_name: phase_name.into(),
            results,
            success_count,
            failure_count,
            required_minimum,
            quorum_met: success_count >= required_minimum,
        }
    }

    /// True when not a single call succeeded — a hard phase failure.
    pub fn is_total_failure(&self) -> bool {
        self.success_count == 0
    }

    /// True when the phase is usable but some calls failed.
    pub fn is_degraded(&self) -> bool {
        self.quorum_met && self.failure_count > 0
    }

    /// Iterate over the successful results only.
    pub fn successes(&self) -> impl Iterator<Item = &ReviewResult> {
        self.results.iter().filter(|r| r.succeeded)
    }

    /// Iterate over the failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &ReviewResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }

    /// Total actual cost of the phase, in cents.
    pub fn cost_cents(&self) -> u64 {
        self.results.iter().map(|r| r.cost_cents).sum()
    }
}
