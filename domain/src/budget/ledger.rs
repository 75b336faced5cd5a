//! Budget ledger
//!
//! Single-owner mutable spend counter for one run. `admit` is checked before
//! a phase launches; `record` is called once per result at the phase join,
//! never from concurrent call handlers. Accumulation is integer cents,
//! exact, and monotonic non-decreasing for the run's lifetime.

use serde::{Deserialize, Serialize};

/// Outcome of a pre-phase admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The estimated cost fits under the ceiling
    Allow,
    /// Launching would exceed the ceiling; the dependent phase must be skipped
    Deny,
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow)
    }
}

/// Cumulative cost/token state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLedger {
    total_cost_cents: u64,
    total_tokens: u64,
    ceiling_cents: u64,
}

impl BudgetLedger {
    pub fn new(ceiling_cents: u64) -> Self {
        Self {
            total_cost_cents: 0,
            total_tokens: 0,
            ceiling_cents,
        }
    }

    /// Check whether a phase with the given estimated cost may launch.
    ///
    /// Does not reserve anything: actuals are recorded at the join.
    pub fn admit(&self, estimated_cost_cents: u64) -> Admission {
        if self.total_cost_cents + estimated_cost_cents <= self.ceiling_cents {
            Admission::Allow
        } else {
            Admission::Deny
        }
    }

    /// Record the actual cost and token usage of one completed call.
    pub fn record(&mut self, cost_cents: u64, tokens: u64) {
        self.total_cost_cents += cost_cents;
        self.total_tokens += tokens;
    }

    pub fn total_cost_cents(&self) -> u64 {
        self.total_cost_cents
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn ceiling_cents(&self) -> u64 {
        self.ceiling_cents
    }

    pub fn remaining_cents(&self) -> u64 {
        self.ceiling_cents.saturating_sub(self.total_cost_cents)
    }

    /// Total spend in dollars, for the report's `costUsd` field.
    pub fn total_cost_usd(&self) -> f64 {
        self.total_cost_cents as f64 / 100.0
    }
}
