//! Per-reviewer pricing
//!
//! Rates are configured in integer cents per megatoken so cost accumulation
//! stays exact. A reviewer without a pricing entry costs zero and the caller
//! is expected to warn about the unknown pricing source.

use crate::core::reviewer::ReviewerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token rates for one reviewer, in cents per million tokens
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReviewerPricing {
    pub input_cents_per_mtok: u64,
    pub output_cents_per_mtok: u64,
}

impl ReviewerPricing {
    pub fn new(input_cents_per_mtok: u64, output_cents_per_mtok: u64) -> Self {
        Self {
            input_cents_per_mtok,
            output_cents_per_mtok,
        }
    }

    /// Cost of a call in cents, rounded up so accumulated actuals never
    /// undercount against the ceiling.
    pub fn cost_cents(&self, tokens_in: u64, tokens_out: u64) -> u64 {
        let micro = tokens_in * self.input_cents_per_mtok + tokens_out * self.output_cents_per_mtok;
        micro.div_ceil(1_000_000)
    }
}

/// Pricing lookup for the configured roster
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    by_reviewer: HashMap<ReviewerId, ReviewerPricing>,
}

impl PricingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reviewer: ReviewerId, pricing: ReviewerPricing) {
        self.by_reviewer.insert(reviewer, pricing);
    }

    pub fn with_entry(mut self, reviewer: impl Into<ReviewerId>, pricing: ReviewerPricing) -> Self {
        self.by_reviewer.insert(reviewer.into(), pricing);
        self
    }

    /// Look up the rates for a reviewer. `None` means pricing is unknown and
    /// the call should be recorded at zero cost.
    pub fn get(&self, reviewer: &ReviewerId) -> Option<&ReviewerPricing> {
        self.by_reviewer.get(reviewer)
    }

    /// Cost of a call, or `None` when the reviewer has no pricing entry.
    pub fn cost_cents(&self, reviewer: &ReviewerId, tokens_in: u64, tokens_out: u64) -> Option<u64> {
        self.get(reviewer)
            .map(|p| p.cost_cents(tokens_in, tokens_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_rounds_up() {
        // 300 cents/mtok input, 600 cents/mtok output
        let pricing = ReviewerPricing::new(300, 600);

        // 1000 in + 500 out = 300_000 + 300_000 = 600_000 micro-cents -> 1 cent
        assert_eq!(pricing.cost_cents(1000, 500), 1);

        // Tiny usage still rounds up to a cent rather than vanishing
        assert_eq!(pricing.cost_cents(1, 0), 1);
        assert_eq!(pricing.cost_cents(0, 0), 0);
    }

    #[test]
    fn test_exact_megatoken() {
        let pricing = ReviewerPricing::new(250, 1000);
        assert_eq!(pricing.cost_cents(1_000_000, 1_000_000), 1250);
    }

    #[test]
    fn test_unknown_reviewer_has_no_cost() {
        let table = PricingTable::new()
            .with_entry("claude-sonnet-4.5", ReviewerPricing::new(300, 1500));

        assert!(table
            .cost_cents(&ReviewerId::new("claude-sonnet-4.5"), 1000, 1000)
            .is_some());
        assert!(table
            .cost_cents(&ReviewerId::new("unpriced-model"), 1000, 1000)
            .is_none());
    }
}
