//! Domain error taxonomy
//!
//! Run-level failures only. Per-call provider failures are not errors at this
//! level: they are recorded as [`CallErrorKind`](crate::review::result::CallErrorKind)
//! on the individual [`ReviewResult`](crate::review::result::ReviewResult) and
//! contribute to quorum accounting instead of escalating.

use thiserror::Error;

/// Run-level errors for a council run
#[derive(Error, Debug)]
pub enum CouncilError {
    /// Invalid mode, phase, reviewer id, or roster. Always raised before any
    /// reviewer call is dispatched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Fewer than the required number of calls succeeded in a phase.
    #[error(
        "quorum failed in {phase}: {successes} of {launched} calls succeeded (minimum {required})"
    )]
    QuorumFailure {
        phase: String,
        successes: usize,
        launched: usize,
        required: usize,
    },

    /// The ledger denied admission for a phase.
    #[error("budget exceeded: {spent_cents} of {ceiling_cents} cents already spent")]
    BudgetExceeded {
        spent_cents: u64,
        ceiling_cents: u64,
    },

    /// The cumulative wall-clock deadline elapsed at a phase boundary.
    #[error("deadline exceeded after {elapsed_ms}ms (limit {limit_ms}ms)")]
    DeadlineExceeded { elapsed_ms: u64, limit_ms: u64 },

    /// Internal sequencing violation (e.g. a backward phase transition).
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

impl CouncilError {
    /// Check if this error was raised before any budget was spent
    pub fn is_pre_spend(&self) -> bool {
        matches!(self, CouncilError::Configuration(_))
    }
}
