//! Final run status
//!
//! Distinguishes the terminal classifications a run can end with:
//! clean success, degraded partial success, non-fatal knowledge failure, and
//! the three hard failures (all calls failed, deadline, budget). Each maps
//! to the process exit code the CLI reports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    /// Every phase completed with full quorum
    Success,
    /// The run completed with partial data: sub-total call success or a
    /// budget-driven phase skip
    Degraded { note: String },
    /// Knowledge retrieval failed; the run itself completed
    KnowledgeFailed { note: String },
    /// A phase returned zero successful calls
    AllCallsFailed { phase: String },
    /// The cumulative wall-clock deadline elapsed
    DeadlineExceeded,
    /// The ledger denied admission before any usable output existed
    BudgetExceeded,
}

impl RunStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::KnowledgeFailed { .. } => 2,
            RunStatus::AllCallsFailed { .. } => 3,
            RunStatus::DeadlineExceeded => 4,
            RunStatus::BudgetExceeded => 5,
            RunStatus::Degraded { .. } => 6,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }

    /// Short reason string for the report's execution envelope.
    pub fn reason(&self) -> String {
        match self {
            RunStatus::Success => "completed".to_string(),
            RunStatus::Degraded { note } => format!("degraded: {}", note),
            RunStatus::KnowledgeFailed { note } => format!("knowledge_failed: {}", note),
            RunStatus::AllCallsFailed { phase } => format!("all_calls_failed: {}", phase),
            RunStatus::DeadlineExceeded => "deadline_exceeded".to_string(),
            RunStatus::BudgetExceeded => "budget_exceeded".to_string(),
        }
    }
}
