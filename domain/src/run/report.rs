//! Final report envelope
//!
//! The single value handed to the reporting boundary when a run reaches
//! DONE or a terminal error: run metadata, spend metrics, the terminal
//! status, and the mode-specific payload (consensus summary, raw reviews,
//! inquiry synthesis, or the red-team envelope).

use crate::run::mode::{DocumentPhase, RunMode};
use crate::run::status::RunStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who ran and why it ended the way it did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionInfo {
    pub mode: RunMode,
    pub reason: String,
    pub run_id: String,
}

/// Spend and latency totals for the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub latency_ms: u64,
    pub cost_cents: u64,
    pub cost_usd: f64,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    /// Document phase under review (prd, sdd, ...)
    pub phase: DocumentPhase,
    pub document: String,
    /// Domain label from knowledge retrieval, or "unknown"
    pub domain: String,
    pub execution: ExecutionInfo,
    pub metrics: RunMetrics,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Mode-specific payload
    pub payload: Value,
}

impl FinalReport {
    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, RunStatus::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_serializes_expected_shape() {
        let report = FinalReport {
            phase: DocumentPhase::Prd,
            document: "docs/prd.md".to_string(),
            domain: "payments".to_string(),
            execution: ExecutionInfo {
                mode: RunMode::Review,
                reason: "completed".to_string(),
                run_id: "run-1a2b-3c".to_string(),
            },
            metrics: RunMetrics {
                latency_ms: 48_000,
                cost_cents: 92,
                cost_usd: 0.92,
                total_tokens: 210_000,
            },
            status: RunStatus::Success,
            note: None,
            payload: json!({"consensus": {"total": 5}}),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["phase"], "prd");
        assert_eq!(value["execution"]["mode"], "review");
        assert_eq!(value["execution"]["run_id"], "run-1a2b-3c");
        assert_eq!(value["metrics"]["cost_cents"], 92);
        assert_eq!(value["status"]["kind"], "success");
        assert!(value.get("note").is_none());
    }
}
