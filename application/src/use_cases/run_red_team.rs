//! Red-team envelope
//!
//! Red-team mode delegates wholesale to the external attack-surface
//! pipeline. The engine validates the mode, translates the run budget into
//! the pipeline's depth parameter, and merges the returned envelope into
//! the standard report shape.

use crate::config::RunConfig;
use crate::ports::red_team::{RedTeamPipeline, RedTeamRequest};
use council_domain::{
    BudgetLedger, CouncilError, ExecutionInfo, FinalReport, RunMetrics, RunMode, RunPhase,
    RunState, RunStatus,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RunRedTeamUseCase {
    pipeline: Arc<dyn RedTeamPipeline>,
}

impl RunRedTeamUseCase {
    pub fn new(pipeline: Arc<dyn RedTeamPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn execute(&self, config: &RunConfig) -> Result<FinalReport, CouncilError> {
        config.validate()?;

        let mut state = RunState::new(RunMode::RedTeam, config.deadline);
        let mut ledger = BudgetLedger::new(config.budget_ceiling_cents);

        state.advance(RunPhase::RedTeam)?;

        let request = RedTeamRequest {
            document_ref: config.document_ref.clone(),
            depth: depth_for_budget(config.budget_ceiling_cents),
            budget_cents: config.budget_ceiling_cents,
            timeout_ms: config.deadline.as_millis() as u64,
        };
        info!(
            run_id = state.run_id(),
            depth = request.depth,
            "delegating to red-team pipeline"
        );

        let (status, note, payload) = match self.pipeline.run(&request).await {
            Ok(envelope) => {
                ledger.record(envelope.cost_cents, 0);
                (
                    RunStatus::Success,
                    None,
                    json!({ "red_team": envelope.findings }),
                )
            }
            Err(error) => {
                warn!(error = %error, "red-team pipeline failed");
                (
                    RunStatus::AllCallsFailed {
                        phase: "red_team".to_string(),
                    },
                    Some(error.to_string()),
                    json!({ "red_team": null }),
                )
            }
        };

        state.advance(RunPhase::Done)?;
        Ok(FinalReport {
            phase: config.doc_phase,
            document: config.document_ref.clone(),
            domain: "unknown".to_string(),
            execution: ExecutionInfo {
                mode: RunMode::RedTeam,
                reason: status.reason(),
                run_id: state.run_id().to_string(),
            },
            metrics: RunMetrics {
                latency_ms: state.elapsed().as_millis() as u64,
                cost_cents: ledger.total_cost_cents(),
                cost_usd: ledger.total_cost_usd(),
                total_tokens: ledger.total_tokens(),
            },
            status,
            note,
            payload,
        })
    }
}

/// Translate the run budget into the pipeline's attack depth: one level per
/// dollar, clamped to 1-5.
fn depth_for_budget(budget_cents: u64) -> u8 {
    (budget_cents / 100).clamp(1, 5) as u8
}
