//! Inquiry pipeline
//!
//! Three parallel perspective queries — structural, historical, governance —
//! synthesized without cross-scoring. Only 2-of-3 successes are required; a
//! missing perspective contributes an empty findings array tagged raw, never
//! fabricated content.

use crate::config::RunConfig;
use crate::ports::capture::CaptureStore;
use crate::ports::progress::ProgressNotifier;
use crate::ports::reviewer_backend::ReviewerBackend;
use crate::use_cases::invoke::ReviewerInvoker;
use crate::use_cases::scatter::{PhaseSpec, ScatterGatherExecutor, ScatterJob};
use council_domain::{
    normalize, BudgetLedger, CouncilError, ExecutionInfo, FinalReport, ReviewMode, RunMetrics,
    RunMode, RunPhase, RunState, RunStatus, ShapeHint,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// The three inquiry perspectives, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Structural,
    Historical,
    Governance,
}

impl Perspective {
    pub const ALL: [Perspective; 3] = [
        Perspective::Structural,
        Perspective::Historical,
        Perspective::Governance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Structural => "structural",
            Perspective::Historical => "historical",
            Perspective::Governance => "governance",
        }
    }
}

pub struct RunInquiryUseCase {
    backend: Arc<dyn ReviewerBackend>,
    capture: Arc<dyn CaptureStore>,
}

impl RunInquiryUseCase {
    pub fn new(backend: Arc<dyn ReviewerBackend>, capture: Arc<dyn CaptureStore>) -> Self {
        Self { backend, capture }
    }

    pub async fn execute(
        &self,
        config: &RunConfig,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalReport, CouncilError> {
        config.validate()?;

        let mut state = RunState::new(RunMode::Inquiry, config.deadline);
        let mut ledger = BudgetLedger::new(config.budget_ceiling_cents);
        let executor = ScatterGatherExecutor::new(ReviewerInvoker::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.capture),
            config.pricing.clone(),
        ));

        info!(run_id = state.run_id(), "starting inquiry run");

        let estimate = Perspective::ALL.len() as u64 * config.estimated_call_cost_cents;
        if !ledger.admit(estimate).is_allowed() {
            state.advance(RunPhase::Done)?;
            return Ok(build_report(
                &state,
                &ledger,
                config,
                RunStatus::BudgetExceeded,
                Some("inquiry admission denied by budget ledger".to_string()),
                json!({ "perspectives": {} }),
            ));
        }

        state.advance(RunPhase::Inquiry)?;

        // One query per perspective, assigned round-robin over the roster;
        // the perspective key rides along as the job's context reference.
        let jobs: Vec<ScatterJob> = Perspective::ALL
            .iter()
            .enumerate()
            .map(|(i, perspective)| {
                let reviewer = config.reviewers[i % config.reviewers.len()].clone();
                ScatterJob::new(reviewer, ReviewMode::Review)
                    .with_context(format!("perspective:{}", perspective.as_str()))
            })
            .collect();

        let spec = PhaseSpec {
            phase: RunPhase::Inquiry,
            run_id: state.run_id().to_string(),
            document_ref: config.document_ref.clone(),
            jobs,
            call_timeout: config.call_timeout,
            stagger: config.stagger,
            required_minimum: config.quorum.inquiry,
        };
        let outcome = executor.execute(&spec, progress).await;
        for result in &outcome.results {
            ledger.record(result.cost_cents, result.total_tokens());
        }

        if outcome.is_total_failure() {
            state.advance(RunPhase::Done)?;
            return Ok(build_report(
                &state,
                &ledger,
                config,
                RunStatus::AllCallsFailed {
                    phase: "inquiry".to_string(),
                },
                None,
                json!({ "perspectives": {} }),
            ));
        }

        // Synthesis without cross-scoring: merge the successful perspectives
        // verbatim. Results arrive in job order, so position i is
        // Perspective::ALL[i].
        let hint = ShapeHint::object(&["findings"]);
        let mut perspectives = Map::new();
        let mut missing: Vec<&str> = Vec::new();
        for (i, perspective) in Perspective::ALL.iter().enumerate() {
            let result = &outcome.results[i];
            if result.succeeded {
                let normalized =
                    normalize(&result.content, json!({ "findings": [] }), Some(&hint));
                if normalized.is_fallback() {
                    warn!(
                        perspective = perspective.as_str(),
                        reviewer = %result.reviewer,
                        "perspective reply had no structured findings"
                    );
                }
                let findings = normalized
                    .value
                    .get("findings")
                    .cloned()
                    .unwrap_or_else(|| json!([]));
                perspectives.insert(
                    perspective.as_str().to_string(),
                    json!({
                        "reviewer": result.reviewer,
                        "findings": findings,
                        "raw": normalized.is_fallback(),
                    }),
                );
            } else {
                // Never fabricate a missing perspective.
                missing.push(perspective.as_str());
                perspectives.insert(
                    perspective.as_str().to_string(),
                    json!({
                        "reviewer": result.reviewer,
                        "findings": [],
                        "raw": true,
                    }),
                );
            }
        }

        let status = if !outcome.quorum_met {
            RunStatus::Degraded {
                note: format!(
                    "inquiry quorum not met: {} of {} perspectives succeeded (minimum {})",
                    outcome.success_count,
                    outcome.results.len(),
                    outcome.required_minimum
                ),
            }
        } else if outcome.is_degraded() {
            RunStatus::Degraded {
                note: format!("perspectives missing: {}", missing.join(", ")),
            }
        } else {
            RunStatus::Success
        };
        let note = match &status {
            RunStatus::Degraded { note } => Some(note.clone()),
            _ => None,
        };

        state.advance(RunPhase::Done)?;
        Ok(build_report(
            &state,
            &ledger,
            config,
            status,
            note,
            json!({ "perspectives": Value::Object(perspectives) }),
        ))
    }
}

fn build_report(
    state: &RunState,
    ledger: &BudgetLedger,
    config: &RunConfig,
    status: RunStatus,
    note: Option<String>,
    payload: Value,
) -> FinalReport {
    FinalReport {
        phase: config.doc_phase,
        document: config.document_ref.clone(),
        domain: "unknown".to_string(),
        execution: ExecutionInfo {
            mode: RunMode::Inquiry,
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
    }
}
