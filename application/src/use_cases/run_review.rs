//! Review phase controller
//!
//! Sequences one review run: INIT → KNOWLEDGE → PHASE1 (independent
//! reviews) → PHASE2 (cross-scoring + skeptic) → CONSENSUS → INTEGRATE →
//! DONE. One cumulative wall-clock deadline spans all phases and is checked
//! at phase boundaries only. The budget ledger is owned here and updated
//! exclusively at each phase join.
//!
//! Degradation rules:
//! - zero quorum in any phase short-circuits to DONE with an error status
//! - partial success at/above the minimum proceeds, explicitly degraded
//! - a budget denial skips only the dependent phase (raw reviews, no
//!   consensus), unless it happens before any usable output exists, in
//!   which case the run fails with a budget status

use crate::config::RunConfig;
use crate::ports::capture::CaptureStore;
use crate::ports::knowledge::KnowledgeRetriever;
use crate::ports::progress::ProgressNotifier;
use crate::ports::reviewer_backend::ReviewerBackend;
use crate::ports::scoring_backend::{ScoreArtifacts, ScoringBackend};
use crate::use_cases::invoke::ReviewerInvoker;
use crate::use_cases::scatter::{PhaseSpec, ScatterGatherExecutor, ScatterJob};
use council_domain::{
    classify_items, normalize, summarize, BudgetLedger, CouncilError, CrossScore, ExecutionInfo,
    FinalReport, ImprovementItem, PhaseOutcome, ReviewMode, RunMetrics, RunMode, RunPhase,
    RunState, RunStatus, ShapeHint,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub struct RunReviewUseCase {
    backend: Arc<dyn ReviewerBackend>,
    capture: Arc<dyn CaptureStore>,
    scoring: Arc<dyn ScoringBackend>,
    knowledge: Arc<dyn KnowledgeRetriever>,
}

impl RunReviewUseCase {
    pub fn new(
        backend: Arc<dyn ReviewerBackend>,
        capture: Arc<dyn CaptureStore>,
        scoring: Arc<dyn ScoringBackend>,
        knowledge: Arc<dyn KnowledgeRetriever>,
    ) -> Self {
        Self {
            backend,
            capture,
            scoring,
            knowledge,
        }
    }

    pub async fn execute(
        &self,
        config: &RunConfig,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalReport, CouncilError> {
        config.validate()?;

        let mut state = RunState::new(RunMode::Review, config.deadline);
        let mut ledger = BudgetLedger::new(config.budget_ceiling_cents);
        let executor = ScatterGatherExecutor::new(ReviewerInvoker::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.capture),
            config.pricing.clone(),
        ));

        info!(
            run_id = state.run_id(),
            reviewers = config.reviewers.len(),
            budget_cents = config.budget_ceiling_cents,
            "starting review run"
        );

        let mut degraded_notes: Vec<String> = Vec::new();
        let mut knowledge_note: Option<String> = None;

        // ==================== KNOWLEDGE ====================

        let mut domain = "unknown".to_string();
        let mut knowledge_context: Option<String> = None;
        if config.skip_knowledge {
            info!("knowledge phase skipped by flag");
        } else {
            state.advance(RunPhase::Knowledge)?;
            match self
                .knowledge
                .retrieve(&config.document_ref, config.doc_phase)
                .await
            {
                Ok(context) => {
                    domain = context.domain;
                    if !context.context.is_empty() {
                        knowledge_context = Some(context.context);
                    }
                }
                Err(error) => {
                    // Non-fatal: the run proceeds without domain context.
                    warn!(error = %error, "knowledge retrieval failed, continuing");
                    knowledge_note = Some(error.to_string());
                }
            }
        }

        if state.deadline_exceeded() {
            state.advance(RunPhase::Done)?;
            return Ok(self.build_report(
                &state,
                &ledger,
                config,
                domain,
                RunStatus::DeadlineExceeded,
                None,
                json!({ "raw_reviews": [] }),
            ));
        }

        // ==================== PHASE1: independent reviews ====================

        let phase1_estimate = config.reviewers.len() as u64 * config.estimated_call_cost_cents;
        if !ledger.admit(phase1_estimate).is_allowed() {
            // Denied before any usable output exists: the whole run fails.
            state.advance(RunPhase::Done)?;
            return Ok(self.build_report(
                &state,
                &ledger,
                config,
                domain,
                RunStatus::BudgetExceeded,
                Some("phase1 admission denied by budget ledger".to_string()),
                json!({ "raw_reviews": [] }),
            ));
        }

        state.advance(RunPhase::Phase1)?;
        let phase1_spec = PhaseSpec {
            phase: RunPhase::Phase1,
            run_id: state.run_id().to_string(),
            document_ref: config.document_ref.clone(),
            jobs: config
                .reviewers
                .iter()
                .map(|reviewer| {
                    let job = ScatterJob::new(reviewer.clone(), ReviewMode::Review);
                    match &knowledge_context {
                        Some(context) => job.with_context(context.clone()),
                        None => job,
                    }
                })
                .collect(),
            call_timeout: config.call_timeout,
            stagger: config.stagger,
            required_minimum: config.quorum.phase1,
        };

        let mut phase1 = executor.execute(&phase1_spec, progress).await;
        record_phase(&mut ledger, &phase1);

        // Whole-phase retry is the only retry in the pipeline, used at most
        // once and only after a total failure.
        if phase1.is_total_failure()
            && config.retry_failed_phase
            && state.mark_phase_rerun().is_ok()
        {
            info!("re-running phase1 after total failure");
            phase1 = executor.execute(&phase1_spec, progress).await;
            record_phase(&mut ledger, &phase1);
        }

        if phase1.is_total_failure() {
            state.advance(RunPhase::Done)?;
            return Ok(self.build_report(
                &state,
                &ledger,
                config,
                domain,
                RunStatus::AllCallsFailed {
                    phase: "phase1".to_string(),
                },
                None,
                raw_reviews_payload(&phase1),
            ));
        }

        if !phase1.quorum_met {
            state.advance(RunPhase::Done)?;
            let note = format!(
                "phase1 quorum not met: {} of {} calls succeeded (minimum {})",
                phase1.success_count,
                phase1.results.len(),
                phase1.required_minimum
            );
            return Ok(self.build_report(
                &state,
                &ledger,
                config,
                domain,
                RunStatus::Degraded { note: note.clone() },
                Some(note),
                raw_reviews_payload(&phase1),
            ));
        }

        if phase1.is_degraded() {
            let failed: Vec<String> = phase1
                .failures()
                .map(|r| format!("{} ({})", r.reviewer, r.error_kind.map(|k| k.as_str()).unwrap_or("unknown")))
                .collect();
            degraded_notes.push(format!("phase1 degraded: {}", failed.join(", ")));
        }

        if state.deadline_exceeded() {
            state.advance(RunPhase::Done)?;
            return Ok(self.build_report(
                &state,
                &ledger,
                config,
                domain,
                RunStatus::DeadlineExceeded,
                None,
                raw_reviews_payload(&phase1),
            ));
        }

        // ==================== PHASE2: cross-scoring + skeptic ====================

        let items = extract_items(&phase1);
        let mut consensus_payload: Option<Value> = None;

        if config.skip_consensus {
            info!("cross-scoring and consensus skipped by request");
        } else {
            let phase2_jobs = build_phase2_jobs(config, &items);
            let phase2_estimate = phase2_jobs.len() as u64 * config.estimated_call_cost_cents;

            if !ledger.admit(phase2_estimate).is_allowed() {
                // Usable phase1 output exists: skip only the dependent
                // phases and degrade instead of failing the run.
                warn!(
                    spent = ledger.total_cost_cents(),
                    estimate = phase2_estimate,
                    "budget denied phase2 admission, emitting raw reviews"
                );
                degraded_notes
                    .push("budget exceeded: cross-scoring and consensus skipped".to_string());
            } else {
                state.advance(RunPhase::Phase2)?;
                let phase2_spec = PhaseSpec {
                    phase: RunPhase::Phase2,
                    run_id: state.run_id().to_string(),
                    document_ref: config.document_ref.clone(),
                    jobs: phase2_jobs,
                    call_timeout: config.call_timeout,
                    stagger: config.stagger,
                    required_minimum: config.quorum.phase2,
                };
                let phase2 = executor.execute(&phase2_spec, progress).await;
                record_phase(&mut ledger, &phase2);

                if phase2.is_total_failure() {
                    state.advance(RunPhase::Done)?;
                    return Ok(self.build_report(
                        &state,
                        &ledger,
                        config,
                        domain,
                        RunStatus::AllCallsFailed {
                            phase: "phase2".to_string(),
                        },
                        None,
                        raw_reviews_payload(&phase1),
                    ));
                }

                if !phase2.quorum_met {
                    degraded_notes.push(format!(
                        "phase2 quorum not met: {} of {} calls succeeded (minimum {}), consensus skipped",
                        phase2.success_count,
                        phase2.results.len(),
                        phase2.required_minimum
                    ));
                } else {
                    if phase2.is_degraded() {
                        let failed: Vec<String> =
                            phase2.failures().map(|r| r.reviewer.to_string()).collect();
                        degraded_notes.push(format!("phase2 degraded: {}", failed.join(", ")));
                    }

                    if state.deadline_exceeded() {
                        state.advance(RunPhase::Done)?;
                        return Ok(self.build_report(
                            &state,
                            &ledger,
                            config,
                            domain,
                            RunStatus::DeadlineExceeded,
                            None,
                            raw_reviews_payload(&phase1),
                        ));
                    }

                    // ==================== CONSENSUS ====================

                    state.advance(RunPhase::Consensus)?;
                    consensus_payload = Some(
                        self.run_consensus(config, &items, &phase2, &mut degraded_notes)
                            .await,
                    );
                }
            }
        }

        // ==================== INTEGRATE ====================

        state.advance(RunPhase::Integrate)?;
        let payload = match consensus_payload {
            Some(consensus) => json!({
                "consensus": consensus,
                "raw_reviews": phase1.results,
            }),
            None => raw_reviews_payload(&phase1),
        };

        let status = if !degraded_notes.is_empty() {
            RunStatus::Degraded {
                note: degraded_notes.join("; "),
            }
        } else if let Some(note) = &knowledge_note {
            RunStatus::KnowledgeFailed { note: note.clone() }
        } else {
            RunStatus::Success
        };
        let note = match (&status, knowledge_note) {
            (RunStatus::Degraded { note }, _) => Some(note.clone()),
            (_, Some(knowledge)) => Some(knowledge),
            _ if config.skip_consensus => Some("raw reviews only, consensus skipped by request".to_string()),
            _ => None,
        };

        state.advance(RunPhase::Done)?;
        Ok(self.build_report(&state, &ledger, config, domain, status, note, payload))
    }

    /// CONSENSUS: prepare artifacts, delegate the numeric summary to the
    /// scoring backend, and merge it with the domain classification.
    async fn run_consensus(
        &self,
        config: &RunConfig,
        items: &[ImprovementItem],
        phase2: &PhaseOutcome,
        degraded_notes: &mut Vec<String>,
    ) -> Value {
        let cross_scores = extract_cross_scores(phase2);
        let skeptic_concerns = extract_skeptic_concerns(phase2);

        let artifacts = ScoreArtifacts {
            items: items.to_vec(),
            cross_scores: cross_scores.clone(),
            skeptic_concerns: skeptic_concerns.clone(),
        };
        let scoring = match self.scoring.summarize(&artifacts).await {
            Ok(summary) => summary.payload,
            Err(error) => {
                warn!(error = %error, "scoring backend failed, classification only");
                degraded_notes.push("scoring backend unavailable, classification only".to_string());
                Value::Null
            }
        };

        let classified = classify_items(
            items,
            &cross_scores,
            &skeptic_concerns,
            config.acceptance_threshold,
        );
        let summary = summarize(&classified);

        json!({
            "items": classified,
            "summary": summary,
            "scoring": scoring,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_report(
        &self,
        state: &RunState,
        ledger: &BudgetLedger,
        config: &RunConfig,
        domain: String,
        status: RunStatus,
        note: Option<String>,
        payload: Value,
    ) -> FinalReport {
        FinalReport {
            phase: config.doc_phase,
            document: config.document_ref.clone(),
            domain,
            execution: ExecutionInfo {
                mode: RunMode::Review,
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
}

/// Record a joined phase into the ledger. This is the single writer: it runs
/// after the join, never from concurrent call handlers.
fn record_phase(ledger: &mut BudgetLedger, outcome: &PhaseOutcome) {
    for result in &outcome.results {
        ledger.record(result.cost_cents, result.total_tokens());
    }
}

fn raw_reviews_payload(phase1: &PhaseOutcome) -> Value {
    json!({ "raw_reviews": phase1.results })
}

/// Parse improvement items out of the successful phase1 reviews.
fn extract_items(phase1: &PhaseOutcome) -> Vec<ImprovementItem> {
    let hint = ShapeHint::object(&["items"]);
    let mut items = Vec::new();

    for result in phase1.successes() {
        let normalized = normalize(&result.content, json!({ "items": [] }), Some(&hint));
        if normalized.is_fallback() {
            warn!(reviewer = %result.reviewer, "review output had no structured items");
            continue;
        }
        for warning in &normalized.warnings {
            warn!(reviewer = %result.reviewer, warning, "review normalization");
        }

        if let Some(entries) = normalized.value.get("items").and_then(Value::as_array) {
            for entry in entries {
                let description = entry
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| {
                        entry
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    });
                if let Some(description) = description {
                    items.push(ImprovementItem::new(result.reviewer.clone(), description));
                }
            }
        }
    }
    items
}

/// Phase2 fans out a score wave followed by a skeptic wave; the stagger
/// between the waves is applied by the executor at launch time.
fn build_phase2_jobs(config: &RunConfig, items: &[ImprovementItem]) -> Vec<ScatterJob> {
    let mut jobs = Vec::with_capacity(config.reviewers.len() * 2);

    for reviewer in &config.reviewers {
        // Triangular cross-scoring: each reviewer scores the items every
        // *other* reviewer authored.
        let to_score: Vec<&ImprovementItem> = items
            .iter()
            .filter(|item| item.source_reviewer != *reviewer)
            .collect();
        let context = json!({ "items_to_score": to_score }).to_string();
        jobs.push(ScatterJob::new(reviewer.clone(), ReviewMode::Score).with_context(context));
    }
    for reviewer in &config.reviewers {
        jobs.push(ScatterJob::new(reviewer.clone(), ReviewMode::Skeptic));
    }
    jobs
}

fn extract_cross_scores(phase2: &PhaseOutcome) -> Vec<CrossScore> {
    let hint = ShapeHint::object(&["scores"]);
    let mut scores = Vec::new();

    for result in phase2.successes().filter(|r| r.mode == ReviewMode::Score) {
        let normalized = normalize(&result.content, json!({ "scores": [] }), Some(&hint));
        if normalized.is_fallback() {
            warn!(reviewer = %result.reviewer, "score output had no structured scores");
            continue;
        }

        if let Some(entries) = normalized.value.get("scores").and_then(Value::as_array) {
            for entry in entries {
                let description = entry
                    .get("item")
                    .or_else(|| entry.get("description"))
                    .and_then(Value::as_str);
                let score = entry.get("score").and_then(Value::as_f64);
                if let (Some(description), Some(score)) = (description, score) {
                    scores.push(CrossScore::new(
                        result.reviewer.as_str(),
                        description,
                        score,
                    ));
                }
            }
        }
    }
    scores
}

fn extract_skeptic_concerns(phase2: &PhaseOutcome) -> Vec<String> {
    let hint = ShapeHint::object(&["concerns"]);
    let mut concerns = Vec::new();

    for result in phase2.successes().filter(|r| r.mode == ReviewMode::Skeptic) {
        let normalized = normalize(&result.content, json!({ "concerns": [] }), Some(&hint));
        if let Some(entries) = normalized.value.get("concerns").and_then(Value::as_array) {
            for entry in entries {
                let concern = entry.as_str().map(str::to_string).or_else(|| {
                    entry
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
                if let Some(concern) = concern {
                    concerns.push(concern);
                }
            }
        }
    }
    concerns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuorumThresholds;
    use crate::ports::capture::NoCapture;
    use crate::ports::knowledge::{KnowledgeContext, KnowledgeError, NoKnowledge};
    use crate::ports::progress::NoProgress;
    use crate::ports::reviewer_backend::{
        BackendCall, BackendError, BackendReply, BackendUsage, ReviewerBackend,
    };
    use crate::ports::scoring_backend::{ScoringError, ScoringSummary};
    use async_trait::async_trait;
    use council_domain::{DocumentPhase, PricingTable, ReviewerId, ReviewerPricing};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone)]
    enum Behavior {
        Reply(String),
        Fail,
        Hang,
    }

    /// Backend scripted per (reviewer, mode).
    struct ScriptedBackend {
        behaviors: HashMap<(String, ReviewMode), Behavior>,
        tokens_in_per_call: u64,
    }

    impl ScriptedBackend {
        fn new() -> Self {
            Self {
                behaviors: HashMap::new(),
                tokens_in_per_call: 1000,
            }
        }

        fn set(mut self, reviewer: &str, mode: ReviewMode, behavior: Behavior) -> Self {
            self.behaviors
                .insert((reviewer.to_string(), mode), behavior);
            self
        }
    }

    #[async_trait]
    impl ReviewerBackend for ScriptedBackend {
        async fn complete(&self, call: &BackendCall) -> Result<BackendReply, BackendError> {
            let behavior = self
                .behaviors
                .get(&(call.reviewer.as_str().to_string(), call.mode))
                .cloned()
                .unwrap_or(Behavior::Reply("{}".to_string()));

            match behavior {
                Behavior::Reply(content) => Ok(BackendReply {
                    content,
                    usage: BackendUsage {
                        input_tokens: self.tokens_in_per_call,
                        output_tokens: 0,
                        estimated: false,
                    },
                    latency_ms: 1,
                }),
                Behavior::Fail => Err(BackendError::Transport("scripted failure".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                    unreachable!("hang behavior should always be timed out")
                }
            }
        }
    }

    struct CountingScoring {
        calls: AtomicUsize,
    }

    impl CountingScoring {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ScoringBackend for CountingScoring {
        async fn summarize(
            &self,
            _artifacts: &ScoreArtifacts,
        ) -> Result<ScoringSummary, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ScoringSummary {
                payload: json!({ "engine": "stub" }),
            })
        }
    }

    struct FailingKnowledge;

    #[async_trait]
    impl KnowledgeRetriever for FailingKnowledge {
        async fn retrieve(
            &self,
            _document_ref: &str,
            _phase: DocumentPhase,
        ) -> Result<KnowledgeContext, KnowledgeError> {
            Err(KnowledgeError::Retrieval("index offline".to_string()))
        }
    }

    fn items_reply(descriptions: &[&str]) -> String {
        let items: Vec<Value> = descriptions
            .iter()
            .map(|d| json!({ "description": d }))
            .collect();
        json!({ "items": items }).to_string()
    }

    fn scores_reply(pairs: &[(&str, f64)]) -> String {
        let scores: Vec<Value> = pairs
            .iter()
            .map(|(item, score)| json!({ "item": item, "score": score }))
            .collect();
        json!({ "scores": scores }).to_string()
    }

    fn empty_concerns() -> String {
        json!({ "concerns": [] }).to_string()
    }

    fn config(reviewers: &[&str]) -> RunConfig {
        RunConfig::new(
            RunMode::Review,
            "docs/plan.md",
            DocumentPhase::Prd,
            reviewers.iter().map(|r| ReviewerId::new(*r)).collect(),
        )
        .with_skip_knowledge(true)
        .with_call_timeout(Duration::from_millis(200))
    }

    fn use_case(backend: ScriptedBackend, scoring: Arc<CountingScoring>) -> RunReviewUseCase {
        RunReviewUseCase::new(
            Arc::new(backend),
            Arc::new(NoCapture),
            scoring,
            Arc::new(NoKnowledge),
        )
    }

    /// Scenario A: two reviewers, everything succeeds, all cross-scores
    /// favorable: every item is high consensus and agreement is 100%.
    #[tokio::test]
    async fn test_scenario_all_favorable_pair() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Reply(items_reply(&["add rollback plan"])))
            .set("b", ReviewMode::Review, Behavior::Reply(items_reply(&["define slos"])))
            .set("a", ReviewMode::Score, Behavior::Reply(scores_reply(&[("define slos", 8.0)])))
            .set("b", ReviewMode::Score, Behavior::Reply(scores_reply(&[("add rollback plan", 9.0)])))
            .set("a", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()))
            .set("b", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()));
        let scoring = Arc::new(CountingScoring::new());

        let report = use_case(backend, scoring.clone())
            .execute(&config(&["a", "b"]), &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 1);

        let summary = &report.payload["consensus"]["summary"];
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["high_consensus"], 2);
        assert_eq!(summary["percent_agreement"], 100.0);
        assert_eq!(report.payload["consensus"]["scoring"]["engine"], "stub");
    }

    /// Scenario B: three reviewers, one phase1 call times out: quorum 2-of-3
    /// is met, the run proceeds degraded, and the report names the failed
    /// reviewer.
    #[tokio::test]
    async fn test_scenario_tertiary_timeout_degrades() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Reply(items_reply(&["tighten scope"])))
            .set("b", ReviewMode::Review, Behavior::Reply(items_reply(&["add metrics"])))
            .set("c", ReviewMode::Review, Behavior::Hang)
            .set("a", ReviewMode::Score, Behavior::Reply(scores_reply(&[("add metrics", 8.0)])))
            .set("b", ReviewMode::Score, Behavior::Reply(scores_reply(&[("tighten scope", 8.0)])))
            .set("c", ReviewMode::Score, Behavior::Reply(scores_reply(&[
                ("tighten scope", 7.0),
                ("add metrics", 7.0),
            ])))
            .set("a", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()))
            .set("b", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()))
            .set("c", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()));
        let scoring = Arc::new(CountingScoring::new());

        let report = use_case(backend, scoring.clone())
            .execute(&config(&["a", "b", "c"]), &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.exit_code(), 6);
        let RunStatus::Degraded { note } = &report.status else {
            panic!("expected degraded status, got {:?}", report.status);
        };
        assert!(note.contains("c"));
        assert!(note.contains("timeout"));
        // Consensus still ran on the surviving quorum
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.payload["consensus"]["summary"]["total"], 2);
    }

    /// Scenario C: every phase1 call fails: exit 3, later phases never
    /// attempted, and the ledger is untouched by the skipped phases.
    #[tokio::test]
    async fn test_scenario_all_calls_failed() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Fail)
            .set("b", ReviewMode::Review, Behavior::Fail);
        let scoring = Arc::new(CountingScoring::new());

        let report = use_case(backend, scoring.clone())
            .execute(&config(&["a", "b"]), &NoProgress)
            .await
            .unwrap();

        assert_eq!(
            report.status,
            RunStatus::AllCallsFailed {
                phase: "phase1".to_string()
            }
        );
        assert_eq!(report.exit_code(), 3);
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.metrics.cost_cents, 0);

        // The failures themselves are in the payload for post-mortem
        let raw = report.payload["raw_reviews"].as_array().unwrap();
        assert_eq!(raw.len(), 2);
        assert!(raw.iter().all(|r| r["succeeded"] == false));
    }

    /// Scenario D: ceiling 100 cents, phase1 records 60, phase2 estimate
    /// exceeds the remainder: raw-reviews output with a note, exit 6,
    /// phase2/consensus never invoked.
    #[tokio::test]
    async fn test_scenario_budget_denies_consensus() {
        let backend = ScriptedBackend {
            behaviors: HashMap::from([
                (
                    ("a".to_string(), ReviewMode::Review),
                    Behavior::Reply(items_reply(&["item one"])),
                ),
                (
                    ("b".to_string(), ReviewMode::Review),
                    Behavior::Reply(items_reply(&["item two"])),
                ),
            ]),
            // 1 mtok in at 30 cents/mtok = 30 cents per call, 60 for the phase
            tokens_in_per_call: 1_000_000,
        };
        let scoring = Arc::new(CountingScoring::new());

        let pricing = PricingTable::new()
            .with_entry("a", ReviewerPricing::new(30, 0))
            .with_entry("b", ReviewerPricing::new(30, 0));
        let config = config(&["a", "b"])
            .with_budget_ceiling_cents(100)
            .with_estimated_call_cost_cents(25)
            .with_pricing(pricing);

        let report = use_case(backend, scoring.clone())
            .execute(&config, &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.exit_code(), 6);
        assert!(report.note.as_deref().unwrap().contains("budget"));
        assert_eq!(report.metrics.cost_cents, 60);
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 0);
        assert!(report.payload.get("consensus").is_none());
        assert_eq!(report.payload["raw_reviews"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_at_phase_boundary() {
        let backend = ScriptedBackend::new();
        let scoring = Arc::new(CountingScoring::new());

        let config = config(&["a", "b"]).with_deadline(Duration::ZERO);
        let report = use_case(backend, scoring.clone())
            .execute(&config, &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::DeadlineExceeded);
        assert_eq!(report.exit_code(), 4);
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_configuration_error_pre_spend() {
        let backend = ScriptedBackend::new();
        let scoring = Arc::new(CountingScoring::new());

        let config = RunConfig::new(RunMode::Review, "doc.md", DocumentPhase::Prd, vec![]);
        let error = use_case(backend, scoring)
            .execute(&config, &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(error, CouncilError::Configuration(_)));
        assert!(error.is_pre_spend());
    }

    #[tokio::test]
    async fn test_skip_consensus_by_request_is_not_degraded() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Reply(items_reply(&["x"])))
            .set("b", ReviewMode::Review, Behavior::Reply(items_reply(&["y"])));
        let scoring = Arc::new(CountingScoring::new());

        let config = config(&["a", "b"]).with_skip_consensus(true);
        let report = use_case(backend, scoring.clone())
            .execute(&config, &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Success);
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 0);
        assert!(report.note.as_deref().unwrap().contains("by request"));
    }

    #[tokio::test]
    async fn test_knowledge_failure_is_non_fatal_exit_2() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Reply(items_reply(&["x"])))
            .set("b", ReviewMode::Review, Behavior::Reply(items_reply(&["y"])))
            .set("a", ReviewMode::Score, Behavior::Reply(scores_reply(&[("y", 8.0)])))
            .set("b", ReviewMode::Score, Behavior::Reply(scores_reply(&[("x", 8.0)])))
            .set("a", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()))
            .set("b", ReviewMode::Skeptic, Behavior::Reply(empty_concerns()));
        let scoring = Arc::new(CountingScoring::new());

        let use_case = RunReviewUseCase::new(
            Arc::new(backend),
            Arc::new(NoCapture),
            scoring,
            Arc::new(FailingKnowledge),
        );
        let config = config(&["a", "b"]).with_skip_knowledge(false);
        let report = use_case.execute(&config, &NoProgress).await.unwrap();

        assert_eq!(report.exit_code(), 2);
        assert!(matches!(report.status, RunStatus::KnowledgeFailed { .. }));
        // The run itself completed with consensus
        assert!(report.payload.get("consensus").is_some());
    }

    #[tokio::test]
    async fn test_phase1_below_quorum_partial_is_degraded_raw() {
        let backend = ScriptedBackend::new()
            .set("a", ReviewMode::Review, Behavior::Reply(items_reply(&["x"])))
            .set("b", ReviewMode::Review, Behavior::Fail)
            .set("c", ReviewMode::Review, Behavior::Fail);
        let scoring = Arc::new(CountingScoring::new());

        let config = config(&["a", "b", "c"]).with_quorum(QuorumThresholds {
            phase1: 2,
            phase2: 3,
            inquiry: 2,
        });
        let report = use_case(backend, scoring.clone())
            .execute(&config, &NoProgress)
            .await
            .unwrap();

        assert_eq!(report.exit_code(), 6);
        assert!(report.note.as_deref().unwrap().contains("quorum not met"));
        assert_eq!(scoring.calls.load(Ordering::SeqCst), 0);
        assert!(report.payload.get("consensus").is_none());
    }
}
