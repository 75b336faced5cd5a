//! Scatter-gather executor
//!
//! The only component that spawns concurrent work: one task per reviewer
//! call, fanned out on a `JoinSet` and joined completely — no job is
//! abandoned mid-flight, and failed jobs are never retried here (retry is a
//! whole-phase decision made by the phase controller).
//!
//! When a stagger is configured, jobs are split into ordered waves by mode
//! and the executor sleeps between wave launches to avoid provider-side
//! rate-limit bursts. Staggering is a launch-time barrier only: wave N+1 is
//! not launched before wave N has been dispatched, but wave N's calls may
//! still be in flight.

use crate::ports::progress::ProgressNotifier;
use crate::use_cases::invoke::ReviewerInvoker;
use council_domain::{PhaseOutcome, ReviewMode, ReviewRequest, ReviewerId, RunPhase};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One job in a phase's fan-out
#[derive(Debug, Clone)]
pub struct ScatterJob {
    pub reviewer: ReviewerId,
    pub mode: ReviewMode,
    /// Per-job context reference (knowledge output, perspective key, or the
    /// items being cross-scored)
    pub context_ref: Option<String>,
}

impl ScatterJob {
    pub fn new(reviewer: ReviewerId, mode: ReviewMode) -> Self {
        Self {
            reviewer,
            mode,
            context_ref: None,
        }
    }

    pub fn with_context(mut self, context_ref: impl Into<String>) -> Self {
        self.context_ref = Some(context_ref.into());
        self
    }
}

/// Parameters for one phase's fan-out
#[derive(Debug, Clone)]
pub struct PhaseSpec {
    pub phase: RunPhase,
    pub run_id: String,
    pub document_ref: String,
    pub jobs: Vec<ScatterJob>,
    pub call_timeout: Duration,
    pub stagger: Duration,
    pub required_minimum: usize,
}

pub struct ScatterGatherExecutor {
    invoker: ReviewerInvoker,
}

impl ScatterGatherExecutor {
    pub fn new(invoker: ReviewerInvoker) -> Self {
        Self { invoker }
    }

    /// Launch every job, wait for every job, and apply the quorum policy.
    ///
    /// Results come back in job order regardless of completion order, so the
    /// caller can correlate results with jobs positionally.
    pub async fn execute(
        &self,
        spec: &PhaseSpec,
        progress: &dyn ProgressNotifier,
    ) -> PhaseOutcome {
        let launched = spec.jobs.len();
        info!(
            phase = %spec.phase,
            jobs = launched,
            stagger_ms = spec.stagger.as_millis() as u64,
            "dispatching phase"
        );
        progress.on_phase_start(spec.phase, launched);

        let mut join_set: JoinSet<(usize, council_domain::ReviewResult)> = JoinSet::new();

        let waves = split_waves(&spec.jobs);
        let mut job_index = 0usize;
        for (wave_number, wave) in waves.iter().enumerate() {
            if wave_number > 0 && !spec.stagger.is_zero() {
                debug!(
                    phase = %spec.phase,
                    wave = wave_number,
                    "stagger delay before wave launch"
                );
                tokio::time::sleep(spec.stagger).await;
            }

            for job in *wave {
                let invoker = self.invoker.clone();
                let run_id = spec.run_id.clone();
                let mut request = ReviewRequest::new(
                    job.reviewer.clone(),
                    job.mode,
                    spec.document_ref.clone(),
                    spec.call_timeout.as_millis() as u64,
                );
                if let Some(context) = &job.context_ref {
                    request = request.with_context(context.clone());
                }
                let index = job_index;
                job_index += 1;

                join_set.spawn(async move {
                    let result = invoker.invoke(&run_id, &request).await;
                    (index, result)
                });
            }
        }

        // Join blocks until every launched job has completed or individually
        // timed out inside the invoker.
        let mut indexed = Vec::with_capacity(launched);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    progress.on_call_complete(spec.phase, &result.reviewer, result.succeeded);
                    indexed.push((index, result));
                }
                Err(join_error) => {
                    warn!(phase = %spec.phase, error = %join_error, "task join error");
                }
            }
        }

        // A panicked task never reports back; synthesize a failure for its
        // job so success_count + failure_count still equals jobs launched.
        for (index, job) in spec.jobs.iter().enumerate() {
            if !indexed.iter().any(|(i, _)| *i == index) {
                indexed.push((
                    index,
                    council_domain::ReviewResult::failure(
                        job.reviewer.clone(),
                        job.mode,
                        council_domain::CallErrorKind::Provider,
                        "call task aborted before completion",
                        0,
                    ),
                ));
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        let results: Vec<_> = indexed.into_iter().map(|(_, result)| result).collect();

        progress.on_phase_complete(spec.phase);

        let outcome = PhaseOutcome::from_results(
            spec.phase.as_str(),
            results,
            spec.required_minimum,
        );
        info!(
            phase = %spec.phase,
            successes = outcome.success_count,
            failures = outcome.failure_count,
            quorum_met = outcome.quorum_met,
            "phase joined"
        );
        outcome
    }
}

/// Split jobs into ordered waves of consecutive equal modes.
fn split_waves(jobs: &[ScatterJob]) -> Vec<&[ScatterJob]> {
    let mut waves = Vec::new();
    let mut start = 0;
    for i in 1..=jobs.len() {
        if i == jobs.len() || jobs[i].mode != jobs[start].mode {
            waves.push(&jobs[start..i]);
            start = i;
        }
    }
    waves
}
