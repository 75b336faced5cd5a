//! Progress notification port
//!
//! Callbacks for phase and per-call progress. Implementations live in the
//! presentation layer (console progress bars, plain text).

use council_domain::{ReviewerId, RunPhase};

pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts dispatching
    fn on_phase_start(&self, phase: RunPhase, total_jobs: usize);

    /// Called as each call completes within a phase
    fn on_call_complete(&self, phase: RunPhase, reviewer: &ReviewerId, success: bool);

    /// Called when a phase's join completes
    fn on_phase_complete(&self, phase: RunPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: RunPhase, _total_jobs: usize) {}
    fn on_call_complete(&self, _phase: RunPhase, _reviewer: &ReviewerId, _success: bool) {}
    fn on_phase_complete(&self, _phase: RunPhase) {}
}
