//! Application layer for council
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer. The use cases
//! orchestrate the run: the mode router dispatches to the review, red-team,
//! or inquiry pipeline, the phase controller sequences phases under one
//! cumulative deadline, and the scatter-gather executor is the only
//! component that spawns concurrent work.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{QuorumThresholds, RunConfig};
pub use ports::{
    capture::{CaptureKey, CaptureStore, NoCapture},
    knowledge::{KnowledgeContext, KnowledgeError, KnowledgeRetriever, NoKnowledge},
    progress::{NoProgress, ProgressNotifier},
    red_team::{RedTeamEnvelope, RedTeamError, RedTeamPipeline, RedTeamRequest},
    reviewer_backend::{BackendCall, BackendError, BackendReply, BackendUsage, ReviewerBackend},
    scoring_backend::{NoScoring, ScoreArtifacts, ScoringBackend, ScoringError, ScoringSummary},
};
pub use use_cases::invoke::ReviewerInvoker;
pub use use_cases::route::ModeRouter;
pub use use_cases::run_inquiry::RunInquiryUseCase;
pub use use_cases::run_red_team::RunRedTeamUseCase;
pub use use_cases::run_review::RunReviewUseCase;
pub use use_cases::scatter::{PhaseSpec, ScatterGatherExecutor, ScatterJob};
