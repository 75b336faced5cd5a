//! Mode router
//!
//! Pure dispatch from the validated mode enum to one of the three pipelines.
//! Unknown modes never reach this point: they fail at parse, before any
//! budget is spent.

use crate::config::RunConfig;
use crate::ports::capture::CaptureStore;
use crate::ports::knowledge::KnowledgeRetriever;
use crate::ports::progress::ProgressNotifier;
use crate::ports::red_team::RedTeamPipeline;
use crate::ports::reviewer_backend::ReviewerBackend;
use crate::ports::scoring_backend::ScoringBackend;
use crate::use_cases::run_inquiry::RunInquiryUseCase;
use crate::use_cases::run_red_team::RunRedTeamUseCase;
use crate::use_cases::run_review::RunReviewUseCase;
use council_domain::{CouncilError, FinalReport, RunMode};
use std::sync::Arc;

pub struct ModeRouter {
    review: RunReviewUseCase,
    inquiry: RunInquiryUseCase,
    red_team: RunRedTeamUseCase,
}

impl ModeRouter {
    pub fn new(
        backend: Arc<dyn ReviewerBackend>,
        capture: Arc<dyn CaptureStore>,
        scoring: Arc<dyn ScoringBackend>,
        knowledge: Arc<dyn KnowledgeRetriever>,
        red_team: Arc<dyn RedTeamPipeline>,
    ) -> Self {
        Self {
            review: RunReviewUseCase::new(
                Arc::clone(&backend),
                Arc::clone(&capture),
                scoring,
                knowledge,
            ),
            inquiry: RunInquiryUseCase::new(backend, capture),
            red_team: RunRedTeamUseCase::new(red_team),
        }
    }

    pub async fn dispatch(
        &self,
        config: &RunConfig,
        progress: &dyn ProgressNotifier,
    ) -> Result<FinalReport, CouncilError> {
        match config.mode {
            RunMode::Review => self.review.execute(config, progress).await,
            RunMode::Inquiry => self.inquiry.execute(config, progress).await,
            RunMode::RedTeam => self.red_team.execute(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::capture::NoCapture;
    use crate::ports::knowledge::NoKnowledge;
    use crate::ports::progress::NoProgress;
    use crate::ports::red_team::{RedTeamEnvelope, RedTeamError, RedTeamRequest};
    use crate::ports::reviewer_backend::{
        BackendCall, BackendError, BackendReply, BackendUsage,
    };
    use crate::ports::scoring_backend::NoScoring;
    use async_trait::async_trait;
    use council_domain::{DocumentPhase, ReviewerId};
    use serde_json::json;

    struct EchoBackend;

    #[async_trait]
    impl ReviewerBackend for EchoBackend {
        async fn complete(&self, _call: &BackendCall) -> Result<BackendReply, BackendError> {
            Ok(BackendReply {
                content: json!({ "items": [], "findings": [], "scores": [], "concerns": [] })
                    .to_string(),
                usage: BackendUsage {
                    input_tokens: 1,
                    output_tokens: 1,
                    estimated: false,
                },
                latency_ms: 1,
            })
        }
    }

    struct EchoPipeline;

    #[async_trait]
    impl RedTeamPipeline for EchoPipeline {
        async fn run(&self, _request: &RedTeamRequest) -> Result<RedTeamEnvelope, RedTeamError> {
            Ok(RedTeamEnvelope {
                findings: json!([]),
                cost_cents: 1,
                latency_ms: 1,
            })
        }
    }

    fn router() -> ModeRouter {
        ModeRouter::new(
            Arc::new(EchoBackend),
            Arc::new(NoCapture),
            Arc::new(NoScoring),
            Arc::new(NoKnowledge),
            Arc::new(EchoPipeline),
        )
    }

    fn config(mode: RunMode) -> RunConfig {
        RunConfig::new(
            mode,
            "docs/plan.md",
            DocumentPhase::Prd,
            vec![ReviewerId::new("a"), ReviewerId::new("b")],
        )
        .with_skip_knowledge(true)
    }

    #[tokio::test]
    async fn test_each_mode_reaches_its_pipeline() {
        let router = router();

        let review = router
            .dispatch(&config(RunMode::Review), &NoProgress)
            .await
            .unwrap();
        assert_eq!(review.execution.mode, RunMode::Review);

        let inquiry = router
            .dispatch(&config(RunMode::Inquiry), &NoProgress)
            .await
            .unwrap();
        assert_eq!(inquiry.execution.mode, RunMode::Inquiry);
        assert!(inquiry.payload.get("perspectives").is_some());

        let red_team = router
            .dispatch(&config(RunMode::RedTeam), &NoProgress)
            .await
            .unwrap();
        assert_eq!(red_team.execution.mode, RunMode::RedTeam);
        assert!(red_team.payload.get("red_team").is_some());
    }

    #[test]
    fn test_unknown_mode_fails_at_parse() {
        // Unknown modes never construct a config at all
        assert!("sabotage".parse::<RunMode>().is_err());
    }
}
