//! Knowledge retrieval port
//!
//! Optional pre-review phase: fetches domain context for the document under
//! review. Failure is non-fatal — the run proceeds with an "unknown" domain
//! and the final status notes the miss.

use async_trait::async_trait;
use council_domain::DocumentPhase;
use thiserror::Error;

/// Retrieved domain context
#[derive(Debug, Clone)]
pub struct KnowledgeContext {
    /// Domain label for the report (e.g. "payments")
    pub domain: String,
    /// Context reference passed to reviewer calls
    pub context: String,
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("knowledge retrieval failed: {0}")]
    Retrieval(String),
}

#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    async fn retrieve(
        &self,
        document_ref: &str,
        phase: DocumentPhase,
    ) -> Result<KnowledgeContext, KnowledgeError>;
}

/// No-op retriever for unconfigured deployments: yields an unknown domain
/// and no context without failing the phase.
pub struct NoKnowledge;

#[async_trait]
impl KnowledgeRetriever for NoKnowledge {
    async fn retrieve(
        &self,
        _document_ref: &str,
        _phase: DocumentPhase,
    ) -> Result<KnowledgeContext, KnowledgeError> {
        Ok(KnowledgeContext {
            domain: "unknown".to_string(),
            context: String::new(),
        })
    }
}
