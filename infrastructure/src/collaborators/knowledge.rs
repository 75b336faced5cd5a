//! Knowledge retrieval adapter
//!
//! Fetches domain context for the document under review from an external
//! retrieval command. The phase controller treats any failure here as
//! non-fatal, so this adapter only reports, never recovers.

use crate::config::file_config::CommandSpec;
use crate::process;
use async_trait::async_trait;
use council_application::{KnowledgeContext, KnowledgeError, KnowledgeRetriever};
use council_domain::DocumentPhase;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct WireContext {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    context: Option<String>,
}

pub struct CommandKnowledgeRetriever {
    spec: CommandSpec,
    timeout: Duration,
}

impl CommandKnowledgeRetriever {
    pub fn new(spec: CommandSpec, timeout: Duration) -> Self {
        Self { spec, timeout }
    }
}

#[async_trait]
impl KnowledgeRetriever for CommandKnowledgeRetriever {
    async fn retrieve(
        &self,
        document_ref: &str,
        phase: DocumentPhase,
    ) -> Result<KnowledgeContext, KnowledgeError> {
        let body = json!({
            "document": document_ref,
            "phase": phase.as_str(),
        })
        .to_string();

        let stdout = process::run(&self.spec, &[], Some(&body), self.timeout)
            .await
            .map_err(|e| KnowledgeError::Retrieval(e.to_string()))?;

        let wire: WireContext = serde_json::from_str(&stdout)
            .map_err(|e| KnowledgeError::Retrieval(format!("context is not valid JSON: {e}")))?;

        let context = KnowledgeContext {
            domain: wire.domain.unwrap_or_else(|| "unknown".to_string()),
            context: wire.context.unwrap_or_default(),
        };
        debug!(domain = %context.domain, "knowledge retrieved");
        Ok(context)
    }
}
