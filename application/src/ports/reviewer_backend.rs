//! Reviewer backend port
//!
//! Defines the interface for performing one model invocation. The engine
//! never constructs prompts or authenticates against providers; it hands the
//! backend a call descriptor and receives either a uniform reply or a typed
//! failure.

use async_trait::async_trait;
use council_domain::{CallErrorKind, ReviewMode, ReviewerId};
use thiserror::Error;

/// One call to a reviewer backend
#[derive(Debug, Clone)]
pub struct BackendCall {
    pub reviewer: ReviewerId,
    pub mode: ReviewMode,
    /// Reference to the document under review
    pub input_ref: String,
    /// Reference to supplementary system context, if any
    pub system_context_ref: Option<String>,
    /// Timeout budget for the call; the backend should give up by itself,
    /// and the invoker enforces the bound regardless
    pub timeout_ms: u64,
}

/// Token usage reported (or estimated) by the backend
#[derive(Debug, Clone, Copy)]
pub struct BackendUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// True when the backend could not report real counts
    pub estimated: bool,
}

/// Uniform reply from any reviewer backend
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub content: String,
    pub usage: BackendUsage,
    pub latency_ms: u64,
}

/// Typed failure of a backend call
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("call timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("reviewer unavailable: {0}")]
    Unavailable(String),

    #[error("malformed reply: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Whether a later attempt could plausibly succeed. The executor never
    /// retries individual calls; this informs whole-phase retry decisions.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Timeout | BackendError::Transport(_) | BackendError::Unavailable(_)
        )
    }

    /// Classify into the per-call error kind recorded on the result.
    pub fn kind(&self) -> CallErrorKind {
        match self {
            BackendError::Timeout => CallErrorKind::Timeout,
            BackendError::Transport(_) | BackendError::Unavailable(_) => CallErrorKind::Provider,
            BackendError::Malformed(_) => CallErrorKind::InvalidResponse,
        }
    }
}

/// Gateway to the reviewer backend.
///
/// Two equivalent call paths exist in the infrastructure layer (a structured
/// direct path and a legacy adapter path); both implement this trait, so
/// callers are path-agnostic.
#[async_trait]
pub trait ReviewerBackend: Send + Sync {
    async fn complete(&self, call: &BackendCall) -> Result<BackendReply, BackendError>;
}
