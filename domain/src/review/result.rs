//! Review result types

use crate::core::reviewer::ReviewerId;
use crate::review::request::ReviewMode;
use serde::{Deserialize, Serialize};

/// Classified failure of a single reviewer call.
///
/// Per-call failures never escalate to a run failure on their own; they only
/// contribute to quorum accounting for the phase they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallErrorKind {
    /// The call did not complete within its timeout
    Timeout,
    /// Transport failure or the reviewer backend was unavailable
    Provider,
    /// The backend answered but the reply could not be decoded
    InvalidResponse,
}

impl CallErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallErrorKind::Timeout => "timeout",
            CallErrorKind::Provider => "provider_error",
            CallErrorKind::InvalidResponse => "invalid_response",
        }
    }
}

/// Uniform result of one reviewer call, success or failure.
///
/// Latency is recorded even on failure. `capture_path` points at the
/// diagnostic capture written for this call so an escalated failure can be
/// analyzed without re-running the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    pub reviewer: ReviewerId,
    pub mode: ReviewMode,
    /// Raw reviewer output; empty on failure
    pub content: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub latency_ms: u64,
    pub cost_cents: u64,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<CallErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// True when the backend could not report token counts and usage was
    /// estimated from the content length (legacy call path)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub usage_estimated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_path: Option<String>,
}

impl ReviewResult {
    /// Create a successful result
    pub fn success(
        reviewer: ReviewerId,
        mode: ReviewMode,
        content: impl Into<String>,
        tokens_in: u64,
        tokens_out: u64,
        latency_ms: u64,
        cost_cents: u64,
    ) -> Self {
        Self {
            reviewer,
            mode,
            content: content.into(),
            tokens_in,
            tokens_out,
            latency_ms,
            cost_cents,
            succeeded: true,
            error_kind: None,
            error_detail: None,
            usage_estimated: false,
            capture_path: None,
        }
    }

    /// Create a failed result with a classified error
    pub fn failure(
        reviewer: ReviewerId,
        mode: ReviewMode,
        kind: CallErrorKind,
        detail: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            reviewer,
            mode,
            content: String::new(),
            tokens_in: 0,
            tokens_out: 0,
            latency_ms,
            cost_cents: 0,
            succeeded: false,
            error_kind: Some(kind),
            error_detail: Some(detail.into()),
            usage_estimated: false,
            capture_path: None,
        }
    }

    pub fn with_capture_path(mut self, path: impl Into<String>) -> Self {
        self.capture_path = Some(path.into());
        self
    }

    pub fn with_estimated_usage(mut self) -> Self {
        self.usage_estimated = true;
        self
    }

    pub fn total_tokens(&self) -> u64 {
        self.tokens_in + self.tokens_out
    }
}
