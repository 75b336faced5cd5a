//! Reviewer invoker
//!
//! Performs one bounded call to the reviewer backend: enforces the per-call
//! timeout over all I/O, records latency on success and failure alike,
//! classifies failures, prices actual usage, and persists a diagnostic
//! capture of the raw response or error.

use crate::ports::capture::{CaptureKey, CaptureStore};
use crate::ports::reviewer_backend::{BackendCall, ReviewerBackend};
use council_domain::{CallErrorKind, PricingTable, ReviewRequest, ReviewResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ReviewerInvoker {
    backend: Arc<dyn ReviewerBackend>,
    capture: Arc<dyn CaptureStore>,
    pricing: PricingTable,
}

impl ReviewerInvoker {
    pub fn new(
        backend: Arc<dyn ReviewerBackend>,
        capture: Arc<dyn CaptureStore>,
        pricing: PricingTable,
    ) -> Self {
        Self {
            backend,
            capture,
            pricing,
        }
    }

    /// Invoke one reviewer call. Never exceeds `request.timeout_ms` and
    /// never panics; every outcome becomes a [`ReviewResult`].
    pub async fn invoke(&self, run_id: &str, request: &ReviewRequest) -> ReviewResult {
        let call = BackendCall {
            reviewer: request.reviewer.clone(),
            mode: request.mode,
            input_ref: request.document_ref.clone(),
            system_context_ref: request.context_ref.clone(),
            timeout_ms: request.timeout_ms,
        };
        let key = CaptureKey {
            run_id,
            reviewer: &request.reviewer,
            mode: request.mode,
        };

        let started = Instant::now();
        let bounded = tokio::time::timeout(
            Duration::from_millis(request.timeout_ms),
            self.backend.complete(&call),
        )
        .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match bounded {
            Ok(Ok(reply)) => {
                let capture_path = self.capture.store(&key, &reply.content);

                let cost_cents = match self.pricing.cost_cents(
                    &request.reviewer,
                    reply.usage.input_tokens,
                    reply.usage.output_tokens,
                ) {
                    Some(cents) => cents,
                    None => {
                        warn!(
                            reviewer = %request.reviewer,
                            "no pricing entry, recording zero cost"
                        );
                        0
                    }
                };

                debug!(
                    reviewer = %request.reviewer,
                    mode = %request.mode,
                    latency_ms,
                    cost_cents,
                    "reviewer call succeeded"
                );

                let mut result = ReviewResult::success(
                    request.reviewer.clone(),
                    request.mode,
                    reply.content,
                    reply.usage.input_tokens,
                    reply.usage.output_tokens,
                    latency_ms,
                    cost_cents,
                );
                if reply.usage.estimated {
                    result = result.with_estimated_usage();
                }
                if let Some(path) = capture_path {
                    result = result.with_capture_path(path);
                }
                result
            }
            Ok(Err(error)) => {
                let detail = error.to_string();
                let capture_path = self.capture.store(&key, &detail);
                warn!(
                    reviewer = %request.reviewer,
                    mode = %request.mode,
                    latency_ms,
                    error = %detail,
                    "reviewer call failed"
                );

                let mut result = ReviewResult::failure(
                    request.reviewer.clone(),
                    request.mode,
                    error.kind(),
                    detail,
                    latency_ms,
                );
                if let Some(path) = capture_path {
                    result = result.with_capture_path(path);
                }
                result
            }
            Err(_elapsed) => {
                let detail = format!("no reply within {}ms", request.timeout_ms);
                let capture_path = self.capture.store(&key, &detail);
                warn!(
                    reviewer = %request.reviewer,
                    mode = %request.mode,
                    latency_ms,
                    "reviewer call timed out"
                );

                let mut result = ReviewResult::failure(
                    request.reviewer.clone(),
                    request.mode,
                    CallErrorKind::Timeout,
                    detail,
                    latency_ms,
                );
                if let Some(path) = capture_path {
                    result = result.with_capture_path(path);
                }
                result
            }
        }
    }
}
