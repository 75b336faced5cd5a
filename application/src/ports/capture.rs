//! Diagnostic capture port
//!
//! Each reviewer call persists a capture of its raw response or error for
//! post-mortem, keyed by run + reviewer + mode so concurrent writers never
//! contend on the same record. This is separate from `tracing`: tracing
//! carries human-readable diagnostics, captures carry the machine-readable
//! raw material.
//!
//! `store` is intentionally synchronous and non-fallible so capture failures
//! never disrupt the call path — implementations warn and return `None`.

use council_domain::{ReviewMode, ReviewerId};

/// Key namespacing one capture record
#[derive(Debug, Clone, Copy)]
pub struct CaptureKey<'a> {
    pub run_id: &'a str,
    pub reviewer: &'a ReviewerId,
    pub mode: ReviewMode,
}

pub trait CaptureStore: Send + Sync {
    /// Persist a raw response/error body. Returns the capture path when one
    /// was written.
    fn store(&self, key: &CaptureKey<'_>, body: &str) -> Option<String>;
}

/// No-op store for tests and when capture is disabled.
pub struct NoCapture;

impl CaptureStore for NoCapture {
    fn store(&self, _key: &CaptureKey<'_>, _body: &str) -> Option<String> {
        None
    }
}
