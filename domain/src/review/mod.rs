//! Review call entities
//!
//! One [`ReviewRequest`] is created per reviewer call, one [`ReviewResult`]
//! comes back per call (success or classified failure), and a phase's results
//! are joined into a [`PhaseOutcome`] governed by a quorum minimum.

pub mod outcome;
pub mod request;
pub mod result;

pub use outcome::PhaseOutcome;
pub use request::{ReviewMode, ReviewRequest};
pub use result::{CallErrorKind, ReviewResult};
