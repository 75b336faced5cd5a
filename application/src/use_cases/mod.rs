//! Use cases
//!
//! - [`route`]: mode router dispatching to one of the three pipelines
//! - [`run_review`]: the review phase controller
//! - [`run_inquiry`]: three-perspective inquiry pipeline
//! - [`run_red_team`]: envelope around the delegated red-team pipeline
//! - [`scatter`]: the scatter-gather executor (the only spawner of
//!   concurrent work)
//! - [`invoke`]: one bounded reviewer call with capture and cost accounting

pub mod invoke;
pub mod route;
pub mod run_inquiry;
pub mod run_red_team;
pub mod run_review;
pub mod scatter;
