//! Command adapters for the external collaborators
//!
//! Scoring, knowledge retrieval, and the red-team pipeline are separate
//! services invoked as commands: JSON request on stdin, JSON reply on
//! stdout. The engine owns nothing behind these boundaries.

pub mod knowledge;
pub mod red_team;
pub mod scoring;
