//! Infrastructure layer for council
//!
//! Adapters for the application ports: TOML/figment configuration loading,
//! the two reviewer call paths (structured direct JSON and legacy argv),
//! process adapters for the scoring/knowledge/red-team collaborators, and
//! the file-based diagnostic capture store with secret redaction.

pub mod capture;
pub mod collaborators;
pub mod config;
mod process;
pub mod reviewers;

// Re-export commonly used types
pub use capture::{redact::Redactor, store::FileCaptureStore};
pub use collaborators::{
    knowledge::CommandKnowledgeRetriever, red_team::CommandRedTeamPipeline,
    scoring::CommandScoringBackend,
};
pub use config::{
    file_config::{CallPath, CommandSpec, FileConfig},
    loader::ConfigLoader,
};
pub use reviewers::{
    direct::DirectProcessBackend,
    legacy::LegacyCliBackend,
    routing::{CommandRoster, RosterError},
};
