//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application-layer
//! values (`QuorumThresholds`, `PricingTable`) via the helpers below.

use council_application::QuorumThresholds;
use council_domain::{PricingTable, ReviewerId, ReviewerPricing};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which reviewer call path the backend adapters use.
///
/// Both paths normalize into the same reply shape, so everything above the
/// adapter is path-agnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPath {
    /// JSON request on stdin, JSON reply on stdout
    #[default]
    Direct,
    /// Prompt as argv, plain-text stdout, estimated usage
    Legacy,
}

/// An external command with its fixed arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Council roster and reviewer command wiring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Reviewer ids, in call order
    pub reviewers: Vec<String>,
    pub call_path: CallPath,
    /// Reviewer id -> command that backs it
    pub commands: HashMap<String, CommandSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    pub ceiling_cents: u64,
    /// Pre-phase admission estimate per call
    pub estimated_call_cost_cents: u64,
}

impl Default for FileBudgetConfig {
    fn default() -> Self {
        Self {
            ceiling_cents: 500,
            estimated_call_cost_cents: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    /// Cumulative wall-clock deadline over all phases
    pub deadline_secs: u64,
    /// Hard per-call bound including all I/O
    pub call_timeout_secs: u64,
    /// Delay between wave launches; zero disables waves
    pub stagger_ms: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 600,
            call_timeout_secs: 120,
            stagger_ms: 0,
        }
    }
}

/// Per-phase quorum minimum overrides.
///
/// Unset fields fall back to the roster-size defaults; the minimum is always
/// explicit configuration by the time a phase runs, never inferred from call
/// counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    pub phase1: Option<usize>,
    pub phase2: Option<usize>,
    pub inquiry: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Cross-score acceptance threshold on the 1-10 scale
    pub acceptance_threshold: f64,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 6.0,
        }
    }
}

/// Pricing for one reviewer, integer cents per megatoken
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePricingEntry {
    pub input_cents_per_mtok: u64,
    pub output_cents_per_mtok: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCaptureConfig {
    /// Capture directory; defaults to the platform state dir
    pub dir: Option<String>,
    /// Size cap per capture record body
    pub max_bytes: usize,
    /// Env vars whose values are redacted from captures
    pub secret_env_vars: Vec<String>,
}

impl Default for FileCaptureConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_bytes: 64 * 1024,
            secret_env_vars: Vec::new(),
        }
    }
}

/// Commands backing the external collaborators. All optional: an
/// unconfigured collaborator degrades to its no-op behavior (or a
/// configuration error for red-team mode, which cannot run without one).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCollaboratorsConfig {
    pub scoring: Option<CommandSpec>,
    pub knowledge: Option<CommandSpec>,
    pub red_team: Option<CommandSpec>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub council: FileCouncilConfig,
    pub budget: FileBudgetConfig,
    pub timeouts: FileTimeoutsConfig,
    pub quorum: FileQuorumConfig,
    pub consensus: FileConsensusConfig,
    /// Reviewer id -> pricing
    pub pricing: HashMap<String, FilePricingEntry>,
    pub capture: FileCaptureConfig,
    pub collaborators: FileCollaboratorsConfig,
}

impl FileConfig {
    pub fn reviewer_ids(&self) -> Vec<ReviewerId> {
        self.council
            .reviewers
            .iter()
            .map(ReviewerId::new)
            .collect()
    }

    /// Quorum minimums: configured overrides, roster-size defaults otherwise.
    pub fn quorum_thresholds(&self, roster_size: usize) -> QuorumThresholds {
        let defaults = QuorumThresholds::for_roster(roster_size);
        QuorumThresholds {
            phase1: self.quorum.phase1.unwrap_or(defaults.phase1),
            phase2: self.quorum.phase2.unwrap_or(defaults.phase2),
            inquiry: self.quorum.inquiry.unwrap_or(defaults.inquiry),
        }
    }

    pub fn pricing_table(&self) -> PricingTable {
        let mut table = PricingTable::new();
        for (reviewer, entry) in &self.pricing {
            table.insert(
                ReviewerId::new(reviewer),
                ReviewerPricing::new(entry.input_cents_per_mtok, entry.output_cents_per_mtok),
            );
        }
        table
    }

    /// Non-fatal configuration issues. Hard errors (empty roster, missing
    /// commands) surface later from `RunConfig::validate` and the roster.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for reviewer in &self.council.reviewers {
            if !self.pricing.contains_key(reviewer) {
                issues.push(format!(
                    "no [pricing.\"{}\"] entry; calls by this reviewer record zero cost",
                    reviewer
                ));
            }
        }

        for reviewer in self.council.commands.keys() {
            if !self.council.reviewers.contains(reviewer) {
                issues.push(format!(
                    "[council.commands] has an entry for '{}' which is not in the roster",
                    reviewer
                ));
            }
        }

        if self.collaborators.scoring.is_none() {
            issues.push(
                "no [collaborators.scoring] command; consensus reports classification only"
                    .to_string(),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[council]
reviewers = ["claude-sonnet-4.5", "gpt-5.2-codex"]
call_path = "legacy"

[council.commands."claude-sonnet-4.5"]
program = "claude-review"
args = ["--plain"]

[budget]
ceiling_cents = 100
estimated_call_cost_cents = 10

[timeouts]
deadline_secs = 120
stagger_ms = 500

[quorum]
phase1 = 2

[pricing."claude-sonnet-4.5"]
input_cents_per_mtok = 300
output_cents_per_mtok = 1500

[collaborators.scoring]
program = "council-score"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.council.reviewers.len(), 2);
        assert_eq!(config.council.call_path, CallPath::Legacy);
        assert_eq!(
            config.council.commands["claude-sonnet-4.5"].program,
            "claude-review"
        );
        assert_eq!(config.budget.ceiling_cents, 100);
        assert_eq!(config.timeouts.deadline_secs, 120);
        assert_eq!(config.timeouts.stagger_ms, 500);
        assert_eq!(config.quorum.phase1, Some(2));
        assert_eq!(config.collaborators.scoring.unwrap().program, "council-score");
        // Defaults apply to omitted fields
        assert_eq!(config.timeouts.call_timeout_secs, 120);
        assert_eq!(config.consensus.acceptance_threshold, 6.0);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.council.reviewers.is_empty());
        assert_eq!(config.council.call_path, CallPath::Direct);
        assert_eq!(config.budget.ceiling_cents, 500);
        assert_eq!(config.capture.max_bytes, 64 * 1024);
    }

    #[test]
    fn test_quorum_thresholds_fall_back_to_roster_defaults() {
        let mut config = FileConfig::default();
        config.council.reviewers =
            vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let thresholds = config.quorum_thresholds(3);
        assert_eq!(thresholds.phase1, 2);
        assert_eq!(thresholds.inquiry, 2);

        config.quorum.phase1 = Some(3);
        let thresholds = config.quorum_thresholds(3);
        assert_eq!(thresholds.phase1, 3);
        assert_eq!(thresholds.phase2, 3);
    }

    #[test]
    fn test_pricing_table_conversion() {
        let mut config = FileConfig::default();
        config.pricing.insert(
            "claude-sonnet-4.5".to_string(),
            FilePricingEntry {
                input_cents_per_mtok: 300,
                output_cents_per_mtok: 1500,
            },
        );

        let table = config.pricing_table();
        let cost = table
            .cost_cents(&ReviewerId::new("claude-sonnet-4.5"), 2_000_000, 1_000_000)
            .unwrap();
        assert_eq!(cost, 2100);
        assert!(table.get(&ReviewerId::new("unknown")).is_none());
    }

    #[test]
    fn test_issues_flag_missing_pricing_and_orphan_commands() {
        let mut config = FileConfig::default();
        config.council.reviewers = vec!["a".to_string()];
        config
            .council
            .commands
            .insert("b".to_string(), CommandSpec::new("b-review"));

        let issues = config.issues();
        assert!(issues.iter().any(|i| i.contains("pricing")));
        assert!(issues.iter().any(|i| i.contains("not in the roster")));
    }
}
