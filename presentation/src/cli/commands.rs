//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(version, about = "Review council - independent reviewers converge on a plan assessment")]
#[command(long_about = r#"
Council dispatches a set of independent reviewers against a planning document
and merges their reviews, cross-scores, and skeptic findings into one
classified, ranked assessment.

Modes:
  review    independent reviews -> cross-scoring -> consensus
  red-team  delegate to the external attack-surface pipeline
  inquiry   three perspective queries (structural, historical, governance)

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/council/config.toml   Global config

Exit codes:
  0 success    1 configuration error       2 knowledge retrieval failed
  3 all calls failed    4 deadline exceeded    5 budget exceeded
  6 partial success (degraded)

Example:
  council review --doc docs/prd.md --phase prd
  council review --doc docs/sdd.md --phase sdd --mode inquiry --budget 200
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the review council against a document
    Review(ReviewArgs),

    /// Show configuration file locations and exit
    ShowConfig,
}

#[derive(clap::Args, Debug)]
pub struct ReviewArgs {
    /// Document to review
    #[arg(long, value_name = "PATH")]
    pub doc: PathBuf,

    /// Kind of planning artifact: prd, sdd, sprint, beads, spec
    #[arg(long)]
    pub phase: String,

    /// Pipeline: review, red-team, inquiry
    #[arg(long, default_value = "review")]
    pub mode: String,

    /// Cumulative wall-clock deadline in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Budget ceiling in cents (overrides config)
    #[arg(long, value_name = "CENTS")]
    pub budget: Option<u64>,

    /// Skip the knowledge retrieval phase
    #[arg(long)]
    pub skip_knowledge: bool,

    /// Skip cross-scoring and consensus; emit raw reviews only
    #[arg(long)]
    pub skip_consensus: bool,

    /// Emit the report as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "council", "review", "--doc", "docs/prd.md", "--phase", "prd", "--mode", "inquiry",
            "--budget", "200", "--skip-knowledge", "--json",
        ])
        .unwrap();

        let Commands::Review(args) = cli.command else {
            panic!("expected review subcommand");
        };
        assert_eq!(args.doc, PathBuf::from("docs/prd.md"));
        assert_eq!(args.phase, "prd");
        assert_eq!(args.mode, "inquiry");
        assert_eq!(args.budget, Some(200));
        assert!(args.skip_knowledge);
        assert!(!args.skip_consensus);
        assert!(args.json);
    }

    #[test]
    fn test_mode_defaults_to_review() {
        let cli = Cli::try_parse_from(["council", "review", "--doc", "d.md", "--phase", "sdd"])
            .unwrap();
        let Commands::Review(args) = cli.command else {
            panic!("expected review subcommand");
        };
        assert_eq!(args.mode, "review");
        assert!(args.timeout.is_none());
    }

    #[test]
    fn test_doc_and_phase_required() {
        assert!(Cli::try_parse_from(["council", "review", "--phase", "prd"]).is_err());
        assert!(Cli::try_parse_from(["council", "review", "--doc", "d.md"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "council", "-vv", "--config", "custom.toml", "show-config",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::ShowConfig));
    }
}
