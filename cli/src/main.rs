//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then maps the run's terminal status onto the
//! documented exit codes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use council_application::{
    CaptureStore, KnowledgeRetriever, ModeRouter, NoKnowledge, NoProgress, NoScoring,
    ProgressNotifier, RedTeamPipeline, ReviewerBackend, RunConfig, ScoringBackend,
};
use council_domain::{CouncilError, DocumentPhase, RunMode};
use council_infrastructure::{
    CallPath, CommandKnowledgeRetriever, CommandRedTeamPipeline, CommandRoster,
    CommandScoringBackend, ConfigLoader, DirectProcessBackend, FileCaptureStore, FileConfig,
    LegacyCliBackend, Redactor,
};
use council_presentation::{Cli, Commands, ConsoleFormatter, ProgressReporter, ReviewArgs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_CONFIG_ERROR: i32 = 1;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::ShowConfig => {
            ConfigLoader::print_config_sources();
            0
        }
        Commands::Review(ref args) => match run_review(&cli, args).await {
            Ok(code) => code,
            Err(error) => {
                eprintln!("error: {:#}", error);
                EXIT_CONFIG_ERROR
            }
        },
    }
}

async fn run_review(cli: &Cli, args: &ReviewArgs) -> Result<i32> {
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("could not load configuration")?
    };
    for issue in file_config.issues() {
        warn!("config: {}", issue);
    }

    let config = build_run_config(args, &file_config)?;
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Fail a broken roster before any call is dispatched
    let roster = CommandRoster::from_config(&file_config.council.commands);
    roster.verify(&config.reviewers)?;

    // Red-team mode cannot run without its collaborator
    let red_team_pipeline = match &file_config.collaborators.red_team {
        Some(spec) => CommandRedTeamPipeline::new(spec.clone()),
        None if config.mode == RunMode::RedTeam => {
            bail!("red-team mode requires a [collaborators.red_team] command")
        }
        None => CommandRedTeamPipeline::unconfigured(),
    };

    info!(
        mode = %config.mode,
        document = %config.document_ref,
        reviewers = config.reviewers.len(),
        "starting council run"
    );

    // === Dependency Injection ===
    let backend: Arc<dyn ReviewerBackend> = match file_config.council.call_path {
        CallPath::Direct => Arc::new(DirectProcessBackend::new(roster)),
        CallPath::Legacy => Arc::new(LegacyCliBackend::new(roster)),
    };

    let redactor = Redactor::from_env_vars(&file_config.capture.secret_env_vars);
    let capture: Arc<dyn CaptureStore> = Arc::new(FileCaptureStore::new(
        capture_dir(&file_config),
        file_config.capture.max_bytes,
        redactor,
    ));

    let collaborator_timeout = config.call_timeout;
    let scoring: Arc<dyn ScoringBackend> = match &file_config.collaborators.scoring {
        Some(spec) => Arc::new(CommandScoringBackend::new(spec.clone(), collaborator_timeout)),
        None => Arc::new(NoScoring),
    };
    let knowledge: Arc<dyn KnowledgeRetriever> = match &file_config.collaborators.knowledge {
        Some(spec) => Arc::new(CommandKnowledgeRetriever::new(
            spec.clone(),
            collaborator_timeout,
        )),
        None => Arc::new(NoKnowledge),
    };
    let red_team: Arc<dyn RedTeamPipeline> = Arc::new(red_team_pipeline);

    let router = ModeRouter::new(backend, capture, scoring, knowledge, red_team);

    let progress: Box<dyn ProgressNotifier> = if args.quiet || args.json {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let report = match router.dispatch(&config, progress.as_ref()).await {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error: {}", error);
            return Ok(exit_code_for(&error));
        }
    };

    let output = if args.json {
        ConsoleFormatter::format_json(&report)
    } else {
        ConsoleFormatter::format(&report)
    };
    println!("{}", output);

    Ok(report.exit_code() as i32)
}

fn build_run_config(args: &ReviewArgs, file_config: &FileConfig) -> Result<RunConfig> {
    // Unknown modes and phases fail here, before any budget is spent
    let mode: RunMode = args.mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let doc_phase: DocumentPhase = args.phase.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    if !args.doc.exists() {
        bail!("document not found: {}", args.doc.display());
    }
    let document_ref = args.doc.to_string_lossy().into_owned();

    let reviewers = file_config.reviewer_ids();
    let quorum = file_config.quorum_thresholds(reviewers.len());

    let mut config = RunConfig::new(mode, document_ref, doc_phase, reviewers)
        .with_deadline(Duration::from_secs(
            args.timeout.unwrap_or(file_config.timeouts.deadline_secs),
        ))
        .with_call_timeout(Duration::from_secs(file_config.timeouts.call_timeout_secs))
        .with_budget_ceiling_cents(args.budget.unwrap_or(file_config.budget.ceiling_cents))
        .with_estimated_call_cost_cents(file_config.budget.estimated_call_cost_cents)
        .with_stagger(Duration::from_millis(file_config.timeouts.stagger_ms))
        .with_quorum(quorum)
        .with_pricing(file_config.pricing_table())
        .with_skip_knowledge(args.skip_knowledge)
        .with_skip_consensus(args.skip_consensus);
    config.acceptance_threshold = file_config.consensus.acceptance_threshold;

    Ok(config)
}

fn capture_dir(file_config: &FileConfig) -> PathBuf {
    if let Some(dir) = &file_config.capture.dir {
        return PathBuf::from(dir);
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("council")
        .join("captures")
}

/// Errors escaping the router (the use cases normally fold failures into the
/// report's status) still map onto the documented exit codes.
fn exit_code_for(error: &CouncilError) -> i32 {
    match error {
        CouncilError::Configuration(_) | CouncilError::Orchestration(_) => EXIT_CONFIG_ERROR,
        CouncilError::QuorumFailure { .. } => 3,
        CouncilError::DeadlineExceeded { .. } => 4,
        CouncilError::BudgetExceeded { .. } => 5,
    }
}
