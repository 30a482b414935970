//! CLI entrypoint for CodeSwarm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use swarm_application::{
    ExecuteAgentUseCase, NoProgress, NoRunLogger, RunLearner, RunLogger, RunWorkflowInput,
    RunWorkflowUseCase, WorkflowParams, WorkflowProgressNotifier,
};
use swarm_domain::OutputFormat;
use swarm_infrastructure::{
    ConfigLoader, FileConfig, HeuristicEvaluator, JsonPatternStore, JsonRunLearner,
    JsonlRunLogger, LocalWorkspaceDeployer, OpenRouterProvider, TavilySearch, load_image,
};
use swarm_presentation::{Cli, ConsoleFormatter, ProgressReporter, ReportFormatter, SimpleProgress};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Console logging to stderr, plus a daily-rotated file when requested.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the program exits.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "codeswarm.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Workflow parameters from the config with command-line overrides applied.
fn workflow_params(cli: &Cli, config: &FileConfig) -> WorkflowParams {
    let mut params = config.to_workflow_params();
    if let Some(threshold) = cli.threshold {
        params.agent = params.agent.with_quality_threshold(threshold);
    }
    if let Some(max) = cli.max_iterations {
        params.agent = params.agent.with_max_iterations(max);
    }
    if cli.no_docs {
        params.search_docs = false;
    }
    if cli.no_store {
        params.store_patterns = false;
    }
    params = params.with_deploy(cli.deploy);
    if let Some(name) = &cli.project_name {
        params = params.with_project_name(name.clone());
    }
    params
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration");
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    if cli.stats {
        let dir = config
            .workflow
            .resolved_learning_dir()
            .context("No data directory available for the learning history")?;
        let summary = JsonRunLearner::new(dir).performance_summary().await?;
        println!("{}", ConsoleFormatter::format_performance(&summary));
        return Ok(());
    }

    let task = match cli.task.as_deref().map(str::trim) {
        Some(task) if !task.is_empty() => task.to_string(),
        _ => bail!("A task description is required. See --help for examples."),
    };

    info!("Starting CodeSwarm");
    let params = workflow_params(&cli, &config);
    debug!("Workflow parameters: {:?}", params);

    // === Dependency Injection ===
    let openrouter = &config.providers.openrouter;
    let api_key = openrouter.resolve_api_key().with_context(|| {
        format!(
            "No OpenRouter API key. Set {} or providers.openrouter.api_key",
            openrouter.api_key_env
        )
    })?;
    let provider = Arc::new(OpenRouterProvider::new(
        api_key,
        &openrouter.base_url,
        Duration::from_secs(openrouter.timeout_secs),
    )?);

    let logger: Arc<dyn RunLogger> = match cli.transcript.as_ref().or(config.output.transcript.as_ref()) {
        Some(path) => match JsonlRunLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoRunLogger),
        },
        None => Arc::new(NoRunLogger),
    };

    let (roster, _) = config.models.to_roster();
    let agents = ExecuteAgentUseCase::new(provider, Arc::new(HeuristicEvaluator))
        .with_roster(roster)
        .with_retry_policy(config.retry.to_retry_policy())
        .with_logger(logger.clone());

    let mut use_case = RunWorkflowUseCase::new(agents)
        .with_logger(logger)
        .with_deployer(Arc::new(LocalWorkspaceDeployer::new(
            config.workflow.deploy_dir.clone(),
        )));

    match config.workflow.resolved_pattern_store_path() {
        Some(path) => {
            use_case = use_case.with_pattern_store(Arc::new(JsonPatternStore::new(path)));
        }
        None => warn!("No data directory available, pattern storage disabled"),
    }

    if config.workflow.learning && !cli.no_learn {
        match config.workflow.resolved_learning_dir() {
            Some(dir) => use_case = use_case.with_learner(Arc::new(JsonRunLearner::new(dir))),
            None => warn!("No data directory available, learning disabled"),
        }
    }

    let tavily = &config.providers.tavily;
    match tavily.resolve_api_key() {
        Some(key) => {
            let search = TavilySearch::new(key, &tavily.base_url).with_max_results(tavily.max_results);
            use_case = use_case.with_doc_search(Arc::new(search));
        }
        None if params.search_docs => {
            info!("{} not set, documentation search disabled", tavily.api_key_env)
        }
        None => {}
    }

    let image = match &cli.image {
        Some(path) => Some(
            load_image(path)
                .await
                .with_context(|| format!("Failed to load image {}", path.display()))?,
        ),
        None => None,
    };

    let input = RunWorkflowInput::new(task)
        .with_image(image)
        .with_params(params);

    // Execute with the requested progress style
    let progress: Box<dyn WorkflowProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if cli.verbose > 0 {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let report = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;
    drop(progress);

    // Output results
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&report, format));

    Ok(())
}
