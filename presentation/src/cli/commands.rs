//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for workflow reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every agent output with code and reasoning
    Full,
    /// Scores, models and the generated file list
    Summary,
    /// JSON report
    Json,
}

impl From<OutputFormat> for swarm_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => swarm_domain::OutputFormat::Full,
            OutputFormat::Summary => swarm_domain::OutputFormat::Summary,
            OutputFormat::Json => swarm_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for codeswarm
#[derive(Parser, Debug)]
#[command(name = "codeswarm")]
#[command(author, version, about = "Multi-agent, quality-gated code generation")]
#[command(long_about = r#"
CodeSwarm turns a task description into a working project.

Specialized agents run in sequence: architecture, then implementation and
security in parallel, then testing. Each output is scored; agents retry with
feedback until the quality threshold is met and switch to another model when
progress stalls. The implementation must form a complete multi-file project
before it can be deployed.

Configuration files are loaded from (in priority order):
1. CODESWARM_* environment variables
2. --config <path>      Explicit config file
3. ./codeswarm.toml     Project-level config
4. ~/.config/codeswarm/config.toml   Global config

Example:
  codeswarm "Build a landing page for a coffee shop"
  codeswarm --image mockup.png --deploy "Implement this dashboard design"
  codeswarm -o json --threshold 85 "REST API for a todo list with SQLite"
"#)]
pub struct Cli {
    /// What to build (not required with --show-config)
    pub task: Option<String>,

    /// Design mockup or screenshot analyzed by the vision agent
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Write the generated project to the deploy directory
    #[arg(long)]
    pub deploy: bool,

    /// Project directory name used with --deploy (derived from the task by default)
    #[arg(long, value_name = "NAME")]
    pub project_name: Option<String>,

    /// Skip the documentation search
    #[arg(long)]
    pub no_docs: bool,

    /// Do not store successful runs as patterns
    #[arg(long)]
    pub no_store: bool,

    /// Quality threshold (0-100) each agent aims for
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Quality iterations per model
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Output format (defaults to the configured format, then summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write daily-rotated diagnostic logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write a JSONL transcript of the run to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Do not record this run in the learning history
    #[arg(long)]
    pub no_learn: bool,

    /// Show per-agent performance from past runs and exit
    #[arg(long)]
    pub stats: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "codeswarm",
            "--image",
            "mockup.png",
            "--deploy",
            "--no-docs",
            "--threshold",
            "85",
            "--max-iterations",
            "2",
            "-o",
            "json",
            "-vv",
            "Build a landing page",
        ])
        .unwrap();
        assert_eq!(cli.task.as_deref(), Some("Build a landing page"));
        assert_eq!(cli.image, Some(PathBuf::from("mockup.png")));
        assert!(cli.deploy);
        assert!(cli.no_docs);
        assert_eq!(cli.threshold, Some(85.0));
        assert_eq!(cli.max_iterations, Some(2));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["codeswarm", "todo app"]).unwrap();
        assert_eq!(cli.output, None);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.deploy);
        assert!(cli.transcript.is_none());
        assert!(!cli.no_learn);
        assert!(!cli.stats);
    }

    #[test]
    fn test_stats_needs_no_task() {
        let cli = Cli::try_parse_from(["codeswarm", "--stats"]).unwrap();
        assert!(cli.stats);
        assert!(cli.task.is_none());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            swarm_domain::OutputFormat::from(OutputFormat::Summary),
            swarm_domain::OutputFormat::Summary
        );
    }
}
