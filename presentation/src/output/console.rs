//! Console output formatter for workflow reports

use crate::output::formatter::ReportFormatter;
use colored::{ColoredString, Colorize};
use swarm_domain::{AgentOutput, ConfigIssue, PerformanceSummary, Severity, WorkflowReport};

/// Formats workflow reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &WorkflowReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("CodeSwarm Results"));
        output.push('\n');
        output.push_str(&Self::task_block(report));

        if let Some(vision) = &report.vision {
            output.push_str(&Self::section_header("Vision Analysis"));
            output.push_str(&Self::agent_block(vision, report.quality_threshold));
        }
        for agent in report.scored_outputs() {
            output.push_str(&Self::section_header(agent.role().display_name()));
            output.push_str(&Self::agent_block(agent, report.quality_threshold));
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::summary_block(report));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &WorkflowReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format scores, models and generated files only
    pub fn format_summary(report: &WorkflowReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== CodeSwarm ===".cyan().bold()));
        output.push_str(&Self::task_block(report));

        for agent in report.vision.iter().chain(report.scored_outputs()) {
            output.push_str(&format!(
                "  {:<22} {:>6}  {} ({} iteration{})\n",
                agent.role().display_name(),
                Self::score(agent.quality_score(), report.quality_threshold),
                agent.model_used().to_string().dimmed(),
                agent.iterations_used(),
                if agent.iterations_used() == 1 { "" } else { "s" }
            ));
        }
        output.push('\n');
        output.push_str(&Self::summary_block(report));

        output
    }

    /// Render configuration issues, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());
        sorted
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the learning history summary
    pub fn format_performance(summary: &PerformanceSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== CodeSwarm Performance ===".cyan().bold()));
        output.push_str(&format!(
            "{} {}  {} {}\n\n",
            "Runs:".bold(),
            summary.total_runs,
            "Strategies:".bold(),
            summary.strategies_learned
        ));

        if summary.agents.is_empty() {
            output.push_str(&format!("{}\n", "No runs recorded yet.".dimmed()));
        }
        for (agent, perf) in &summary.agents {
            output.push_str(&format!(
                "  {:<16} {:>6.1}% correct  avg {:>5.1}  {:>7.0}ms  ({} samples)\n",
                agent,
                perf.accuracy * 100.0,
                perf.avg_score,
                perf.avg_latency_ms,
                perf.samples
            ));
        }

        if !summary.suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in &summary.suggestions {
                output.push_str(&format!("  - {}\n", suggestion));
            }
        }

        output
    }

    fn task_block(report: &WorkflowReport) -> String {
        format!(
            "{} {}\n{} {}\n\n",
            "Task:".cyan().bold(),
            report.task,
            "Category:".cyan().bold(),
            report.category
        )
    }

    fn agent_block(agent: &AgentOutput, threshold: f64) -> String {
        let mut block = format!(
            "{} {}  {} {}  {} {}  {} {}ms\n",
            "Model:".bold(),
            agent.model_used(),
            "Score:".bold(),
            Self::score(agent.quality_score(), threshold),
            "Iterations:".bold(),
            agent.iterations_used(),
            "Latency:".bold(),
            agent.latency_ms()
        );
        if !agent.reasoning().is_empty() {
            block.push_str(&format!(
                "\n{}\n{}\n",
                "Reasoning:".yellow().bold(),
                Self::indent(agent.reasoning().trim(), "  ")
            ));
        }
        if let Some(files) = agent.parsed_files() {
            block.push_str(&format!("\n{}\n", "Files:".yellow().bold()));
            for (path, content) in files.iter() {
                block.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", path).green().bold(),
                    content.trim_end()
                ));
            }
        } else if !agent.code().is_empty() {
            block.push_str(&format!(
                "\n{}\n{}\n",
                "Output:".yellow().bold(),
                agent.code().trim_end()
            ));
        }
        block
    }

    fn summary_block(report: &WorkflowReport) -> String {
        let mut block = String::new();

        let verdict = if report.threshold_met {
            "threshold met".green().bold()
        } else {
            "below threshold".yellow().bold()
        };
        block.push_str(&format!(
            "{} {:.1} / {:.1} ({})\n",
            "Average score:".bold(),
            report.avg_score,
            report.quality_threshold,
            verdict
        ));
        block.push_str(&format!(
            "{} {} iterations, {:.1}s, {} patterns, {} docs\n",
            "Run:".bold(),
            report.total_iterations(),
            report.elapsed_ms as f64 / 1000.0,
            report.rag_patterns_used,
            report.documentation_results
        ));

        match report.implementation.parsed_files() {
            Some(files) => {
                block.push_str(&format!("{} {}\n", "Files:".bold(), files.len()));
                for path in files.paths() {
                    block.push_str(&format!("  {}\n", path));
                }
            }
            None => block.push_str(&format!(
                "{} {}\n",
                "Files:".bold(),
                "single-file output (not deployable)".dimmed()
            )),
        }

        if let Some(id) = &report.pattern_id {
            block.push_str(&format!("{} {}\n", "Stored pattern:".bold(), id));
        }
        if let Some(deployment) = &report.deployment {
            block.push_str(&format!(
                "{} {} ({} files)\n",
                "Deployed to:".green().bold(),
                deployment.location,
                deployment.files_written
            ));
            if let Some(command) = &deployment.run_command {
                block.push_str(&format!("{} {}\n", "Run:".bold(), command));
            }
            if let Some(url) = &deployment.preview_url {
                block.push_str(&format!("{} {}\n", "Preview:".bold(), url.underline()));
            }
        }

        block
    }

    fn score(score: Option<f64>, threshold: f64) -> ColoredString {
        match score {
            Some(s) if s >= threshold => format!("{:.1}", s).green(),
            Some(s) => format!("{:.1}", s).yellow(),
            None => "-".dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &WorkflowReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &WorkflowReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &WorkflowReport) -> String {
        Self::format_summary(report)
    }
}
