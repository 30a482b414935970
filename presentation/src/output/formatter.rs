//! Output formatter trait

use swarm_domain::{OutputFormat, WorkflowReport};

/// Trait for formatting workflow reports
pub trait ReportFormatter {
    /// Format every agent output with code and reasoning
    fn format(&self, report: &WorkflowReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &WorkflowReport) -> String;

    /// Format scores, models and generated files only
    fn format_summary(&self, report: &WorkflowReport) -> String;

    /// Format in the requested output format
    fn render(&self, report: &WorkflowReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
