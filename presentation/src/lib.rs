//! Presentation layer for codeswarm
//!
//! This crate contains CLI definitions, report formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress, describe_outcome};
