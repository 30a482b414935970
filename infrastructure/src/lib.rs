//! Infrastructure layer for codeswarm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod attachments;
pub mod config;
pub mod deployment;
pub mod evaluation;
pub mod knowledge;
pub mod learning;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use attachments::{ImageLoadError, load_image};
pub use config::{
    ConfigLoader, FileAgentConfig, FileConfig, FileModelsConfig, FileOpenRouterConfig,
    FileOutputConfig, FileOutputFormat, FileProvidersConfig, FileRetryConfig, FileTavilyConfig,
    FileWorkflowConfig,
};
pub use deployment::LocalWorkspaceDeployer;
pub use evaluation::HeuristicEvaluator;
pub use knowledge::{JsonPatternStore, TavilySearch};
pub use learning::JsonRunLearner;
pub use logging::JsonlRunLogger;
pub use providers::OpenRouterProvider;
