//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod models;
mod output;
mod providers;
mod retry;
mod workflow;

pub use agent::FileAgentConfig;
pub use models::FileModelsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileOpenRouterConfig, FileProvidersConfig, FileTavilyConfig};
pub use retry::FileRetryConfig;
pub use workflow::FileWorkflowConfig;

use serde::{Deserialize, Serialize};
use swarm_application::WorkflowParams;
use swarm_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent loop thresholds and budgets
    pub agent: FileAgentConfig,
    /// Backoff for transient provider failures
    pub retry: FileRetryConfig,
    /// Per-category model sequence overrides
    pub models: FileModelsConfig,
    /// Provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Optional workflow steps
    pub workflow: FileWorkflowConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Workflow parameters before command-line overrides.
    pub fn to_workflow_params(&self) -> WorkflowParams {
        let mut params = WorkflowParams::default()
            .with_agent(self.agent.to_loop_params())
            .with_vision_max_iterations(self.agent.vision_max_iterations)
            .with_search_docs(self.workflow.doc_search)
            .with_store_patterns(self.workflow.store_patterns);
        params.rag_limit = self.workflow.rag_limit;
        params
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Agent thresholds and iteration budgets
    /// 2. Retry policy sanity
    /// 3. Model sequence overrides (category names, blank model names)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.agent.validate());
        issues.extend(self.retry.validate());
        issues.extend(self.models.to_roster().1);
        issues
    }
}
