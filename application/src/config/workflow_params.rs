//! Workflow parameters.

use serde::{Deserialize, Serialize};

use super::loop_params::LoopParams;

/// Parameters for one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParams {
    /// Loop parameters shared by the scored agents.
    pub agent: LoopParams,
    /// Iterations per model for the vision agent.
    pub vision_max_iterations: u32,
    /// Patterns retrieved as context.
    pub rag_limit: usize,
    pub search_docs: bool,
    pub store_patterns: bool,
    pub deploy: bool,
    /// Name of the deployed project; derived from the task when absent.
    pub project_name: Option<String>,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            agent: LoopParams::default(),
            vision_max_iterations: 2,
            rag_limit: 5,
            search_docs: true,
            store_patterns: true,
            deploy: false,
            project_name: None,
        }
    }
}

impl WorkflowParams {
    // ==================== Builder Methods ====================

    pub fn with_agent(mut self, agent: LoopParams) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_vision_max_iterations(mut self, max: u32) -> Self {
        self.vision_max_iterations = max;
        self
    }

    pub fn with_search_docs(mut self, enabled: bool) -> Self {
        self.search_docs = enabled;
        self
    }

    pub fn with_store_patterns(mut self, enabled: bool) -> Self {
        self.store_patterns = enabled;
        self
    }

    pub fn with_deploy(mut self, deploy: bool) -> Self {
        self.deploy = deploy;
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Loop parameters for the vision agent.
    pub fn vision_params(&self) -> LoopParams {
        self.agent.with_max_iterations(self.vision_max_iterations)
    }
}
