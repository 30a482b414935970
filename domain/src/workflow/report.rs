//! Final result of a workflow run.

use serde::Serialize;

use crate::agent::output::AgentOutput;
use crate::project::deployment::DeploymentReceipt;
use crate::selection::category::TaskCategory;

use super::context::TestingStage;

/// Aggregated outcome of one workflow run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub task: String,
    pub category: TaskCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<AgentOutput>,
    pub architecture: AgentOutput,
    pub implementation: AgentOutput,
    pub security: AgentOutput,
    pub testing: AgentOutput,
    pub rag_patterns_used: usize,
    pub documentation_results: usize,
    pub avg_score: f64,
    pub quality_threshold: f64,
    pub threshold_met: bool,
    /// Id under which the run was stored as a pattern.
    pub pattern_id: Option<String>,
    pub deployment: Option<DeploymentReceipt>,
    pub elapsed_ms: u64,
}

impl WorkflowReport {
    /// Aggregate a finished pipeline. Persistence and deployment results are
    /// attached afterwards.
    pub fn aggregate(stage: TestingStage, quality_threshold: f64, elapsed_ms: u64) -> Self {
        let avg_score = stage.average_score();
        let research = stage.research();
        Self {
            task: research.task().to_string(),
            category: research.category(),
            rag_patterns_used: research.rag_patterns().len(),
            documentation_results: research.documentation().map_or(0, |d| d.results.len()),
            vision: stage.vision().cloned(),
            architecture: stage.architecture().clone(),
            implementation: stage.implementation().clone(),
            security: stage.security().clone(),
            testing: stage.testing().clone(),
            avg_score,
            quality_threshold,
            threshold_met: avg_score >= quality_threshold,
            pattern_id: None,
            deployment: None,
            elapsed_ms,
        }
    }

    /// The four scored outputs in pipeline order.
    pub fn scored_outputs(&self) -> [&AgentOutput; 4] {
        [
            &self.architecture,
            &self.implementation,
            &self.security,
            &self.testing,
        ]
    }

    /// Total quality iterations across all agents.
    pub fn total_iterations(&self) -> u32 {
        self.scored_outputs()
            .iter()
            .map(|o| o.iterations_used())
            .chain(self.vision.iter().map(|v| v.iterations_used()))
            .sum()
    }
}
