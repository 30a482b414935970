//! Progress notification port
//!
//! Defines the interface for reporting progress during a workflow run.

use swarm_domain::{AgentOutput, AgentRole, Model, ValidationFailure};

use super::completion::ProviderError;

/// Top-level steps of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStage {
    PatternRetrieval,
    DocumentationSearch,
    VisionAnalysis,
    Architecture,
    ImplementationAndSecurity,
    Testing,
    Aggregation,
    Deployment,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::PatternRetrieval => "pattern_retrieval",
            WorkflowStage::DocumentationSearch => "documentation_search",
            WorkflowStage::VisionAnalysis => "vision_analysis",
            WorkflowStage::Architecture => "architecture",
            WorkflowStage::ImplementationAndSecurity => "implementation_and_security",
            WorkflowStage::Testing => "testing",
            WorkflowStage::Aggregation => "aggregation",
            WorkflowStage::Deployment => "deployment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowStage::PatternRetrieval => "Retrieving similar patterns",
            WorkflowStage::DocumentationSearch => "Searching documentation",
            WorkflowStage::VisionAnalysis => "Analyzing design",
            WorkflowStage::Architecture => "Designing architecture",
            WorkflowStage::ImplementationAndSecurity => "Implementing and hardening",
            WorkflowStage::Testing => "Generating tests",
            WorkflowStage::Aggregation => "Aggregating scores",
            WorkflowStage::Deployment => "Deploying project",
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What happened in one quality iteration
#[derive(Debug, Clone, Copy)]
pub enum IterationOutcome<'a> {
    /// The output was scored
    Scored(f64),
    /// The model returned no code
    EmptyOutput,
    /// The output failed validation and was not scored
    Invalid(&'a ValidationFailure),
    /// The provider failed after retries; the model is abandoned
    ProviderFailed(&'a ProviderError),
}

/// Callback for progress updates during a workflow run
///
/// Implementations live in the presentation layer. Agent callbacks may arrive
/// concurrently from the implementation and security agents.
pub trait WorkflowProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: WorkflowStage);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: WorkflowStage, success: bool);

    // ==================== Agent Callbacks ====================

    /// Called when an agent starts on a model
    fn on_agent_start(&self, _role: AgentRole, _model: &Model) {}

    /// Called after every quality iteration
    fn on_iteration(
        &self,
        _role: AgentRole,
        _model: &Model,
        _iteration: u32,
        _outcome: IterationOutcome<'_>,
    ) {
    }

    /// Called when an agent escalates to the next model
    fn on_fallback(&self, _role: AgentRole, _from: &Model, _to: &Model) {}

    /// Called when an agent returns its final output
    fn on_agent_complete(&self, _role: AgentRole, _output: &AgentOutput) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl WorkflowProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: WorkflowStage) {}
    fn on_stage_complete(&self, _stage: WorkflowStage, _success: bool) {}
}
