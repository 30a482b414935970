//! Application layer for codeswarm
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LoopParams, RetryPolicy, WorkflowParams};
pub use ports::{
    completion::{
        ChatMessage, Completion, CompletionProvider, CompletionRequest, ImageAttachment,
        MessageRole, ProviderError, Usage,
    },
    deployment::{DeploymentError, DeploymentTarget},
    doc_search::{DocSearchError, DocumentationSearch},
    evaluator::{EvaluationRequest, EvaluatorError, QualityEvaluator},
    pattern_store::{PatternStore, PatternStoreError},
    progress::{IterationOutcome, NoProgress, WorkflowProgressNotifier, WorkflowStage},
    run_learner::{LearnerError, LearningOutcome, RunLearner},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::execute_agent::{AgentError, ExecuteAgentInput, ExecuteAgentUseCase};
pub use use_cases::run_workflow::{RunWorkflowError, RunWorkflowInput, RunWorkflowUseCase};
