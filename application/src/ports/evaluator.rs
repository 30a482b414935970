//! Quality evaluator port
//!
//! The evaluator scores an agent output on a 0-100 scale. Its scoring method
//! is opaque to the application layer.

use async_trait::async_trait;
use swarm_domain::{AgentRole, Model};
use thiserror::Error;

/// Errors that can occur while scoring an output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("Evaluator returned an invalid score: {0}")]
    InvalidScore(String),
}

/// Everything the evaluator sees about one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub task: String,
    pub output: String,
    pub role: AgentRole,
    pub model: Model,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub latency_ms: u64,
}

/// Scores agent outputs
#[async_trait]
pub trait QualityEvaluator: Send + Sync {
    /// Score an output in `[0, 100]`
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError>;
}
