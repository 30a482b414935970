//! Run learner port
//!
//! Feeds finished runs into a persistent performance history and reports
//! what it has learned.

use async_trait::async_trait;
use swarm_domain::{PerformanceSummary, WorkflowReport};
use thiserror::Error;

/// Errors that can occur while updating or reading the learning history
#[derive(Error, Debug)]
pub enum LearnerError {
    #[error("Learning history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Learning history data error: {0}")]
    Data(String),
}

/// What one run added to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningOutcome {
    /// Runs recorded so far, this one included.
    pub total_runs: u64,
    /// Whether the run scored high enough to be kept as a strategy.
    pub strategy_stored: bool,
}

#[async_trait]
pub trait RunLearner: Send + Sync {
    /// Record the outcome of a finished run.
    async fn learn_from_outcome(
        &self,
        report: &WorkflowReport,
    ) -> Result<LearningOutcome, LearnerError>;

    /// Per-agent statistics and improvement suggestions.
    async fn performance_summary(&self) -> Result<PerformanceSummary, LearnerError>;
}
