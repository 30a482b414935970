//! Pattern store port
//!
//! Stores high-scoring runs and retrieves them as prompt context for similar
//! tasks.

use async_trait::async_trait;
use swarm_domain::{AgentOutput, Pattern};
use thiserror::Error;

/// Errors that can occur while accessing the pattern store
#[derive(Error, Debug)]
pub enum PatternStoreError {
    #[error("Pattern store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern store data error: {0}")]
    Data(String),
}

/// Persistent knowledge base of successful runs
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Patterns for tasks similar to `task` with `avg_score >= min_score`,
    /// best first, at most `limit`.
    async fn retrieve_similar(
        &self,
        task: &str,
        limit: usize,
        min_score: f64,
    ) -> Result<Vec<Pattern>, PatternStoreError>;

    /// Store a run when its average score clears the store's threshold.
    ///
    /// Returns the new pattern id, or `None` when the run was not stored.
    async fn store_if_above_threshold(
        &self,
        task: &str,
        outputs: &[&AgentOutput],
        avg_score: f64,
    ) -> Result<Option<String>, PatternStoreError>;
}
