//! Documentation search port

use async_trait::async_trait;
use swarm_domain::Documentation;
use thiserror::Error;

/// Errors that can occur during a documentation search
#[derive(Error, Debug)]
pub enum DocSearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Search is not configured: {0}")]
    NotConfigured(String),
}

/// Finds documentation relevant to a task
#[async_trait]
pub trait DocumentationSearch: Send + Sync {
    /// Search for documentation; `Ok(None)` when nothing relevant was found.
    async fn search(&self, task: &str) -> Result<Option<Documentation>, DocSearchError>;
}
