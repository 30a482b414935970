//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Agent output from '{0}' has no validated files and cannot be deployed")]
    NotDeployable(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

impl DomainError {
    /// Check if this error is a deployment refusal
    pub fn is_not_deployable(&self) -> bool {
        matches!(self, DomainError::NotDeployable(_))
    }
}
