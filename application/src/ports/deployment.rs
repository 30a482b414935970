//! Deployment target port

use async_trait::async_trait;
use swarm_domain::{DeploymentReceipt, DeploymentRequest};
use thiserror::Error;

/// Errors that can occur while deploying a project
#[derive(Error, Debug)]
pub enum DeploymentError {
    #[error("Deployment I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid project path: {0}")]
    InvalidPath(String),

    #[error("Deployment failed: {0}")]
    Failed(String),
}

/// Receives validated projects
#[async_trait]
pub trait DeploymentTarget: Send + Sync {
    async fn deploy(&self, request: &DeploymentRequest) -> Result<DeploymentReceipt, DeploymentError>;
}
