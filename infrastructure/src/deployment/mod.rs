//! Deployment target adapters.

mod local;

pub use local::LocalWorkspaceDeployer;
