//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`LoopParams`]: per-agent quality loop control (threshold, iterations)
//! - [`RetryPolicy`]: backoff for transient provider failures
//! - [`WorkflowParams`]: which optional workflow steps run

pub mod loop_params;
pub mod retry_policy;
pub mod workflow_params;

pub use loop_params::LoopParams;
pub use retry_policy::RetryPolicy;
pub use workflow_params::WorkflowParams;
