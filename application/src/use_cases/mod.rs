//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_agent;
pub(crate) mod retry;
pub mod run_workflow;
