//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod completion;
pub mod deployment;
pub mod doc_search;
pub mod evaluator;
pub mod pattern_store;
pub mod progress;
pub mod run_learner;
pub mod run_logger;
