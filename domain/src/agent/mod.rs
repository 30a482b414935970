//! Agent domain module
//!
//! Roles, their outputs, and the validation strategy applied to outputs.

pub mod output;
pub mod role;
pub mod validation;

pub use output::{AgentOutput, AgentOutputBuilder, DEFAULT_CONFIDENCE};
pub use role::AgentRole;
pub use validation::{NoValidation, OutputValidator};
