//! Prompt domain
//!
//! Templates for the system, base and improvement prompts of each agent.

pub mod agent;

pub use agent::{AgentPromptTemplate, ImprovementFeedback, PREVIOUS_CODE_EXCERPT};
