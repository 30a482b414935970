//! Agent roles and their sampling parameters.

use serde::{Deserialize, Serialize};

/// A specialized agent in the swarm.
///
/// Each role has fixed sampling parameters: design work samples hotter,
/// security review colder, and testing gets the largest output budget
/// because test suites are long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Architecture,
    Implementation,
    Security,
    Testing,
    Vision,
}

impl AgentRole {
    /// Roles whose scores feed the workflow average.
    pub const SCORED: [AgentRole; 4] = [
        AgentRole::Architecture,
        AgentRole::Implementation,
        AgentRole::Security,
        AgentRole::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Architecture => "architecture",
            AgentRole::Implementation => "implementation",
            AgentRole::Security => "security",
            AgentRole::Testing => "testing",
            AgentRole::Vision => "vision",
        }
    }

    /// Human-readable name used in progress output.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::Architecture => "Architecture Agent",
            AgentRole::Implementation => "Implementation Agent",
            AgentRole::Security => "Security Agent",
            AgentRole::Testing => "Testing Agent",
            AgentRole::Vision => "Vision Agent",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            AgentRole::Architecture => 0.7,
            AgentRole::Implementation => 0.5,
            AgentRole::Security => 0.3,
            AgentRole::Testing => 0.4,
            AgentRole::Vision => 0.6,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            AgentRole::Architecture => 4000,
            AgentRole::Implementation => 6000,
            AgentRole::Security => 5000,
            AgentRole::Testing => 12000,
            AgentRole::Vision => 3000,
        }
    }

    /// Whether this role's output must pass file validation.
    pub fn produces_files(&self) -> bool {
        matches!(self, AgentRole::Implementation)
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
