//! The result of one successful agent execution.

use serde::Serialize;

use crate::core::model::Model;
use crate::project::file_map::ValidatedFiles;

use super::role::AgentRole;

/// Confidence reported for outputs produced by the execution loop.
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Output of an agent (Value Object).
///
/// Immutable once built. `parsed_files` is present only when the output
/// passed file validation; see [`ValidatedFiles`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOutput {
    agent_name: String,
    role: AgentRole,
    code: String,
    reasoning: String,
    confidence: f64,
    latency_ms: u64,
    model_used: Model,
    quality_score: Option<f64>,
    iterations_used: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    parsed_files: Option<ValidatedFiles>,
}

impl AgentOutput {
    pub fn builder(role: AgentRole, model: Model) -> AgentOutputBuilder {
        AgentOutputBuilder {
            output: AgentOutput {
                agent_name: role.display_name().to_string(),
                role,
                code: String::new(),
                reasoning: String::new(),
                confidence: DEFAULT_CONFIDENCE,
                latency_ms: 0,
                model_used: model,
                quality_score: None,
                iterations_used: 1,
                parsed_files: None,
            },
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    pub fn model_used(&self) -> &Model {
        &self.model_used
    }

    pub fn quality_score(&self) -> Option<f64> {
        self.quality_score
    }

    /// Score used for aggregation; an unscored output counts as zero.
    pub fn score_or_zero(&self) -> f64 {
        self.quality_score.unwrap_or(0.0)
    }

    pub fn iterations_used(&self) -> u32 {
        self.iterations_used
    }

    pub fn parsed_files(&self) -> Option<&ValidatedFiles> {
        self.parsed_files.as_ref()
    }

    /// Copy with the total iteration count set; used when the loop returns.
    pub fn with_iterations_used(mut self, iterations: u32) -> Self {
        self.iterations_used = iterations;
        self
    }
}

/// Builder for [`AgentOutput`].
#[derive(Debug)]
pub struct AgentOutputBuilder {
    output: AgentOutput,
}

impl AgentOutputBuilder {
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.output.code = code.into();
        self
    }

    pub fn reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.output.reasoning = reasoning.into();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.output.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.output.latency_ms = latency_ms;
        self
    }

    pub fn quality_score(mut self, score: f64) -> Self {
        self.output.quality_score = Some(score.clamp(0.0, 100.0));
        self
    }

    pub fn iterations_used(mut self, iterations: u32) -> Self {
        self.output.iterations_used = iterations;
        self
    }

    pub fn parsed_files(mut self, files: Option<ValidatedFiles>) -> Self {
        self.output.parsed_files = files;
        self
    }

    pub fn build(self) -> AgentOutput {
        self.output
    }
}
