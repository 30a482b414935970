//! Offline quality evaluator based on surface features of the output.

use async_trait::async_trait;
use swarm_application::{EvaluationRequest, EvaluatorError, QualityEvaluator};
use swarm_domain::AgentRole;
use tracing::debug;

const BASE_SCORE: f64 = 85.0;

/// Scores outputs from length and the presence of documentation, error
/// handling, tests, type annotations and validation.
///
/// Needs no network access, so it also serves as the evaluator when no
/// hosted evaluation service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Score `output` for `role` on a 0-100 scale.
    pub fn score(output: &str, role: AgentRole) -> f64 {
        let mut score = BASE_SCORE;

        let len = output.chars().count();
        if len > 1000 {
            score += 5.0;
        }
        if len > 2000 {
            score += 3.0;
        }

        let indicators = [
            ["#", "//", "\"\"\"", "/*"].iter().any(|m| output.contains(m)),
            output.contains("try") && output.contains("except"),
            output.to_lowercase().contains("test") || output.contains("assert"),
            output.contains(':') && output.contains("->"),
            output.contains("if") && output.contains("raise"),
        ];
        score += 2.0 * indicators.iter().filter(|hit| **hit).count() as f64;

        // Security reviews get a bonus: missing a finding costs more there.
        if role == AgentRole::Security && score < 95.0 {
            score = (score + 3.0).min(100.0);
        }

        score.min(100.0)
    }
}

#[async_trait]
impl QualityEvaluator for HeuristicEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, EvaluatorError> {
        let score = Self::score(&request.output, request.role);
        debug!(
            "Heuristic score for {} ({}): {:.1}",
            request.role, request.model, score
        );
        Ok(score)
    }
}
