//! Quality loop parameters.
//!
//! [`LoopParams`] groups the parameters that control one agent's quality
//! loop in [`ExecuteAgentUseCase`](crate::use_cases::execute_agent::ExecuteAgentUseCase).

use serde::{Deserialize, Serialize};

/// Quality loop control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopParams {
    /// Score at which an output is accepted immediately.
    pub quality_threshold: f64,
    /// Quality iterations per model.
    pub max_iterations: u32,
    /// Score assigned when the evaluator fails.
    pub default_score: f64,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            quality_threshold: 90.0,
            max_iterations: 3,
            default_score: 85.0,
        }
    }
}

impl LoopParams {
    // ==================== Builder Methods ====================

    pub fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = score;
        self
    }
}
