//! Agent loop configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};
use swarm_application::LoopParams;
use swarm_domain::{ConfigIssue, ConfigIssueCode};

/// Raw agent loop configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// quality_threshold = 90.0
/// max_iterations = 3          # per model
/// vision_max_iterations = 2
/// default_score = 85.0        # used when the evaluator fails
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub quality_threshold: f64,
    pub max_iterations: u32,
    pub vision_max_iterations: u32,
    pub default_score: f64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = LoopParams::default();
        Self {
            quality_threshold: params.quality_threshold,
            max_iterations: params.max_iterations,
            vision_max_iterations: 2,
            default_score: params.default_score,
        }
    }
}

impl FileAgentConfig {
    pub fn to_loop_params(&self) -> LoopParams {
        LoopParams::default()
            .with_quality_threshold(self.quality_threshold)
            .with_max_iterations(self.max_iterations)
            .with_default_score(self.default_score)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(0.0..=100.0).contains(&self.quality_threshold) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOutOfRange,
                format!(
                    "agent.quality_threshold: {} is outside 0..=100",
                    self.quality_threshold
                ),
            ));
        }
        if !(0.0..=100.0).contains(&self.default_score) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DefaultScoreOutOfRange,
                format!(
                    "agent.default_score: {} is outside 0..=100",
                    self.default_score
                ),
            ));
        }
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroIterations,
                "agent.max_iterations: must be at least 1",
            ));
        }
        if self.vision_max_iterations == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroIterations,
                "agent.vision_max_iterations: 0 disables vision analysis",
            ));
        }
        issues
    }
}
