//! Strategies extracted from high-scoring runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::text::truncate;
use crate::workflow::report::WorkflowReport;

/// Runs averaging at least this much yield a strategy.
pub const STRATEGY_THRESHOLD: f64 = 90.0;

const MAX_TASK_CHARS: usize = 200;
const MAX_ARCHITECTURE_CHARS: usize = 500;

/// What a successful run looked like: per-agent scores, how closely the
/// agents agreed and the start of the architecture plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub task: String,
    pub avg_score: f64,
    pub agent_scores: BTreeMap<String, f64>,
    /// In `(0, 1]`; 1 when every agent scored the same.
    pub agent_agreement: f64,
    pub total_iterations: u32,
    pub architecture: String,
}

impl Strategy {
    /// Strategy of a run, or `None` when it averaged below
    /// [`STRATEGY_THRESHOLD`].
    pub fn from_report(report: &WorkflowReport) -> Option<Self> {
        if report.avg_score < STRATEGY_THRESHOLD {
            return None;
        }
        let outputs = report.scored_outputs();
        let scores: Vec<f64> = outputs.iter().map(|o| o.score_or_zero()).collect();
        Some(Self {
            task: truncate(&report.task, MAX_TASK_CHARS),
            avg_score: report.avg_score,
            agent_scores: outputs
                .iter()
                .map(|o| (o.role().as_str().to_string(), o.score_or_zero()))
                .collect(),
            agent_agreement: agent_agreement(&scores),
            total_iterations: outputs.iter().map(|o| o.iterations_used()).sum(),
            architecture: truncate(report.architecture.code(), MAX_ARCHITECTURE_CHARS),
        })
    }
}

/// `1 / (1 + variance / 100)` over the scores; 0 for no scores.
pub fn agent_agreement(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    1.0 / (1.0 + variance / 100.0)
}
