//! Per-agent performance history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::workflow::report::WorkflowReport;

/// Weight of the newest sample in the moving averages.
pub const LEARNING_RATE: f64 = 0.1;

/// Score at which a single agent output counts as correct.
pub const QUALITY_GATE: f64 = 90.0;

/// Samples an agent needs before suggestions look at it.
pub const MIN_SAMPLES: u32 = 10;

const PRIOR_SCORE: f64 = 85.0;
const LOW_ACCURACY: f64 = 0.7;
const LOW_AVG_SCORE: f64 = 70.0;
const HIGH_VOLUME_RUNS: u64 = 50;

/// Running statistics for one agent role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    pub correct: u32,
    pub total: u32,
    /// Exponential moving average, starting from a prior of 85.
    pub avg_score: f64,
    pub avg_latency_ms: f64,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            correct: 0,
            total: 0,
            avg_score: PRIOR_SCORE,
            avg_latency_ms: 0.0,
        }
    }
}

impl AgentStats {
    /// Share of correct outputs; 0 before the first sample.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }

    /// Fold one output into the statistics.
    ///
    /// The output is correct when it passed the quality gate on its own or
    /// the run as a whole met its threshold.
    pub fn record(&mut self, score: f64, latency_ms: u64, run_succeeded: bool) {
        self.total += 1;
        if score >= QUALITY_GATE || run_succeeded {
            self.correct += 1;
        }
        self.avg_score = moving_average(self.avg_score, score);
        self.avg_latency_ms = moving_average(self.avg_latency_ms, latency_ms as f64);
    }
}

fn moving_average(previous: f64, sample: f64) -> f64 {
    previous * (1.0 - LEARNING_RATE) + sample * LEARNING_RATE
}

/// Performance history across runs, keyed by agent role name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceLog {
    pub total_runs: u64,
    pub agents: BTreeMap<String, AgentStats>,
}

impl PerformanceLog {
    /// Record the four scored agents of a finished run.
    pub fn record_run(&mut self, report: &WorkflowReport) {
        self.total_runs += 1;
        for output in report.scored_outputs() {
            self.agents
                .entry(output.role().as_str().to_string())
                .or_default()
                .record(output.score_or_zero(), output.latency_ms(), report.threshold_met);
        }
    }

    /// Human-readable hints derived from the history.
    ///
    /// Agents with fewer than [`MIN_SAMPLES`] samples are skipped.
    pub fn suggest_improvements(&self) -> Vec<String> {
        let mut suggestions = Vec::new();
        for (agent, stats) in &self.agents {
            if stats.total < MIN_SAMPLES {
                continue;
            }
            let accuracy = stats.accuracy();
            if accuracy < LOW_ACCURACY {
                suggestions.push(format!(
                    "{agent} has low accuracy ({:.1}%). Consider adjusting thresholds or model parameters.",
                    accuracy * 100.0
                ));
            }
            if stats.avg_score < LOW_AVG_SCORE {
                suggestions.push(format!(
                    "{agent} averages {:.1}/100. Consider a stronger model sequence for it.",
                    stats.avg_score
                ));
            }
        }
        if self.total_runs > HIGH_VOLUME_RUNS {
            suggestions.push(format!(
                "{} runs recorded. Review the stored strategies for tasks worth templating.",
                self.total_runs
            ));
        }
        suggestions
    }

    /// Snapshot for display.
    pub fn summary(&self, strategies_learned: usize) -> PerformanceSummary {
        PerformanceSummary {
            total_runs: self.total_runs,
            strategies_learned,
            agents: self
                .agents
                .iter()
                .map(|(agent, stats)| {
                    (
                        agent.clone(),
                        AgentPerformance {
                            accuracy: stats.accuracy(),
                            avg_score: stats.avg_score,
                            avg_latency_ms: stats.avg_latency_ms,
                            samples: stats.total,
                        },
                    )
                })
                .collect(),
            suggestions: self.suggest_improvements(),
        }
    }
}

/// Per-agent line of a [`PerformanceSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPerformance {
    pub accuracy: f64,
    pub avg_score: f64,
    pub avg_latency_ms: f64,
    pub samples: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_runs: u64,
    pub strategies_learned: usize,
    pub agents: BTreeMap<String, AgentPerformance>,
    pub suggestions: Vec<String>,
}
