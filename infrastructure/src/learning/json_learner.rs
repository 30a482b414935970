//! JSON-file run learner.
//!
//! Keeps two documents in one directory: `agent_performance.json` with the
//! per-agent [`PerformanceLog`] and `successful_strategies.json` with the
//! most recent strategies of high-scoring runs.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swarm_application::{LearnerError, LearningOutcome, RunLearner};
use swarm_domain::{PerformanceLog, PerformanceSummary, Strategy, WorkflowReport};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Strategies kept on disk; older ones are dropped first.
pub const MAX_STRATEGIES: usize = 100;

const PERFORMANCE_FILE: &str = "agent_performance.json";
const STRATEGIES_FILE: &str = "successful_strategies.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredStrategy {
    /// RFC 3339
    recorded_at: String,
    #[serde(flatten)]
    strategy: Strategy,
}

/// Run learner backed by JSON files in one directory.
pub struct JsonRunLearner {
    dir: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonRunLearner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn performance_path(&self) -> PathBuf {
        self.dir.join(PERFORMANCE_FILE)
    }

    fn strategies_path(&self) -> PathBuf {
        self.dir.join(STRATEGIES_FILE)
    }

    async fn read<T: DeserializeOwned + Default>(path: &Path) -> Result<T, LearnerError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Ok(T::default()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| LearnerError::Data(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), LearnerError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json =
            serde_json::to_string_pretty(value).map_err(|e| LearnerError::Data(e.to_string()))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl RunLearner for JsonRunLearner {
    async fn learn_from_outcome(
        &self,
        report: &WorkflowReport,
    ) -> Result<LearningOutcome, LearnerError> {
        let _guard = self.lock.lock().await;

        let performance_path = self.performance_path();
        let mut log: PerformanceLog = Self::read(&performance_path).await?;
        log.record_run(report);
        self.write(&performance_path, &log).await?;

        let strategy_stored = match Strategy::from_report(report) {
            Some(strategy) => {
                let strategies_path = self.strategies_path();
                let mut strategies: Vec<StoredStrategy> = Self::read(&strategies_path).await?;
                strategies.push(StoredStrategy {
                    recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    strategy,
                });
                let excess = strategies.len().saturating_sub(MAX_STRATEGIES);
                strategies.drain(..excess);
                self.write(&strategies_path, &strategies).await?;
                debug!("{} strategies on file", strategies.len());
                true
            }
            None => false,
        };

        info!(
            "Learned from run #{} (average {:.1})",
            log.total_runs, report.avg_score
        );
        Ok(LearningOutcome {
            total_runs: log.total_runs,
            strategy_stored,
        })
    }

    async fn performance_summary(&self) -> Result<PerformanceSummary, LearnerError> {
        let _guard = self.lock.lock().await;
        let log: PerformanceLog = Self::read(&self.performance_path()).await?;
        let strategies: Vec<StoredStrategy> = Self::read(&self.strategies_path()).await?;
        Ok(log.summary(strategies.len()))
    }
}
