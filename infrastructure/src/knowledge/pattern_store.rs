//! JSON-file pattern store.
//!
//! Successful runs are appended to a single JSON document. Retrieval is
//! keyword based: a stored pattern matches when its task contains any
//! keyword of the new task.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swarm_application::{PatternStore, PatternStoreError};
use swarm_domain::core::text::{extract_keywords, truncate};
use swarm_domain::{AgentOutput, AgentRole, Pattern};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Runs below this average are never stored.
pub const DEFAULT_STORE_THRESHOLD: f64 = 90.0;

const MAX_TASK_CHARS: usize = 500;
const MAX_CODE_CHARS: usize = 10_000;
const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PatternFile {
    #[serde(default)]
    patterns: Vec<StoredPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPattern {
    id: String,
    task: String,
    avg_score: f64,
    /// RFC 3339
    created_at: String,
    #[serde(default)]
    outputs: Vec<StoredOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredOutput {
    agent: AgentRole,
    model: String,
    score: f64,
    iterations: u32,
    latency_ms: u64,
    code: String,
}

impl StoredPattern {
    fn matches_any(&self, keywords: &[String]) -> bool {
        let task = self.task.to_lowercase();
        keywords.iter().any(|k| task.contains(k.as_str()))
    }

    fn to_pattern(&self) -> Pattern {
        let summary = self
            .outputs
            .iter()
            .map(|o| format!("{} via {} ({:.1})", o.agent, o.model, o.score))
            .collect::<Vec<_>>()
            .join(", ");
        let code_snippet = self
            .outputs
            .iter()
            .find(|o| o.agent == AgentRole::Implementation)
            .or_else(|| self.outputs.first())
            .map(|o| o.code.clone())
            .unwrap_or_default();
        Pattern {
            id: self.id.clone(),
            task: self.task.clone(),
            avg_score: self.avg_score,
            summary,
            code_snippet,
        }
    }
}

/// Pattern store backed by one JSON file.
pub struct JsonPatternStore {
    path: PathBuf,
    threshold: f64,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonPatternStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: DEFAULT_STORE_THRESHOLD,
            lock: Mutex::new(()),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<PatternFile, PatternStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(PatternFile::default()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                PatternStoreError::Data(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PatternFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &PatternFile) -> Result<(), PatternStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| PatternStoreError::Data(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// `pattern_YYYYMMDD_HHMMSS`, suffixed when a pattern with that id exists.
fn unique_id(existing: &[StoredPattern]) -> String {
    let base = format!("pattern_{}", Utc::now().format("%Y%m%d_%H%M%S"));
    let taken = |id: &str| existing.iter().any(|p| p.id == id);
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|id| !taken(id))
        .unwrap_or(base)
}

#[async_trait]
impl PatternStore for JsonPatternStore {
    async fn retrieve_similar(
        &self,
        task: &str,
        limit: usize,
        min_score: f64,
    ) -> Result<Vec<Pattern>, PatternStoreError> {
        let keywords = extract_keywords(task, MAX_KEYWORDS);
        if keywords.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let file = {
            let _guard = self.lock.lock().await;
            self.read().await?
        };

        let mut matches: Vec<&StoredPattern> = file
            .patterns
            .iter()
            .filter(|p| p.avg_score >= min_score && p.matches_any(&keywords))
            .collect();
        // Highest score first, newest first among equals.
        matches.sort_by(|a, b| {
            b.avg_score
                .total_cmp(&a.avg_score)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let patterns: Vec<Pattern> = matches
            .into_iter()
            .take(limit)
            .map(StoredPattern::to_pattern)
            .collect();
        debug!(
            "Retrieved {} similar patterns from {}",
            patterns.len(),
            self.path.display()
        );
        Ok(patterns)
    }

    async fn store_if_above_threshold(
        &self,
        task: &str,
        outputs: &[&AgentOutput],
        avg_score: f64,
    ) -> Result<Option<String>, PatternStoreError> {
        if avg_score < self.threshold {
            warn!(
                "Pattern score {:.1} < {:.1}, skipping storage",
                avg_score, self.threshold
            );
            return Ok(None);
        }

        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        let id = unique_id(&file.patterns);

        file.patterns.push(StoredPattern {
            id: id.clone(),
            task: truncate(task, MAX_TASK_CHARS),
            avg_score,
            created_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            outputs: outputs
                .iter()
                .map(|o| StoredOutput {
                    agent: o.role(),
                    model: o.model_used().to_string(),
                    score: o.score_or_zero(),
                    iterations: o.iterations_used(),
                    latency_ms: o.latency_ms(),
                    code: truncate(o.code(), MAX_CODE_CHARS),
                })
                .collect(),
        });
        self.write(&file).await?;

        info!("Stored pattern {} (score: {:.1})", id, avg_score);
        Ok(Some(id))
    }
}
