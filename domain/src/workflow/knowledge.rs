//! Knowledge gathered before the agents run: stored patterns and
//! documentation search results.

use serde::{Deserialize, Serialize};

use crate::core::text::truncate;

/// A previously successful solution, retrieved to guide new runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub task: String,
    pub avg_score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub code_snippet: String,
}

impl Pattern {
    /// One-line description for prompts.
    pub fn describe(&self) -> String {
        format!("{} (score {:.1})", truncate(&self.task, 120), self.avg_score)
    }
}

/// One documentation search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Documentation found for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub query: String,
    pub results: Vec<DocResult>,
}

impl Documentation {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Prompt-ready digest: title, URL and a clipped excerpt per result.
    pub fn digest(&self, excerpt_len: usize) -> String {
        self.results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. {} ({})\n   {}",
                    i + 1,
                    r.title,
                    r.url,
                    truncate(r.content.trim(), excerpt_len)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
