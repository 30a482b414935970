//! Tavily documentation search.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarm_application::{DocSearchError, DocumentationSearch};
use swarm_domain::core::text::extract_keywords;
use swarm_domain::{DocResult, Documentation};
use tracing::{debug, info};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const QUERY_KEYWORDS: usize = 5;

/// Documentation lookup through the Tavily search API.
#[derive(Debug, Clone)]
pub struct TavilySearch {
    http: Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: 3,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Documentation-focused query from the first keywords of the task.
///
/// Returns `None` when the task has no usable keywords.
pub fn documentation_query(task: &str) -> Option<String> {
    let keywords = extract_keywords(task, QUERY_KEYWORDS);
    if keywords.is_empty() {
        return None;
    }
    Some(format!("{} documentation tutorial", keywords.join(" ")))
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

fn into_documentation(query: String, response: SearchResponse) -> Option<Documentation> {
    let results: Vec<DocResult> = response
        .results
        .into_iter()
        .filter(|hit| !hit.url.is_empty())
        .map(|hit| DocResult {
            title: hit.title,
            url: hit.url,
            content: hit.content,
        })
        .collect();
    if results.is_empty() {
        return None;
    }
    Some(Documentation { query, results })
}

#[async_trait]
impl DocumentationSearch for TavilySearch {
    async fn search(&self, task: &str) -> Result<Option<Documentation>, DocSearchError> {
        let Some(query) = documentation_query(task) else {
            debug!("No keywords in task, skipping documentation search");
            return Ok(None);
        };

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query: &query,
                max_results: self.max_results,
            })
            .send()
            .await
            .map_err(|e| DocSearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocSearchError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| DocSearchError::RequestFailed(format!("invalid response: {e}")))?;

        let documentation = into_documentation(query, body);
        info!(
            "Documentation search found {} results",
            documentation.as_ref().map_or(0, |d| d.results.len())
        );
        Ok(documentation)
    }
}
