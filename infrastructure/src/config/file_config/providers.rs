//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// OpenRouter completion provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Whole-request timeout. Large generations take minutes.
    pub timeout_secs: u64,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout_secs: 900,
        }
    }
}

impl FileOpenRouterConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Tavily documentation search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTavilyConfig {
    /// Environment variable name for the API key (default: "TAVILY_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    /// Results requested per search.
    pub max_results: u32,
}

impl Default for FileTavilyConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            max_results: 3,
        }
    }
}

impl FileTavilyConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

fn resolve_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
}

/// Provider settings
///
/// # Example
///
/// ```toml
/// [providers.openrouter]
/// api_key_env = "OPENROUTER_API_KEY"
/// timeout_secs = 600
///
/// [providers.tavily]
/// max_results = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openrouter: FileOpenRouterConfig,
    pub tavily: FileTavilyConfig,
}
