//! Provider retry configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarm_application::RetryPolicy;
use swarm_domain::{ConfigIssue, ConfigIssueCode};

/// Backoff applied to transient provider failures
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// initial_delay_ms = 1000
/// multiplier = 2.0
/// max_delay_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_multiplier(self.multiplier)
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRetryAttempts,
                "retry.max_attempts: must be at least 1",
            ));
        }
        if self.multiplier < 1.0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ShrinkingBackoff,
                format!(
                    "retry.multiplier: {} makes each retry wait less than the last",
                    self.multiplier
                ),
            ));
        }
        issues
    }
}
