//! Configuration validation issues.
//!
//! Configuration is validated after loading; each problem is reported as a
//! [`ConfigIssue`] with a severity so the binary can refuse to start on
//! errors and merely print warnings.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Quality threshold outside 0..=100.
    ThresholdOutOfRange,
    /// Evaluator fallback score outside 0..=100.
    DefaultScoreOutOfRange,
    /// An iteration budget of zero never calls the model.
    ZeroIterations,
    /// Retry policy with zero attempts never calls the provider.
    ZeroRetryAttempts,
    /// Backoff multiplier below 1 shrinks delays.
    ShrinkingBackoff,
    /// `[models]` key that names no task category.
    UnknownCategory,
    /// `[models]` override with no models.
    EmptyModelSequence,
    /// Blank entry in a `[models]` list.
    EmptyModelName,
    /// `[models]` override with more models than the loop will try.
    ModelSequenceTruncated,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
