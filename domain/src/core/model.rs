//! Model value object representing an LLM reachable through the completion provider

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// Short identifiers are what configuration files and the fallback tables
/// use; [`Model::openrouter_id`] maps them to the provider's routing id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // OpenAI models
    Gpt5Pro,
    Gpt5,
    Gpt5Image,
    Gpt4o,
    // Anthropic models
    ClaudeSonnet45,
    ClaudeOpus41,
    // xAI models
    Grok4,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt5Pro => "gpt-5-pro",
            Model::Gpt5 => "gpt-5",
            Model::Gpt5Image => "gpt-5-image",
            Model::Gpt4o => "gpt-4o",
            Model::ClaudeSonnet45 => "claude-sonnet-4.5",
            Model::ClaudeOpus41 => "claude-opus-4.1",
            Model::Grok4 => "grok-4",
            Model::Custom(s) => s,
        }
    }

    /// Provider routing id (`vendor/model`).
    ///
    /// Custom models are passed through unchanged, so fully-qualified ids
    /// like `meta-llama/llama-3-70b-instruct` work as-is.
    pub fn openrouter_id(&self) -> &str {
        match self {
            Model::Gpt5Pro => "openai/gpt-5-pro",
            Model::Gpt5 => "openai/gpt-5",
            Model::Gpt5Image => "openai/gpt-5-image",
            Model::Gpt4o => "openai/gpt-4o",
            Model::ClaudeSonnet45 => "anthropic/claude-sonnet-4.5",
            Model::ClaudeOpus41 => "anthropic/claude-opus-4.1",
            Model::Grok4 => "x-ai/grok-4",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(self, Model::ClaudeSonnet45 | Model::ClaudeOpus41)
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        matches!(
            self,
            Model::Gpt5Pro | Model::Gpt5 | Model::Gpt5Image | Model::Gpt4o
        )
    }

    /// Whether the model accepts image input
    pub fn supports_vision(&self) -> bool {
        matches!(
            self,
            Model::Gpt5Image | Model::Gpt5 | Model::Gpt4o | Model::ClaudeSonnet45
        )
    }
}

impl Default for Model {
    /// Returns the most balanced general-purpose model
    fn default() -> Self {
        Model::ClaudeSonnet45
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-5-pro" | "openai/gpt-5-pro" => Model::Gpt5Pro,
            "gpt-5" | "openai/gpt-5" => Model::Gpt5,
            "gpt-5-image" | "openai/gpt-5-image" => Model::Gpt5Image,
            "gpt-4o" | "openai/gpt-4o" => Model::Gpt4o,
            "claude-sonnet-4.5" | "anthropic/claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "claude-opus-4.1" | "anthropic/claude-opus-4.1" => Model::ClaudeOpus41,
            "grok-4" | "x-ai/grok-4" => Model::Grok4,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
