//! Static model profiles used to explain fallback decisions.

use serde::Serialize;

use crate::core::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningTier {
    Medium,
    Good,
    Excellent,
}

/// Read-only reference data about a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProfile {
    pub model: &'static str,
    pub strengths: &'static [&'static str],
    pub weaknesses: &'static [&'static str],
    pub speed: Speed,
    pub cost_per_1k_tokens: f64,
    pub reasoning: ReasoningTier,
}

static PROFILES: [ModelProfile; 4] = [
    ModelProfile {
        model: "gpt-5-pro",
        strengths: &[
            "web",
            "modern_frameworks",
            "react",
            "vue",
            "typescript",
            "rapid_prototyping",
        ],
        weaknesses: &["complex_architecture", "low_level_systems"],
        speed: Speed::Fast,
        cost_per_1k_tokens: 0.015,
        reasoning: ReasoningTier::Medium,
    },
    ModelProfile {
        model: "claude-opus-4.1",
        strengths: &[
            "complex_logic",
            "architecture",
            "error_handling",
            "security",
            "backend",
            "refactoring",
        ],
        weaknesses: &["rapid_iteration", "modern_web_patterns"],
        speed: Speed::Slow,
        cost_per_1k_tokens: 0.075,
        reasoning: ReasoningTier::Excellent,
    },
    ModelProfile {
        model: "claude-sonnet-4.5",
        strengths: &["architecture", "clean_code", "balanced", "general_purpose"],
        weaknesses: &["cutting_edge_features"],
        speed: Speed::Medium,
        cost_per_1k_tokens: 0.015,
        reasoning: ReasoningTier::Excellent,
    },
    ModelProfile {
        model: "grok-4",
        strengths: &["testing", "edge_cases", "creative_solutions"],
        weaknesses: &["production_code", "strict_patterns"],
        speed: Speed::Medium,
        cost_per_1k_tokens: 0.010,
        reasoning: ReasoningTier::Good,
    },
];

impl ModelProfile {
    /// Look up the profile for `model`, if one is known.
    pub fn for_model(model: &Model) -> Option<&'static ModelProfile> {
        PROFILES.iter().find(|p| p.model == model.as_str())
    }

    pub fn all() -> &'static [ModelProfile] {
        &PROFILES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let profile = ModelProfile::for_model(&Model::ClaudeOpus41).unwrap();
        assert_eq!(profile.speed, Speed::Slow);
        assert_eq!(profile.reasoning, ReasoningTier::Excellent);
        assert!(profile.strengths.contains(&"security"));
        assert!(ModelProfile::for_model(&Model::Gpt4o).is_none());
    }

    #[test]
    fn test_every_profile_parses_to_known_model() {
        for profile in ModelProfile::all() {
            let model = Model::from(profile.model);
            assert!(!matches!(model, Model::Custom(_)), "{}", profile.model);
        }
    }
}
