//! Model fallback selection.
//!
//! Pure functions over static tables plus [`ModelRoster`], which layers
//! configured per-category overrides on top of the defaults.

use std::collections::HashMap;

use crate::agent::role::AgentRole;
use crate::core::model::Model;

use super::category::TaskCategory;
use super::profile::ModelProfile;

/// Hard cap on distinct models tried by one agent execution.
pub const MAX_MODELS_PER_AGENT: usize = 3;

/// Ordered model preference for a task category.
pub fn model_sequence(category: TaskCategory) -> Vec<Model> {
    use Model::*;
    match category {
        TaskCategory::WebFrontend => vec![Gpt5Pro, ClaudeSonnet45, ClaudeOpus41],
        TaskCategory::BackendApi => vec![ClaudeOpus41, Gpt5Pro, ClaudeSonnet45],
        TaskCategory::DataScience => vec![Gpt5Pro, ClaudeOpus41, ClaudeSonnet45],
        TaskCategory::Mobile => vec![Gpt5Pro, ClaudeSonnet45, ClaudeOpus41],
        TaskCategory::DevOps => vec![ClaudeOpus41, Gpt5Pro, ClaudeSonnet45],
        TaskCategory::Database => vec![ClaudeOpus41, ClaudeSonnet45, Gpt5Pro],
        TaskCategory::General => vec![ClaudeSonnet45, Gpt5Pro, ClaudeOpus41],
    }
}

/// Models able to read images, in preference order.
pub fn vision_sequence() -> Vec<Model> {
    vec![Model::Gpt5, Model::Gpt5Image, Model::ClaudeSonnet45]
}

/// Decide whether to switch to the next model.
///
/// True when any of:
/// - the iteration budget is spent and the best score is below threshold
/// - the score regressed after at least two iterations
/// - the score improved by less than one point on the penultimate iteration
///   or later (plateau)
pub fn should_fallback(
    iterations_completed: u32,
    max_iterations: u32,
    best_score: f64,
    threshold: f64,
    score_improvement: f64,
) -> bool {
    if iterations_completed >= max_iterations && best_score < threshold {
        return true;
    }
    if score_improvement < 0.0 && iterations_completed >= 2 {
        return true;
    }
    score_improvement < 1.0 && iterations_completed >= max_iterations.saturating_sub(1)
}

/// Successor of `current` in `sequence`; `None` if last or absent.
pub fn next_in_sequence(sequence: &[Model], current: &Model) -> Option<Model> {
    let index = sequence.iter().position(|m| m == current)?;
    sequence.get(index + 1).cloned()
}

/// Successor of `current` in the default sequence for `category`.
pub fn next_model(
    current: &Model,
    category: TaskCategory,
    _attempts_with_current: u32,
) -> Option<Model> {
    next_in_sequence(&model_sequence(category), current)
}

/// Human-readable explanation of a fallback, for logs.
pub fn fallback_rationale(
    current: &Model,
    next: &Model,
    category: TaskCategory,
    best_score: f64,
    threshold: f64,
) -> String {
    let mut text = format!(
        "Model fallback: {current} (best score {best_score:.1}/100, threshold {threshold}) -> {next}. \
         {current} did not reach the quality threshold."
    );
    if let Some(profile) = ModelProfile::for_model(next) {
        let strengths: Vec<String> = profile.strengths.iter().take(3).map(|s| title_case(s)).collect();
        text.push_str(&format!(
            " {next} strengths for {category}: {}.",
            strengths.join(", ")
        ));
    }
    text
}

fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Model sequences with configured overrides applied.
#[derive(Debug, Clone, Default)]
pub struct ModelRoster {
    overrides: HashMap<TaskCategory, Vec<Model>>,
    vision: Option<Vec<Model>>,
}

impl ModelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence for one category.
    pub fn with_override(mut self, category: TaskCategory, models: Vec<Model>) -> Self {
        if !models.is_empty() {
            self.overrides.insert(category, models);
        }
        self
    }

    /// Replace the vision sequence.
    pub fn with_vision(mut self, models: Vec<Model>) -> Self {
        if !models.is_empty() {
            self.vision = Some(models);
        }
        self
    }

    /// Ordered, de-duplicated models for `role` on a `category` task, capped
    /// at [`MAX_MODELS_PER_AGENT`].
    pub fn sequence_for(&self, role: AgentRole, category: TaskCategory) -> Vec<Model> {
        let base = if role == AgentRole::Vision {
            self.vision.clone().unwrap_or_else(vision_sequence)
        } else {
            self.overrides
                .get(&category)
                .cloned()
                .unwrap_or_else(|| model_sequence(category))
        };
        let mut sequence: Vec<Model> = Vec::with_capacity(MAX_MODELS_PER_AGENT);
        for model in base {
            if !sequence.contains(&model) {
                sequence.push(model);
            }
            if sequence.len() == MAX_MODELS_PER_AGENT {
                break;
            }
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_have_three_distinct_models() {
        for category in TaskCategory::ALL {
            let seq = model_sequence(category);
            assert_eq!(seq.len(), 3);
            assert!(seq.iter().all(|m| seq.iter().filter(|n| *n == m).count() == 1));
        }
    }

    #[test]
    fn test_should_fallback_rules() {
        // Budget spent below threshold.
        assert!(should_fallback(3, 3, 72.0, 90.0, -1.0));
        // Regression after two iterations.
        assert!(should_fallback(2, 5, 80.0, 90.0, -0.5));
        // Plateau on the penultimate iteration.
        assert!(should_fallback(2, 3, 80.0, 90.0, 0.5));
        // Still improving with budget left.
        assert!(!should_fallback(2, 3, 72.0, 90.0, 2.0));
        assert!(!should_fallback(1, 3, 70.0, 90.0, 0.0));
    }

    #[test]
    fn test_plateau_scores_trigger_fallback() {
        // Scores 70, 72, 71 against a threshold of 90.
        assert!(!should_fallback(2, 3, 72.0, 90.0, 72.0 - 70.0));
        assert!(should_fallback(3, 3, 72.0, 90.0, 71.0 - 72.0));
    }

    #[test]
    fn test_should_fallback_monotonic_in_iterations() {
        let improvements = [-5.0, -0.1, 0.0, 0.5, 1.0, 3.0];
        for max in 1..=5u32 {
            for improvement in improvements {
                let mut fired = false;
                for i in 0..=8u32 {
                    let now = should_fallback(i, max, 60.0, 90.0, improvement);
                    assert!(!fired || now, "max={max} improvement={improvement} i={i}");
                    fired |= now;
                }
            }
        }
    }

    #[test]
    fn test_next_model() {
        let category = TaskCategory::WebFrontend;
        assert_eq!(next_model(&Model::Gpt5Pro, category, 3), Some(Model::ClaudeSonnet45));
        assert_eq!(next_model(&Model::ClaudeOpus41, category, 3), None);
        assert_eq!(next_model(&Model::Grok4, category, 1), None);
    }

    #[test]
    fn test_rationale_lists_strengths() {
        let text = fallback_rationale(
            &Model::Gpt5Pro,
            &Model::ClaudeSonnet45,
            TaskCategory::WebFrontend,
            72.0,
            90.0,
        );
        assert!(text.contains("best score 72.0/100"));
        assert!(text.contains("Architecture, Clean Code, Balanced"));
    }

    #[test]
    fn test_roster_overrides_and_cap() {
        let roster = ModelRoster::new().with_override(
            TaskCategory::General,
            vec![Model::Grok4, Model::Grok4, Model::Gpt4o, Model::Gpt5, Model::Gpt5Pro],
        );
        assert_eq!(
            roster.sequence_for(AgentRole::Testing, TaskCategory::General),
            vec![Model::Grok4, Model::Gpt4o, Model::Gpt5]
        );
        assert_eq!(
            roster.sequence_for(AgentRole::Testing, TaskCategory::BackendApi),
            model_sequence(TaskCategory::BackendApi)
        );
        assert!(
            roster
                .sequence_for(AgentRole::Vision, TaskCategory::General)
                .iter()
                .all(Model::supports_vision)
        );
    }
}
