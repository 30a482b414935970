//! Per-category model sequences from TOML (`[models]` section)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swarm_domain::{ConfigIssue, ConfigIssueCode, MAX_MODELS_PER_AGENT, Model, ModelRoster, TaskCategory};

/// Model sequence overrides
///
/// Each key names a task category; the list replaces that category's
/// built-in fallback order. `vision` replaces the vision agent's order.
///
/// # Example
///
/// ```toml
/// [models]
/// web_frontend = ["claude-sonnet-4.5", "gpt-5", "grok-4"]
/// general = ["gpt-4o", "meta-llama/llama-3-70b-instruct"]
/// vision = ["gpt-5-image", "gpt-4o"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Vision agent sequence
    pub vision: Option<Vec<String>>,
    /// Category name -> model sequence
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl FileModelsConfig {
    /// Parse a model list, collecting issues for blank names and lengths
    /// the loop will not use.
    fn parse_model_list(field: &str, values: &[String]) -> (Vec<Model>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut models = Vec::new();
        for s in values {
            if s.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    format!("models.{}: model name cannot be empty in list", field),
                ));
            } else {
                models.push(Model::from(s.trim()));
            }
        }
        if values.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyModelSequence,
                format!("models.{}: empty list, using the built-in sequence", field),
            ));
        } else if models.len() > MAX_MODELS_PER_AGENT {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ModelSequenceTruncated,
                format!(
                    "models.{}: only the first {} models are tried",
                    field, MAX_MODELS_PER_AGENT
                ),
            ));
        }
        (models, issues)
    }

    /// Build the model roster with every valid override applied.
    pub fn to_roster(&self) -> (ModelRoster, Vec<ConfigIssue>) {
        let mut roster = ModelRoster::new();
        let mut issues = Vec::new();

        for (key, values) in &self.categories {
            let Ok(category) = key.parse::<TaskCategory>() else {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownCategory,
                    format!(
                        "models.{}: unknown task category, expected one of {}",
                        key,
                        TaskCategory::ALL.map(|c| c.as_str()).join(", ")
                    ),
                ));
                continue;
            };
            let (models, list_issues) = Self::parse_model_list(key, values);
            issues.extend(list_issues);
            roster = roster.with_override(category, models);
        }

        if let Some(values) = &self.vision {
            let (models, list_issues) = Self::parse_model_list("vision", values);
            issues.extend(list_issues);
            roster = roster.with_vision(models);
        }

        (roster, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_domain::AgentRole;

    fn parse(toml_str: &str) -> FileModelsConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_category_override_applies() {
        let config = parse(
            r#"
general = ["gpt-4o", "meta-llama/llama-3-70b-instruct"]
"#,
        );
        let (roster, issues) = config.to_roster();
        assert!(issues.is_empty());
        assert_eq!(
            roster.sequence_for(AgentRole::Architecture, TaskCategory::General),
            vec![
                Model::Gpt4o,
                Model::Custom("meta-llama/llama-3-70b-instruct".to_string())
            ]
        );
    }

    #[test]
    fn test_vision_override_applies() {
        let config = parse(r#"vision = ["gpt-4o"]"#);
        let (roster, issues) = config.to_roster();
        assert!(issues.is_empty());
        assert_eq!(
            roster.sequence_for(AgentRole::Vision, TaskCategory::WebFrontend),
            vec![Model::Gpt4o]
        );
    }

    #[test]
    fn test_unknown_category_is_warned_and_skipped() {
        let config = parse(r#"games = ["gpt-4o"]"#);
        let (_, issues) = config.to_roster();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownCategory);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_blank_name_is_error() {
        let config = parse(r#"database = ["gpt-4o", "  "]"#);
        let (roster, issues) = config.to_roster();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyModelName);
        assert!(issues[0].is_error());
        assert_eq!(
            roster.sequence_for(AgentRole::Testing, TaskCategory::Database),
            vec![Model::Gpt4o]
        );
    }

    #[test]
    fn test_empty_and_long_lists_are_warned() {
        let config = parse(
            r#"
mobile = []
devops = ["gpt-4o", "gpt-5", "grok-4", "claude-opus-4.1"]
"#,
        );
        let (roster, issues) = config.to_roster();
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::EmptyModelSequence));
        assert!(codes.contains(&ConfigIssueCode::ModelSequenceTruncated));
        assert_eq!(
            roster
                .sequence_for(AgentRole::Security, TaskCategory::DevOps)
                .len(),
            MAX_MODELS_PER_AGENT
        );
    }
}
