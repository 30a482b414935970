//! Workflow configuration from TOML (`[workflow]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional workflow steps and where their data lives
///
/// # Example
///
/// ```toml
/// [workflow]
/// doc_search = true
/// store_patterns = true
/// rag_limit = 5
/// pattern_store_path = "~/.local/share/codeswarm/patterns.json"
/// learning = true
/// learning_dir = "~/.local/share/codeswarm/learning"
/// deploy_dir = "./generated"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    pub doc_search: bool,
    pub store_patterns: bool,
    /// Stored patterns retrieved as context per run
    pub rag_limit: usize,
    /// Pattern file; defaults to the user data directory
    pub pattern_store_path: Option<PathBuf>,
    /// Record run outcomes in the learning history
    pub learning: bool,
    /// Learning history directory; defaults to the user data directory
    pub learning_dir: Option<PathBuf>,
    /// Root directory deployed projects are written under
    pub deploy_dir: PathBuf,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            doc_search: true,
            store_patterns: true,
            rag_limit: 5,
            pattern_store_path: None,
            learning: true,
            learning_dir: None,
            deploy_dir: PathBuf::from("generated"),
        }
    }
}

impl FileWorkflowConfig {
    /// Configured pattern file, or `<data dir>/codeswarm/patterns.json`.
    pub fn resolved_pattern_store_path(&self) -> Option<PathBuf> {
        self.pattern_store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("codeswarm").join("patterns.json")))
    }

    /// Configured learning directory, or `<data dir>/codeswarm/learning`.
    pub fn resolved_learning_dir(&self) -> Option<PathBuf> {
        self.learning_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("codeswarm").join("learning")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileWorkflowConfig::default();
        assert!(config.doc_search);
        assert!(config.store_patterns);
        assert_eq!(config.rag_limit, 5);
        assert!(config.learning);
        assert_eq!(config.deploy_dir, PathBuf::from("generated"));
    }

    #[test]
    fn test_explicit_pattern_path_wins() {
        let config = FileWorkflowConfig {
            pattern_store_path: Some(PathBuf::from("/tmp/patterns.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_pattern_store_path(),
            Some(PathBuf::from("/tmp/patterns.json"))
        );
    }

    #[test]
    fn test_learning_section_from_toml() {
        let config: FileWorkflowConfig =
            toml::from_str("learning = false\nlearning_dir = \"/tmp/learning\"").unwrap();
        assert!(!config.learning);
        assert_eq!(
            config.resolved_learning_dir(),
            Some(PathBuf::from("/tmp/learning"))
        );
    }
}
