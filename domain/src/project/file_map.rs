//! File maps produced from multi-file model output.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parsing::markers::render_sections;

/// Relative path → file content, ordered by path.
pub type FileMap = BTreeMap<String, String>;

/// A file map that passed validation.
///
/// Only the file validator can construct this type, so an
/// [`AgentOutput`](crate::agent::AgentOutput) carrying it is guaranteed to
/// hold a structurally complete project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedFiles(FileMap);

impl ValidatedFiles {
    pub(crate) fn new(files: FileMap) -> Self {
        Self(files)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &FileMap {
        &self.0
    }

    pub fn into_map(self) -> FileMap {
        self.0
    }

    /// Render back to a canonical marker-delimited blob.
    pub fn to_marked_text(&self) -> String {
        render_sections(self.iter())
    }
}
