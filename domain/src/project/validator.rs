//! File validator for multi-file implementation output.

use tracing::warn;

use crate::agent::validation::OutputValidator;
use crate::parsing::markers::{MarkerStyle, split_sections};

use super::archetype::ProjectArchetype;
use super::file_map::{FileMap, ValidatedFiles};
use super::outcome::{ValidationFailure, ValidationOutcome};
use super::references::find_missing;

/// Validates marker-delimited output as a complete project.
///
/// Checks run in order and the first failing check decides the outcome:
/// parse, cross-file references, archetype entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileValidator;

impl FileValidator {
    pub fn new() -> Self {
        Self
    }

    /// Split a marker-delimited blob into a file map.
    ///
    /// Empty bodies are dropped; when a path repeats, the later non-empty
    /// body wins. The second element lists paths dropped for being empty.
    pub fn parse_files(text: &str) -> (FileMap, Vec<String>) {
        let mut files = FileMap::new();
        let mut dropped = Vec::new();
        for section in split_sections(text, MarkerStyle::Lenient) {
            if section.content.is_empty() {
                dropped.push(section.path);
            } else {
                files.insert(section.path, section.content);
            }
        }
        dropped.retain(|path| !files.contains_key(path));
        (files, dropped)
    }

    /// Validate marker-delimited text.
    pub fn validate(&self, text: &str) -> ValidationOutcome {
        let (files, dropped) = Self::parse_files(text);
        for path in &dropped {
            warn!(path = %path, "Dropping empty file section");
        }
        if files.is_empty() {
            let reason = if dropped.is_empty() {
                "no file markers found".to_string()
            } else {
                format!("all {} file section(s) were empty", dropped.len())
            };
            return ValidationOutcome::ParseFailure(reason);
        }
        self.validate_map(files)
    }

    /// Validate an already-split file map.
    pub fn validate_map(&self, files: FileMap) -> ValidationOutcome {
        if files.is_empty() {
            return ValidationOutcome::ParseFailure("no files".to_string());
        }

        let missing = find_missing(&files);
        if !missing.is_empty() {
            return ValidationOutcome::MissingFileReferences(missing);
        }

        let archetype = ProjectArchetype::detect(&files);
        let required = archetype.missing_required(&files);
        if !required.is_empty() {
            return ValidationOutcome::MissingRequiredFiles(required);
        }

        ValidationOutcome::Ok(ValidatedFiles::new(files))
    }
}

impl OutputValidator for FileValidator {
    fn validate(&self, code: &str) -> Result<Option<ValidatedFiles>, ValidationFailure> {
        FileValidator::validate(self, code).into_result().map(Some)
    }
}
