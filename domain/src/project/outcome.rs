//! Validation outcomes.

use serde::Serialize;
use thiserror::Error;

use super::file_map::ValidatedFiles;

/// A reference from one file to a path that is not in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReference {
    pub source_file: String,
    /// The reference exactly as written in the source file.
    pub missing_path: String,
}

impl MissingReference {
    pub fn new(source_file: impl Into<String>, missing_path: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            missing_path: missing_path.into(),
        }
    }
}

/// Why a file map was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "details", rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("{} file reference(s) point to files that do not exist", .0.len())]
    MissingFileReferences(Vec<MissingReference>),

    #[error("missing required project files: {}", .0.join(", "))]
    MissingRequiredFiles(Vec<String>),

    #[error("could not parse files from output: {0}")]
    ParseFailure(String),
}

impl ValidationFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFileReferences(_) => "missing_file_references",
            ValidationFailure::MissingRequiredFiles(_) => "missing_required_files",
            ValidationFailure::ParseFailure(_) => "parse_failure",
        }
    }

    /// Structured description suitable for an improvement prompt.
    pub fn feedback(&self) -> String {
        match self {
            ValidationFailure::MissingFileReferences(missing) => {
                let mut text = String::from(
                    "The previous output referenced files that were not provided:\n",
                );
                for m in missing {
                    text.push_str(&format!("- {} imports '{}'\n", m.source_file, m.missing_path));
                }
                text.push_str(
                    "Either add each missing file with its own file marker or remove the reference.",
                );
                text
            }
            ValidationFailure::MissingRequiredFiles(paths) => {
                let mut text =
                    String::from("The project is missing required entry-point files:\n");
                for path in paths {
                    text.push_str(&format!("- {path}\n"));
                }
                text.push_str("Add every listed file so the project can start.");
                text
            }
            ValidationFailure::ParseFailure(reason) => format!(
                "The previous output could not be split into files ({reason}).\n\
                 Start every file with a marker line such as `// file: src/main.js`."
            ),
        }
    }
}

/// Result of validating one multi-file output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok(ValidatedFiles),
    MissingFileReferences(Vec<MissingReference>),
    MissingRequiredFiles(Vec<String>),
    ParseFailure(String),
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok(_))
    }

    pub fn into_result(self) -> Result<ValidatedFiles, ValidationFailure> {
        match self {
            ValidationOutcome::Ok(files) => Ok(files),
            ValidationOutcome::MissingFileReferences(m) => {
                Err(ValidationFailure::MissingFileReferences(m))
            }
            ValidationOutcome::MissingRequiredFiles(p) => {
                Err(ValidationFailure::MissingRequiredFiles(p))
            }
            ValidationOutcome::ParseFailure(r) => Err(ValidationFailure::ParseFailure(r)),
        }
    }
}
