//! Deployment requests built from validated agent output.

use serde::{Deserialize, Serialize};

use crate::agent::output::AgentOutput;
use crate::core::error::DomainError;

use super::archetype::ProjectArchetype;
use super::file_map::ValidatedFiles;

/// Everything a deployment target receives: validated files and how to run them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentRequest {
    pub project_name: String,
    pub files: ValidatedFiles,
    pub archetype: ProjectArchetype,
    pub run_command: Option<String>,
}

impl DeploymentRequest {
    /// Build a request from an agent output.
    ///
    /// Fails with [`DomainError::NotDeployable`] when the output carries no
    /// validated files; raw text is never deployed.
    pub fn from_output(
        output: &AgentOutput,
        project_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let files = output
            .parsed_files()
            .cloned()
            .ok_or_else(|| DomainError::NotDeployable(output.agent_name().to_string()))?;
        let archetype = ProjectArchetype::detect(files.as_map());
        let run_command = archetype.run_command(files.as_map());
        Ok(Self {
            project_name: project_name.into(),
            files,
            archetype,
            run_command,
        })
    }
}

/// What a deployment target reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReceipt {
    /// Where the files landed (directory, workspace id, URL).
    pub location: String,
    pub files_written: usize,
    pub run_command: Option<String>,
    /// Preview URL, when the target starts the project.
    pub preview_url: Option<String>,
}
