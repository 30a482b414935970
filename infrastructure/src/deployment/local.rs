//! Deployment into a local directory.
//!
//! Each project lands in `<root>/<project_name>/`. A `launch.sh` script is
//! written next to the files when the project has a run command.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use swarm_application::{DeploymentError, DeploymentTarget};
use swarm_domain::{DeploymentReceipt, DeploymentRequest, ProjectArchetype};
use tracing::{debug, info};

const LAUNCH_SCRIPT: &str = "launch.sh";

/// Writes validated projects to disk.
#[derive(Debug, Clone)]
pub struct LocalWorkspaceDeployer {
    root: PathBuf,
}

impl LocalWorkspaceDeployer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A relative path with only normal components.
fn safe_relative(path: &str) -> Result<PathBuf, DeploymentError> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if safe {
        Ok(candidate.to_path_buf())
    } else {
        Err(DeploymentError::InvalidPath(path.to_string()))
    }
}

/// Project names become a single directory level.
fn project_dir_name(name: &str) -> Result<&str, DeploymentError> {
    let trimmed = name.trim();
    let single = matches!(
        Path::new(trimmed).components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if single {
        Ok(trimmed)
    } else {
        Err(DeploymentError::InvalidPath(name.to_string()))
    }
}

fn preview_port(archetype: ProjectArchetype) -> Option<u16> {
    match archetype {
        ProjectArchetype::NextAppRouter
        | ProjectArchetype::NextPagesRouter
        | ProjectArchetype::Express
        | ProjectArchetype::StaticHtml => Some(3000),
        ProjectArchetype::Vite => Some(5173),
        ProjectArchetype::Python | ProjectArchetype::Unknown => None,
    }
}

fn launch_script(run_command: &str) -> String {
    format!("#!/bin/sh\nset -e\ncd \"$(dirname \"$0\")\"\n{run_command}\n")
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl DeploymentTarget for LocalWorkspaceDeployer {
    async fn deploy(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentReceipt, DeploymentError> {
        let dir = self.root.join(project_dir_name(&request.project_name)?);

        // Check every path before touching the disk.
        let files = request
            .files
            .iter()
            .map(|(path, content)| Ok((safe_relative(path)?, content)))
            .collect::<Result<Vec<_>, DeploymentError>>()?;

        tokio::fs::create_dir_all(&dir).await?;
        for (relative, content) in &files {
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, content).await?;
            debug!("Wrote {}", target.display());
        }

        if let Some(command) = &request.run_command
            && !request.files.contains(LAUNCH_SCRIPT)
        {
            let script = dir.join(LAUNCH_SCRIPT);
            tokio::fs::write(&script, launch_script(command)).await?;
            make_executable(&script).await?;
        }

        let preview_url = request
            .run_command
            .as_ref()
            .and(preview_port(request.archetype))
            .map(|port| format!("http://localhost:{port}"));

        info!(
            "Deployed {} files ({}) to {}",
            files.len(),
            request.archetype,
            dir.display()
        );

        Ok(DeploymentReceipt {
            location: dir.display().to_string(),
            files_written: files.len(),
            run_command: request.run_command.clone(),
            preview_url,
        })
    }
}
