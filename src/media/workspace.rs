use super::error::DownloadError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Temporary directory owned by a single download request.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new(dir: TempDir) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub trait WorkspaceManager: Send + Sync {
    fn create(&self) -> Result<Workspace, DownloadError>;

    /// Removes the workspace. Failures are logged, never returned: by the time
    /// this runs the response is usually already decided.
    fn destroy(&self, workspace: Workspace);
}

/// Creates workspaces under the system temp dir, or under a configured parent.
pub struct TempWorkspaces {
    parent: Option<PathBuf>,
    prefix: String,
}

impl TempWorkspaces {
    pub fn new(parent: Option<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            parent,
            prefix: prefix.into(),
        }
    }
}

impl WorkspaceManager for TempWorkspaces {
    fn create(&self) -> Result<Workspace, DownloadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix);

        let dir = match &self.parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(DownloadError::Workspace)?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Workspace::new(dir))
    }

    fn destroy(&self, workspace: Workspace) {
        let path = workspace.path().to_path_buf();
        match workspace.dir.close() {
            Ok(()) => debug!("Removed workspace {}", path.display()),
            Err(e) => warn!("Failed to remove workspace {}: {}", path.display(), e),
        }
    }
}

/// Scope for one workspace. Dropping the guard hands the workspace back to
/// its manager, so teardown runs exactly once whichever way the request ends.
pub struct WorkspaceGuard<'m> {
    manager: &'m dyn WorkspaceManager,
    workspace: Option<Workspace>,
}

impl<'m> WorkspaceGuard<'m> {
    pub fn acquire(manager: &'m dyn WorkspaceManager) -> Result<Self, DownloadError> {
        let workspace = manager.create()?;
        Ok(Self {
            manager,
            workspace: Some(workspace),
        })
    }

    pub fn workspace(&self) -> &Workspace {
        // Only `drop` takes the workspace out.
        self.workspace
            .as_ref()
            .unwrap_or_else(|| unreachable!("workspace already released"))
    }
}

impl Drop for WorkspaceGuard<'_> {
    fn drop(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            self.manager.destroy(workspace);
        }
    }
}
