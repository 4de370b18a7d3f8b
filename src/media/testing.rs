//! Fakes for exercising the download pipeline without yt-dlp.

use super::{
    downloader::Extractor,
    error::DownloadError,
    types::MediaKind,
    workspace::{TempWorkspaces, Workspace, WorkspaceManager},
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub enum FakeBehavior {
    /// Write `<stem>.<ext>` with the given bytes and succeed.
    Write { ext: &'static str, data: Vec<u8> },
    /// Exit non-zero with this output.
    Fail(&'static str),
    /// Report success without writing anything.
    Silent,
    /// Leave a directory named `<stem>.<ext>`, which locates but cannot be read.
    WriteDir { ext: &'static str },
    /// Never finish.
    Hang,
}

pub struct FakeExtractor {
    behavior: FakeBehavior,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn extract(
        &self,
        _url: &str,
        kind: MediaKind,
        workspace: &Workspace,
    ) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FakeBehavior::Write { ext, data } => {
                let path = workspace.path().join(format!("{}.{}", kind.stem(), ext));
                std::fs::write(path, data).map_err(|source| DownloadError::Spawn {
                    tool: "fake",
                    source,
                })
            }
            FakeBehavior::Fail(output) => Err(DownloadError::Extraction {
                tool: "fake",
                output: output.to_string(),
            }),
            FakeBehavior::Silent => Ok(()),
            FakeBehavior::WriteDir { ext } => {
                let path = workspace.path().join(format!("{}.{}", kind.stem(), ext));
                std::fs::create_dir(path).map_err(|source| DownloadError::Spawn {
                    tool: "fake",
                    source,
                })
            }
            FakeBehavior::Hang => std::future::pending().await,
        }
    }

    async fn check_availability(&self) -> bool {
        true
    }
}

/// Real temp workspaces that remember every create and destroy.
pub struct RecordingWorkspaces {
    inner: TempWorkspaces,
    created: Mutex<Vec<PathBuf>>,
    destroyed: Mutex<Vec<PathBuf>>,
}

impl RecordingWorkspaces {
    pub fn new() -> Self {
        Self {
            inner: TempWorkspaces::new(None, "grabby-test-"),
            created: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<PathBuf> {
        self.destroyed.lock().unwrap().clone()
    }
}

impl WorkspaceManager for RecordingWorkspaces {
    fn create(&self) -> Result<Workspace, DownloadError> {
        let workspace = self.inner.create()?;
        self.created
            .lock()
            .unwrap()
            .push(workspace.path().to_path_buf());
        Ok(workspace)
    }

    fn destroy(&self, workspace: Workspace) {
        self.destroyed
            .lock()
            .unwrap()
            .push(workspace.path().to_path_buf());
        self.inner.destroy(workspace);
    }
}
