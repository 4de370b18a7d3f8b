use super::{
    error::DownloadError,
    platform,
    types::{MediaFile, MediaKind, Platform},
    workspace::Workspace,
};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file the extractor left in a workspace. Borrows the workspace, so it
/// cannot be used once the workspace has been torn down.
#[derive(Debug)]
pub struct DownloadResult<'w> {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub suggested_filename: String,
    workspace: PhantomData<&'w Workspace>,
}

impl DownloadResult<'_> {
    /// Reads the whole file. The workspace must still be alive, which the
    /// borrow guarantees.
    pub async fn read(self) -> Result<MediaFile, DownloadError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(DownloadError::Read)?;

        Ok(MediaFile {
            filename: self.suggested_filename,
            content_type: self.content_type,
            data,
        })
    }
}

/// Finds `<stem>.*` in the workspace. Entries are taken in name order and the
/// first match wins; sidecar files sharing the stem are not disambiguated.
pub async fn locate<'w>(
    workspace: &'w Workspace,
    kind: MediaKind,
    platform: Platform,
    url: &str,
) -> Result<DownloadResult<'w>, DownloadError> {
    let prefix = format!("{}.", kind.stem());

    let mut entries = tokio::fs::read_dir(workspace.path()).await.map_err(|e| {
        warn!("Failed to list workspace {}: {}", workspace.path().display(), e);
        DownloadError::NotFound
    })?;

    let mut listing = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => listing.push(Ok(entry.path())),
            Ok(None) => break,
            Err(e) => {
                listing.push(Err(e));
                break;
            }
        }
    }

    let path = first_match(listing, &prefix, workspace.path())?;
    debug!("Located {}", path.display());

    Ok(DownloadResult {
        path,
        content_type: kind.content_type(),
        suggested_filename: platform::suggested_filename(url, platform, kind),
        workspace: PhantomData,
    })
}

/// Picks the first `<prefix>*` entry by name. A listing that failed partway
/// is not trusted at all.
fn first_match(
    listing: impl IntoIterator<Item = io::Result<PathBuf>>,
    prefix: &str,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let mut matches = Vec::new();
    for entry in listing {
        let path = entry.map_err(|e| {
            warn!("Failed to list workspace {}: {}", dir.display(), e);
            DownloadError::NotFound
        })?;
        let is_match = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with(prefix));
        if is_match {
            matches.push(path);
        }
    }
    matches.sort();

    if matches.len() > 1 {
        debug!("Multiple {}* files in workspace: {:?}", prefix, matches);
    }

    matches.into_iter().next().ok_or(DownloadError::NotFound)
}
