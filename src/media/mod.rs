mod downloader;
mod error;
mod locate;
mod platform;
#[cfg(test)]
pub mod testing;
mod types;
mod workspace;
mod ytdlp;

pub use downloader::Extractor;
pub use error::DownloadError;
pub use types::{DownloadRequest, MediaFile, MediaKind, Platform};
pub use workspace::{TempWorkspaces, WorkspaceManager};
pub use ytdlp::YtDlpExtractor;

use crate::config::Config;
use crate::utils::format_size;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use workspace::WorkspaceGuard;

pub struct MediaDownloader {
    extractor: Arc<dyn Extractor>,
    workspaces: Arc<dyn WorkspaceManager>,
}

impl MediaDownloader {
    pub fn new(extractor: Arc<dyn Extractor>, workspaces: Arc<dyn WorkspaceManager>) -> Self {
        Self {
            extractor,
            workspaces,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let extractor = YtDlpExtractor::new(&config.extractor.binary)
            .with_extra_args(config.extractor.extra_args.clone())
            .with_timeout(config.extractor.timeout());
        let workspaces = TempWorkspaces::new(
            config.workspace.temp_dir.clone(),
            config.workspace.prefix.clone(),
        );

        info!(
            "Media downloader initialized - using {} with per-request workspaces",
            extractor.name()
        );

        Self::new(Arc::new(extractor), Arc::new(workspaces))
    }

    /// Runs one request end to end: validate, extract into a fresh workspace,
    /// locate and read the result. The workspace is gone by the time this returns.
    pub async fn download(&self, request: &DownloadRequest) -> Result<MediaFile, DownloadError> {
        if !platform::validate(&request.url, request.platform) {
            return Err(DownloadError::InvalidUrl(request.platform));
        }

        info!(
            "Starting {} {} download for URL: {}",
            request.platform, request.kind, request.url
        );

        let guard = WorkspaceGuard::acquire(self.workspaces.as_ref())?;
        let workspace = guard.workspace();

        self.extractor
            .extract(&request.url, request.kind, workspace)
            .await?;

        let result =
            locate::locate(workspace, request.kind, request.platform, &request.url).await?;
        let file = result.read().await?;

        info!(
            "Downloaded {} ({}) with {}",
            file.filename,
            format_size(file.data.len()),
            self.extractor.name()
        );
        Ok(file)
    }

    pub async fn test_setup(&self) -> Result<()> {
        info!("Testing media downloader setup...");

        if self.extractor.check_availability().await {
            info!("✅ {} is ready", self.extractor.name());
            Ok(())
        } else {
            warn!("Downloads will fail until {} is installed", self.extractor.name());
            Err(anyhow::anyhow!(
                "{} is not available. Please install it or set extractor.binary.",
                self.extractor.name()
            ))
        }
    }
}
