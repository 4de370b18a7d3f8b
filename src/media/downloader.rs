use super::{error::DownloadError, types::MediaKind, workspace::Workspace};
use async_trait::async_trait;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of the extraction tool
    fn name(&self) -> &'static str;

    /// Fetch `url` into `workspace` as `<kind>.<ext>`. The tool picks the extension.
    async fn extract(
        &self,
        url: &str,
        kind: MediaKind,
        workspace: &Workspace,
    ) -> Result<(), DownloadError>;

    /// Test if the tool and its helpers are available on the system
    async fn check_availability(&self) -> bool;
}
