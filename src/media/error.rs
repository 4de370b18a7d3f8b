use super::types::Platform;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Invalid {0} URL")]
    InvalidUrl(Platform),

    #[error("Invalid download type. Use 'audio' or 'video'")]
    InvalidMediaKind,

    #[error("failed to create temp directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {output}")]
    Extraction { tool: &'static str, output: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("failed to find downloaded file")]
    NotFound,

    #[error("failed to read downloaded file: {0}")]
    Read(#[source] std::io::Error),
}

impl DownloadError {
    /// Whether the request itself was at fault, as opposed to the server or the tool.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DownloadError::InvalidUrl(_) | DownloadError::InvalidMediaKind
        )
    }
}
