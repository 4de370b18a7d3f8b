use super::{downloader::Extractor, error::DownloadError, types::MediaKind, workspace::Workspace};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub struct YtDlpExtractor {
    binary: PathBuf,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
            timeout: None,
        }
    }

    /// Arguments placed ahead of the generated ones (cookies, proxy, ...).
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_args(&self, url: &str, kind: MediaKind, dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();

        match kind {
            MediaKind::Audio => {
                args.extend(
                    ["-x", "--audio-format", "mp3", "--audio-quality", "0"]
                        .into_iter()
                        .map(OsString::from),
                );
            }
            MediaKind::Video => {
                args.extend(["-f", "best[ext=mp4]/best"].into_iter().map(OsString::from));
            }
        }

        // yt-dlp resolves %(ext)s to whatever container it ends up writing
        let template = dir.join(format!("{}.%(ext)s", kind.stem()));
        args.push("-o".into());
        args.push(template.into_os_string());
        args.push(url.into());
        args
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(
        &self,
        url: &str,
        kind: MediaKind,
        workspace: &Workspace,
    ) -> Result<(), DownloadError> {
        let args = self.build_args(url, kind, workspace.path());
        debug!("Running {} {:?}", self.binary.display(), args);

        let mut command = Command::new(&self.binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| DownloadError::Timeout {
                    tool: self.name(),
                    secs: limit.as_secs(),
                })?,
            None => command.output().await,
        }
        .map_err(|source| DownloadError::Spawn {
            tool: self.name(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            warn!("{} exited with {} for {}", self.name(), output.status, url);
            return Err(DownloadError::Extraction {
                tool: self.name(),
                output: combined,
            });
        }

        debug!("{} output: {}", self.name(), combined);
        info!("Extracted {} from {}", kind, url);
        Ok(())
    }

    async fn check_availability(&self) -> bool {
        let ytdlp_available = match probe_version(self.binary.as_os_str(), "--version").await {
            Some(version) => {
                info!("✅ yt-dlp is available, version: {}", version);
                true
            }
            None => {
                warn!("❌ yt-dlp not found at {}", self.binary.display());
                false
            }
        };

        // Required for the mp3 transcode and for merging video streams
        match probe_version(OsStr::new("ffmpeg"), "-version").await {
            Some(version) => info!("✅ ffmpeg is available: {}", version),
            None => warn!("⚠️  ffmpeg not found, audio downloads will fail"),
        }

        ytdlp_available
    }
}

/// Runs `<program> <flag>` and returns the first line of its output on success.
async fn probe_version(program: &OsStr, flag: &str) -> Option<String> {
    let output = Command::new(program).arg(flag).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(stdout.lines().next().unwrap_or("unknown").trim().to_string())
}
