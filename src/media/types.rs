use super::error::DownloadError;
use super::platform;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// File name stem the extractor writes into the workspace.
    pub fn stem(&self) -> &'static str {
        self.as_str()
    }

    /// Extension advertised to the client. The extractor picks the real container.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Audio => "mp3",
            MediaKind::Video => "mp4",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio/mpeg",
            MediaKind::Video => "video/mp4",
        }
    }
}

impl FromStr for MediaKind {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            _ => Err(DownloadError::InvalidMediaKind),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl Platform {
    /// Lowercase name used in routes and generated filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            _ => Err(format!("Unsupported platform: {s}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub platform: Platform,
    pub url: String,
    pub kind: MediaKind,
}

impl DownloadRequest {
    pub fn new(platform: Platform, url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            platform,
            url: url.into(),
            kind,
        }
    }

    /// Checks the URL against the platform pattern, then the requested kind.
    pub fn parse(platform: Platform, url: &str, kind: &str) -> Result<Self, DownloadError> {
        if !platform::validate(url, platform) {
            return Err(DownloadError::InvalidUrl(platform));
        }
        let kind = kind.parse::<MediaKind>()?;
        Ok(Self::new(platform, url, kind))
    }
}

/// A downloaded file, read fully into memory so it outlives its workspace.
#[derive(Debug)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}
