use super::types::{MediaKind, Platform};
use regex::Regex;
use std::sync::LazyLock;

/// URL shape accepted for a platform, plus the expressions that pull a
/// content id out of it. Extractors are tried in order.
pub struct PlatformPattern {
    validator: Regex,
    id_extractors: Vec<Regex>,
}

static INSTAGRAM: LazyLock<PlatformPattern> = LazyLock::new(|| PlatformPattern {
    validator: Regex::new(r"^https?://(www\.)?instagram\.com/(reel|reels|p)/[A-Za-z0-9_-]+/?")
        .unwrap(),
    id_extractors: vec![Regex::new(r"instagram\.com/(?:reel|reels|p)/([A-Za-z0-9_-]+)").unwrap()],
});

// Any tiktok.com path is accepted (short links included); only full video
// links carry an id.
static TIKTOK: LazyLock<PlatformPattern> = LazyLock::new(|| PlatformPattern {
    validator: Regex::new(r"^https?://(www\.|vm\.)?tiktok\.com/").unwrap(),
    id_extractors: vec![Regex::new(r"tiktok\.com/@[^/]+/video/(\d+)").unwrap()],
});

static YOUTUBE: LazyLock<PlatformPattern> = LazyLock::new(|| PlatformPattern {
    validator: Regex::new(
        r"^https?://(www\.)?(youtube\.com/(watch\?v=|shorts/)|youtu\.be/)[A-Za-z0-9_-]+",
    )
    .unwrap(),
    id_extractors: vec![
        Regex::new(r"youtube\.com/watch\?v=([A-Za-z0-9_-]+)").unwrap(),
        Regex::new(r"youtu\.be/([A-Za-z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/shorts/([A-Za-z0-9_-]+)").unwrap(),
    ],
});

impl PlatformPattern {
    pub fn for_platform(platform: Platform) -> &'static PlatformPattern {
        match platform {
            Platform::Instagram => &INSTAGRAM,
            Platform::TikTok => &TIKTOK,
            Platform::YouTube => &YOUTUBE,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        self.validator.is_match(url)
    }

    pub fn extract_id(&self, url: &str) -> Option<String> {
        self.id_extractors.iter().find_map(|re| {
            re.captures(url)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    }
}

pub fn validate(url: &str, platform: Platform) -> bool {
    PlatformPattern::for_platform(platform).matches(url)
}

pub fn extract_id(url: &str, platform: Platform) -> Option<String> {
    PlatformPattern::for_platform(platform).extract_id(url)
}

/// Name offered to the client, e.g. `instagram_ABC123_audio.mp3`.
/// Falls back to `<platform>_<kind>.<ext>` when the URL carries no id.
pub fn suggested_filename(url: &str, platform: Platform, kind: MediaKind) -> String {
    match extract_id(url, platform) {
        Some(id) => format!(
            "{}_{}_{}.{}",
            platform.slug(),
            id,
            kind.as_str(),
            kind.extension()
        ),
        None => format!("{}_{}.{}", platform.slug(), kind.as_str(), kind.extension()),
    }
}
