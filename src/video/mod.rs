use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Matches both `youtube.com/watch?v=<id>` and `youtu.be/<id>` shapes
const VIDEO_ID_PATTERN: &str = r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]+)";

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VIDEO_ID_PATTERN).expect("video id pattern is valid"))
}

/// A video identifier extracted from a YouTube URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoReference(String);

impl VideoReference {
    /// Parse a free-form URL into a video reference
    ///
    /// Returns `None` when neither the watch form nor the short-link form is present.
    pub fn from_url(url: &str) -> Option<Self> {
        extract_video_id(url).map(Self)
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Embeddable player URL, used for the video preview
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.0)
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video identifier from a YouTube URL
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
