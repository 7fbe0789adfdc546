use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Watch (`?v=` / `&v=`), short link, `/embed/`, `/e/`, `/v/` and nested path forms.
static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("video id pattern must compile")
});

pub const VIDEO_ID_LEN: usize = 11;

/// Canonical 11-character video identifier. Only obtainable through [`extract_video_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoReference(String);

impl VideoReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finds a video identifier anywhere in `url`. `None` is an ordinary miss, not an error.
pub fn extract_video_id(url: &str) -> Option<VideoReference> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoReference(m.as_str().to_string()))
}
