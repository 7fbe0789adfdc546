use serde::{Deserialize, Serialize};

/// One timed caption unit, in seconds from the start of the video.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub offset: f64,
    pub duration: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResult {
    pub transcript: Vec<TranscriptSegment>,
    pub title: String,
    pub channel_name: String,
    pub channel_id: String,
    pub length_seconds: u64,
    pub publish_date: String,
    pub is_live: bool,
    pub is_login_required: bool,
}

impl TranscriptResult {
    /// Segment texts joined with single spaces, in order. This is what gets summarized.
    pub fn full_text(&self) -> String {
        self.transcript
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioResult {
    /// Base64 (standard alphabet, padded).
    pub audio: String,
    pub content_type: String,
}
