use reqwest::{Client, StatusCode};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::modules::transcript::model::{TranscriptResult, TranscriptSegment};
use crate::services::video_id::VideoReference;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Could not extract video ID from the provided URL.")]
    VideoIdNotFound,
    #[error("Transcript unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptError::Unavailable(e.to_string())
    }
}

// Provider wire shapes.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_login_required: bool,
    pub microformat: Option<Microformat>,
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microformat {
    pub player_microformat_renderer: PlayerMicroformatRenderer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMicroformatRenderer {
    #[serde(default)]
    pub owner_channel_name: String,
    #[serde(default)]
    pub external_channel_id: String,
    #[serde(default, deserialize_with = "seconds")]
    pub length_seconds: f64,
    #[serde(default)]
    pub publish_date: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub transcript: Vec<RawSegment>,
}

/// A caption as the provider sends it; `start` and `dur` usually arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct RawSegment {
    pub text: String,
    #[serde(deserialize_with = "seconds")]
    pub start: f64,
    #[serde(deserialize_with = "seconds")]
    pub dur: f64,
}

fn seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("seconds out of range: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| de::Error::custom(format!("invalid seconds value: {:?}", s))),
        other => Err(de::Error::custom(format!("invalid seconds value: {}", other))),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
}

#[derive(Debug, Serialize)]
struct TranscriptsRequest<'a> {
    ids: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Detail { message: String },
    Text(String),
}

// Longest non-JSON error body passed through to callers.
const MAX_PLAIN_ERROR_LEN: usize = 200;

async fn provider_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_message(status, &body)
}

/// Error text for a failed provider response. Markup and oversized bodies collapse to the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { error: ApiErrorBody::Detail { message } }) => message,
        Ok(ApiErrorResponse { error: ApiErrorBody::Text(message) }) => message,
        Err(_) => {
            let text = body.trim();
            if text.is_empty() || text.starts_with('<') || text.chars().count() > MAX_PLAIN_ERROR_LEN {
                format!("provider responded with {}", status)
            } else {
                text.to_string()
            }
        }
    }
}

/// Transcript provider client before its readiness handshake.
///
/// A client is created per request. Call [`TranscriptClient::ready`] to complete the
/// handshake; only the returned [`ReadyTranscriptClient`] can issue transcript requests.
pub struct TranscriptClient {
    client: Client,
    base_url: String,
    auth_url: String,
    api_key: Option<String>,
}

impl TranscriptClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.transcript_base_url.clone(),
            auth_url: settings.transcript_auth_url.clone(),
            api_key: settings.transcript_api_key.clone(),
        }
    }

    /// Opens an anonymous provider session and yields a client that holds its token.
    pub async fn ready(self) -> Result<ReadyTranscriptClient, TranscriptError> {
        debug!(auth_url = %self.auth_url, "transcript client handshake");

        let mut request = self
            .client
            .post(&self.auth_url)
            .json(&SignUpRequest { return_secure_token: true });

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let message = provider_message(response).await;
            return Err(TranscriptError::Unavailable(format!(
                "provider handshake failed: {}",
                message
            )));
        }

        let session: SignUpResponse = response.json().await?;

        Ok(ReadyTranscriptClient {
            client: self.client,
            base_url: self.base_url,
            token: session.id_token,
        })
    }
}

pub struct ReadyTranscriptClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ReadyTranscriptClient {
    pub async fn get_transcript(&self, video: &VideoReference) -> Result<VideoInfo, TranscriptError> {
        let mut videos = self.bulk_get_transcript(std::slice::from_ref(video)).await?;

        if videos.is_empty() {
            return Err(TranscriptError::Unavailable(format!(
                "no video information returned for {}",
                video
            )));
        }

        // An entry without an id is accepted only when it is the sole answer.
        let position = videos
            .iter()
            .position(|v| v.id == video.as_str())
            .or_else(|| (videos.len() == 1 && videos[0].id.is_empty()).then_some(0))
            .ok_or_else(|| {
                TranscriptError::Unavailable(format!("provider returned a different video than {}", video))
            })?;

        Ok(videos.swap_remove(position))
    }

    pub async fn bulk_get_transcript(
        &self,
        videos: &[VideoReference],
    ) -> Result<Vec<VideoInfo>, TranscriptError> {
        let request = TranscriptsRequest {
            ids: videos.iter().map(VideoReference::as_str).collect(),
        };

        let response = self
            .client
            .post(format!("{}/transcripts", self.base_url))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscriptError::Unavailable(provider_message(response).await));
        }

        Ok(response.json().await?)
    }
}

/// Fetches and normalizes the transcript of one video with a fresh provider client.
pub async fn fetch_transcript(
    settings: &Settings,
    video: &VideoReference,
) -> Result<TranscriptResult, TranscriptError> {
    let client = TranscriptClient::new(settings).ready().await?;
    let info = client.get_transcript(video).await?;
    normalize(info)
}

/// Flattens provider video info into a [`TranscriptResult`].
///
/// Only the first track is used; there is no language negotiation.
pub fn normalize(info: VideoInfo) -> Result<TranscriptResult, TranscriptError> {
    let VideoInfo {
        title,
        is_live,
        is_login_required,
        microformat,
        playability_status,
        tracks,
        ..
    } = info;

    let Some(track) = tracks.into_iter().next() else {
        let reason = playability_status
            .and_then(|s| s.reason)
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "no transcript tracks available for this video".to_string());
        return Err(TranscriptError::Unavailable(reason));
    };

    let renderer = microformat
        .map(|m| m.player_microformat_renderer)
        .ok_or_else(|| TranscriptError::Unavailable("provider response is missing video metadata".to_string()))?;

    if track.transcript.is_empty() {
        warn!(language = %track.language, "first transcript track is empty");
    }

    let transcript = track
        .transcript
        .into_iter()
        .map(|s| TranscriptSegment {
            text: s.text,
            offset: s.start,
            duration: s.dur,
        })
        .collect();

    Ok(TranscriptResult {
        transcript,
        title,
        channel_name: renderer.owner_channel_name,
        channel_id: renderer.external_channel_id,
        length_seconds: renderer.length_seconds.max(0.0) as u64,
        publish_date: renderer.publish_date,
        is_live,
        is_login_required,
    })
}
