use base64::prelude::*;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::settings::Settings;
use crate::modules::transcript::model::AudioResult;
use crate::services::openai;

/// The speech endpoint answers with MP3 unless asked otherwise.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Audio generation failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Audio generation failed: OpenAI API error: {status} - {detail}")]
    ApiError { status: String, detail: String },
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

#[derive(Clone)]
pub struct TtsClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl TtsClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.openai_base_url.clone(),
            api_key: settings.openai_api_key.clone(),
            model: settings.tts_model.clone(),
            voice: settings.tts_voice.clone(),
        }
    }

    /// Raw audio bytes for `text`.
    pub async fn speech(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = openai::error_parts(response).await;
            error!(%status, %detail, model = %self.model, "speech synthesis rejected");
            return Err(TtsError::ApiError { status, detail });
        }

        let audio = response.bytes().await?;
        debug!(bytes = audio.len(), voice = %self.voice, "speech synthesized");

        Ok(audio.to_vec())
    }

    pub async fn synthesize(&self, text: &str) -> Result<AudioResult, TtsError> {
        let audio = self.speech(text).await?;

        Ok(AudioResult {
            audio: BASE64_STANDARD.encode(&audio),
            content_type: AUDIO_CONTENT_TYPE.to_string(),
        })
    }
}
