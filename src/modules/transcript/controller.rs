use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, info};
use validator::Validate;

use crate::modules::transcript::{
    model::{AudioResult, SummaryResult, TranscriptResult},
    schema::{AudioRequest, MessageResponse, SummaryRequest, TranscriptQuery},
};
use crate::services::llm::LlmClient;
use crate::services::transcript::{fetch_transcript, TranscriptError};
use crate::services::tts::TtsClient;
use crate::services::video_id::extract_video_id;
use crate::AppState;

type ApiError = (StatusCode, Json<MessageResponse>);

// Malformed or missing input is a validation failure, same as a rule violation.
fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(MessageResponse { message }))
}

fn transcript_error(e: TranscriptError) -> ApiError {
    let status = match e {
        TranscriptError::VideoIdNotFound => StatusCode::UNPROCESSABLE_ENTITY,
        TranscriptError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(MessageResponse { message: e.to_string() }))
}

pub async fn get_transcript(
    State(state): State<AppState>,
    query: Result<Query<TranscriptQuery>, QueryRejection>,
) -> Result<Json<TranscriptResult>, ApiError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;

    if let Err(e) = query.validate() {
        return Err(bad_request(e.to_string()));
    }

    let video = extract_video_id(&query.url)
        .ok_or_else(|| transcript_error(TranscriptError::VideoIdNotFound))?;

    info!(video_id = %video, "fetching transcript");

    let result = fetch_transcript(&state.settings, &video).await.map_err(|e| {
        error!(video_id = %video, error = %e, "error fetching transcript");
        transcript_error(e)
    })?;

    info!(video_id = %video, segments = result.transcript.len(), "transcript fetched");

    Ok(Json(result))
}

pub async fn get_summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(payload) = payload.map_err(|e| bad_request(e.body_text()))?;

    if let Err(e) = payload.validate() {
        return Err(bad_request(e.to_string()));
    }

    let llm = LlmClient::new(&state.settings);

    info!(chars = payload.transcript.len(), max_tokens = llm.max_tokens(), "generating summary");

    let result = llm.summarize(&payload.transcript).await.map_err(|e| {
        error!(error = %e, "error generating summary");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )
    })?;

    Ok(Json(result))
}

pub async fn get_audio_summary(
    State(state): State<AppState>,
    payload: Result<Json<AudioRequest>, JsonRejection>,
) -> Result<Json<AudioResult>, ApiError> {
    let Json(payload) = payload.map_err(|e| bad_request(e.body_text()))?;

    if let Err(e) = payload.validate() {
        return Err(bad_request(e.to_string()));
    }

    info!(chars = payload.text.len(), "generating audio");

    let result = TtsClient::new(&state.settings)
        .synthesize(&payload.text)
        .await
        .map_err(|e| {
            error!(error = %e, "error generating audio");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse { message: e.to_string() }),
            )
        })?;

    Ok(Json(result))
}
