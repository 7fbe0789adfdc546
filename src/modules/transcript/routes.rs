use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::transcript::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/transcript", get(controller::get_transcript))
        .route("/api/transcript/summary", post(controller::get_summary))
        .route("/api/transcript/audio", post(controller::get_audio_summary))
}
