use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TranscriptQuery {
    #[validate(url(message = "Invalid YouTube URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(length(min = 1, message = "Transcript cannot be empty"))]
    pub transcript: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AudioRequest {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
