use reqwest::{Response, StatusCode};
use serde::Deserialize;

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Status reason and provider error detail from a failed response.
///
/// The detail is `error.message` from the JSON body when present, otherwise [`UNKNOWN_ERROR`].
pub async fn error_parts(response: Response) -> (String, String) {
    let status = status_text(response.status());
    let body = response.text().await.unwrap_or_default();
    (status, error_detail(&body))
}

pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|r| r.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}
