use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::settings::Settings;
use crate::modules::transcript::model::SummaryResult;
use crate::services::openai;

/// Returned when the provider answers successfully but without any text.
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary generated.";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Summary generation failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Summary generation failed: OpenAI API error: {status} - {detail}")]
    ApiError { status: String, detail: String },
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

struct LlmResponse {
    /// Content of the first choice, if the provider returned any.
    content: Option<String>,
    usage: Option<ApiUsage>,
}

/// Chat-completions client. Built per request from the startup [`Settings`].
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.openai_base_url.clone(),
            api_key: settings.openai_api_key.clone(),
            model: settings.summary_model.clone(),
            max_tokens: settings.summary_max_tokens,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = openai::error_parts(response).await;
            error!(%status, %detail, model = %self.model, "chat completion rejected");
            return Err(LlmError::ApiError { status, detail });
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);

        Ok(LlmResponse {
            content,
            usage: chat_response.usage,
        })
    }

    pub async fn summarize(&self, transcript: &str) -> Result<SummaryResult, LlmError> {
        let system_prompt = summary_system_prompt(self.max_tokens);
        let prompt = format!("Summarize the following video transcript:\n\n{}", transcript);

        let result = self.complete(&system_prompt, &prompt).await?;

        if let Some(usage) = &result.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "summary generated"
            );
        }

        let summary = result
            .content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| NO_SUMMARY_PLACEHOLDER.to_string());

        Ok(SummaryResult { summary })
    }
}

pub fn summary_system_prompt(max_tokens: u32) -> String {
    format!(
        "You are a helpful assistant that summarizes video transcripts concisely. Make sure to fit your output in less than {} tokens",
        max_tokens
    )
}
