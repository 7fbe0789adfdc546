use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";
pub const DEFAULT_TTS_VOICE: &str = "alloy";
pub const DEFAULT_TRANSCRIPT_BASE_URL: &str = "https://www.youtube-transcript.io/api";
pub const DEFAULT_TRANSCRIPT_AUTH_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:signUp";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key: {0} must be set")]
    MissingApiKey(&'static str),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub summary_model: String,
    pub summary_max_tokens: u32,
    pub tts_model: String,
    pub tts_voice: String,
    pub transcript_base_url: String,
    pub transcript_auth_url: String,
    pub transcript_api_key: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or_default = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let openai_api_key = var("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey("OPENAI_API_KEY"))?;

        let summary_max_tokens = match var("SUMMARY_MAX_TOKENS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { name: "SUMMARY_MAX_TOKENS", value })?,
            None => DEFAULT_SUMMARY_MAX_TOKENS,
        };

        // The default sign-in endpoint rejects every request that carries no key.
        let transcript_auth_url = or_default("TRANSCRIPT_AUTH_URL", DEFAULT_TRANSCRIPT_AUTH_URL);
        let transcript_api_key = var("TRANSCRIPT_API_KEY");
        if transcript_api_key.is_none() && transcript_auth_url == DEFAULT_TRANSCRIPT_AUTH_URL {
            return Err(ConfigError::MissingApiKey("TRANSCRIPT_API_KEY"));
        }

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => 3000,
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: trim_slash(or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)),
            summary_model: or_default("SUMMARY_MODEL", DEFAULT_SUMMARY_MODEL),
            summary_max_tokens,
            tts_model: or_default("TTS_MODEL", DEFAULT_TTS_MODEL),
            tts_voice: or_default("TTS_VOICE", DEFAULT_TTS_VOICE),
            transcript_base_url: trim_slash(or_default("TRANSCRIPT_BASE_URL", DEFAULT_TRANSCRIPT_BASE_URL)),
            transcript_auth_url,
            transcript_api_key,
            host: or_default("HOST", "0.0.0.0"),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

// Credentials stay out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("summary_model", &self.summary_model)
            .field("summary_max_tokens", &self.summary_max_tokens)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("transcript_base_url", &self.transcript_base_url)
            .field("transcript_auth_url", &self.transcript_auth_url)
            .field("transcript_api_key", &self.transcript_api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
