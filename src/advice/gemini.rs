//! Gemini advice backend
//!
//! Calls the Gemini REST API with a blocking HTTP client. Errors carry the
//! backend's own error text so failures are diagnosable from logs, but they
//! never propagate past the advice service.

use std::time::Duration;

use serde_json::json;

use super::{AdviceBackend, AdviceError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini implementation of [`AdviceBackend`]
pub struct GeminiBackend {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend with the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a backend with a specific model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Create a backend from the `GEMINI_API_KEY` environment variable
    pub fn from_env() -> Result<Self, AdviceError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| AdviceError::MissingKey)?;
        Ok(Self::new(api_key))
    }
}

impl AdviceBackend for GeminiBackend {
    fn complete(&self, prompt: &str) -> Result<String, AdviceError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| AdviceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(AdviceError::Http(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| AdviceError::Http(e.to_string()))?;
        extract_text(&body)
    }
}

/// Pull the generated text out of a Gemini response body
fn extract_text(body: &serde_json::Value) -> Result<String, AdviceError> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_owned)
        .ok_or(AdviceError::Empty)
}
