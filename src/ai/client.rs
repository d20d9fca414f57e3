//! LLM (Ollama) API client module
//!
//! Encapsulates all generation backend interactions for producing summaries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::DigestError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Text-generation backend. One round trip per call, no retries, no caching.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or produces no text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, DigestError>;
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for a local Ollama server (`/api/generate`, `/api/tags`).
pub struct OllamaClient {
    base_url: String,
    http: Client,
}

impl OllamaClient {
    /// `timeout` bounds a whole request; `None` lets a generation call block
    /// for as long as the server takes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, DigestError> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            DigestError::HttpError(format!("Failed to build Ollama HTTP client: {e}"))
        })?;

        Ok(Self { base_url, http })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the models installed on the server.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the server cannot be reached or answers
    /// with a non-success status.
    pub async fn list_models(&self) -> Result<Vec<String>, DigestError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.http.get(&url).send().await.map_err(|e| {
            DigestError::BackendUnavailable(format!("Cannot connect to Ollama at {}: {e}", self.base_url))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::BackendUnavailable(format!(
                "Ollama at {} answered with status {status}",
                self.base_url
            )));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            DigestError::ParseError(format!("Failed to parse Ollama model list: {e}"))
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Startup probe. Fails if the server is unreachable; only warns when the
    /// requested model is not installed.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the server cannot be reached.
    pub async fn check_available(&self, model: &str) -> Result<(), DigestError> {
        let models = self.list_models().await?;
        if !has_model(&models, model) {
            warn!(
                "Model '{}' not found on Ollama (available: {}). Run: ollama pull {}",
                model,
                models.join(", "),
                model
            );
        }
        Ok(())
    }
}

/// Exact match, substring match, or same base name before the `:` tag.
#[must_use]
pub fn has_model(installed: &[String], model: &str) -> bool {
    let base = model.split(':').next().unwrap_or(model);
    installed
        .iter()
        .any(|name| name.contains(model) || name.starts_with(base))
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, DigestError> {
        #[cfg(feature = "debug-logs")]
        info!("Using Ollama prompt:\n{}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Generating with {} (~{} input tokens)",
            model,
            estimate_tokens(prompt)
        );

        let request_body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(DigestError::GenerationError(format!(
                "Ollama API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            DigestError::ParseError(format!("Failed to parse Ollama response: {e}"))
        })?;

        let text = response_json
            .get("response")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| DigestError::ParseError("No text in Ollama response".to_string()))?;

        debug!("Generated {} characters", text.chars().count());
        Ok(text)
    }
}
