//! Local inference adapter for an Ollama-compatible `/api/generate` endpoint.
//!
//! The model runs on the user's machine; this adapter only posts the prompt and reads
//! the non-streamed completion.

use crate::domain::DomainError;
use crate::ports::LlmPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Fixed sampling temperature: favour parseable output over creativity.
pub const LOCAL_TEMPERATURE: f32 = 0.3;

pub struct LocalLlmAdapter {
    client: reqwest::Client,
    url: String,
    model: String,
    max_tokens: u32,
}

impl LocalLlmAdapter {
    /// * `url` - Generate endpoint (e.g. "http://localhost:11434/api/generate")
    /// * `model` - Local model tag (e.g. "mistral:7b-instruct")
    /// * `max_tokens` - Upper bound on generated tokens
    pub fn new(url: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
            max_tokens,
        }
    }

    fn request_for(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: LOCAL_TEMPERATURE,
                num_predict: self.max_tokens,
            },
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[async_trait::async_trait]
impl LlmPort for LocalLlmAdapter {
    fn label(&self) -> String {
        format!("local:{}", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        info!(
            model = %self.model,
            url = %self.url,
            prompt_len = prompt.len(),
            "running local inference"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&self.request_for(prompt))
            .send()
            .await
            .map_err(|e| DomainError::Backend(format!("Local model unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "local model returned error");
            return Err(DomainError::Backend(format!(
                "Local model error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Backend(format!("Failed to parse local model response: {}", e)))?;

        debug!(raw_len = body.response.len(), "received local completion");
        Ok(body.response)
    }
}
