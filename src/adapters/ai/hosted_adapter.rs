//! Hosted LLM adapter over an OpenAI-compatible chat completions API.
//!
//! Defaults to Gemini's OpenAI-compatible endpoint; works with OpenAI, Azure OpenAI or any
//! compatible gateway. Requests JSON output via `response_format` and falls back to a
//! secondary model when the primary one is rejected.

use crate::domain::DomainError;
use crate::ports::LlmPort;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Hosted AI adapter.
pub struct HostedLlmAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    fallback_model: String,
}

impl HostedLlmAdapter {
    /// Create a new hosted adapter.
    ///
    /// # Arguments
    /// * `api_url` - Chat completions endpoint
    /// * `api_key` - API key; `None` makes every call fail with `ConfigurationMissing`
    /// * `model` - Preferred model (e.g. "gemini-2.5-flash")
    /// * `fallback_model` - Model used if the API rejects `model`
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: String,
        fallback_model: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            fallback_model,
        }
    }

    fn request_for(model: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    /// Statuses the API uses for an unknown or unavailable model.
    fn is_model_rejection(status: StatusCode) -> bool {
        status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST
    }

    async fn complete(&self, api_key: &str, model: &str, prompt: &str) -> Result<String, CallError> {
        let request = Self::request_for(model, prompt);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CallError::Other(DomainError::Backend(format!("HTTP request failed: {}", e))))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, model, body = %text, "AI API returned error");
            let err = DomainError::Backend(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            ));
            return Err(if Self::is_model_rejection(status) {
                CallError::Rejected(err)
            } else {
                CallError::Other(err)
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            CallError::Other(DomainError::Backend(format!(
                "Failed to parse API response: {}",
                e
            )))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CallError::Other(DomainError::Backend("No response choices returned".to_string()))
            })
    }
}

enum CallError {
    /// The API refused the model; worth retrying with the fallback.
    Rejected(DomainError),
    Other(DomainError),
}

impl From<CallError> for DomainError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Rejected(e) | CallError::Other(e) => e,
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl LlmPort for HostedLlmAdapter {
    fn label(&self) -> String {
        self.model.clone()
    }

    fn check_configured(&self) -> Result<(), DomainError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(DomainError::ConfigurationMissing(
                "API key missing. Set TALENT_ALIGN_API_KEY or GEMINI_API_KEY.".to_string(),
            )),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.check_configured()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        info!(model = %self.model, prompt_len = prompt.len(), "sending screening prompt to hosted AI");

        let raw = match self.complete(api_key, &self.model, prompt).await {
            Ok(raw) => raw,
            Err(CallError::Rejected(e)) if self.fallback_model != self.model => {
                warn!(
                    model = %self.model,
                    fallback = %self.fallback_model,
                    error = %e,
                    "model rejected, retrying with fallback"
                );
                self.complete(api_key, &self.fallback_model, prompt).await?
            }
            Err(e) => return Err(e.into()),
        };

        debug!(raw_len = raw.len(), "received AI response");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn adapter(api_key: Option<&str>) -> HostedLlmAdapter {
        adapter_at("http://127.0.0.1:9/v1/chat/completions", api_key)
    }

    fn adapter_at(url: &str, api_key: Option<&str>) -> HostedLlmAdapter {
        HostedLlmAdapter::new(
            url.to_string(),
            api_key.map(str::to_string),
            "gemini-2.5-flash".to_string(),
            "gemini-1.5-flash".to_string(),
        )
    }

    /// Reads one HTTP request and returns its body.
    async fn read_request_body(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    return String::from_utf8_lossy(&buf[head_end + 4..]).to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Chat completions stub. Replies with the status mapped to the requested model and
    /// records every model it was asked for.
    async fn spawn_stub(statuses: Vec<(&'static str, u16)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let body = read_request_body(&mut stream).await;
                let request: serde_json::Value = serde_json::from_str(&body).unwrap();
                let model = request["model"].as_str().unwrap_or_default().to_string();
                log.lock().unwrap().push(model.clone());

                let status = statuses
                    .iter()
                    .find(|(m, _)| *m == model)
                    .map(|(_, s)| *s)
                    .unwrap_or(404);
                let payload = if status == 200 {
                    serde_json::json!({"choices": [{"message": {"role": "assistant",
                        "content": format!("[{{\"name\":\"from {}\"}}]", model)}}]})
                    .to_string()
                } else {
                    serde_json::json!({"error": {"message": "unavailable"}}).to_string()
                };
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    payload.len(),
                    payload
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        (url, seen)
    }

    #[tokio::test]
    async fn test_rejected_model_retries_with_fallback() {
        let (url, seen) = spawn_stub(vec![("gemini-2.5-flash", 404), ("gemini-1.5-flash", 200)]).await;
        let raw = adapter_at(&url, Some("k")).generate("prompt").await.unwrap();
        assert_eq!(raw, r#"[{"name":"from gemini-1.5-flash"}]"#);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["gemini-2.5-flash".to_string(), "gemini-1.5-flash".to_string()]
        );
    }

    #[tokio::test]
    async fn test_bad_request_also_falls_back() {
        let (url, seen) = spawn_stub(vec![("gemini-2.5-flash", 400), ("gemini-1.5-flash", 200)]).await;
        assert!(adapter_at(&url, Some("k")).generate("prompt").await.is_ok());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (url, seen) = spawn_stub(vec![("gemini-2.5-flash", 500), ("gemini-1.5-flash", 200)]).await;
        let err = adapter_at(&url, Some("k")).generate("prompt").await.unwrap_err();
        assert!(matches!(err, DomainError::Backend(_)));
        assert!(err.to_string().contains("500"));
        assert_eq!(*seen.lock().unwrap(), vec!["gemini-2.5-flash".to_string()]);
    }

    #[tokio::test]
    async fn test_primary_success_makes_one_call() {
        let (url, seen) = spawn_stub(vec![("gemini-2.5-flash", 200)]).await;
        let raw = adapter_at(&url, Some("k")).generate("prompt").await.unwrap();
        assert!(raw.contains("from gemini-2.5-flash"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = adapter(None).check_configured().unwrap_err();
        assert!(matches!(err, DomainError::ConfigurationMissing(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        assert!(adapter(Some("  ")).check_configured().is_err());
        assert!(adapter(Some("k")).check_configured().is_ok());
    }

    #[tokio::test]
    async fn test_generate_without_key_short_circuits() {
        let err = adapter(None).generate("prompt").await.unwrap_err();
        assert!(matches!(err, DomainError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_request_asks_for_json() {
        let body = serde_json::to_value(HostedLlmAdapter::request_for("m", "hello")).unwrap();
        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_model_rejection_statuses() {
        assert!(HostedLlmAdapter::is_model_rejection(StatusCode::NOT_FOUND));
        assert!(HostedLlmAdapter::is_model_rejection(StatusCode::BAD_REQUEST));
        assert!(!HostedLlmAdapter::is_model_rejection(StatusCode::UNAUTHORIZED));
        assert!(!HostedLlmAdapter::is_model_rejection(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_response_envelope() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"[]"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("[]"));
    }
}
