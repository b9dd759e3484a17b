//! Mock AI adapter for offline runs and tests.
//!
//! Returns canned or scripted completions without network calls and counts invocations.

use crate::domain::DomainError;
use crate::ports::LlmPort;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

enum Script {
    /// Derive one plausible result per candidate block in the prompt.
    Canned,
    /// Return this text verbatim.
    Respond(String),
    /// Fail with `DomainError::Backend`.
    Fail(String),
}

/// Mock AI adapter.
pub struct MockLlmAdapter {
    /// Simulated latency in milliseconds.
    delay_ms: u64,
    script: Script,
    configured: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockLlmAdapter {
    /// Canned responses with a short simulated delay (100ms).
    pub fn new() -> Self {
        Self::with_script(Script::Canned, 100)
    }

    /// Always answer with `raw`, no delay.
    pub fn responding(raw: impl Into<String>) -> Self {
        Self::with_script(Script::Respond(raw.into()), 0)
    }

    /// Always fail with a backend error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(Script::Fail(message.into()), 0)
    }

    /// Behave like a backend whose credential is absent.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Number of `generate` calls that reached the backend.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn with_script(script: Script, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            script,
            configured: true,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// One result per `--- CANDIDATE n (id) ---` line, scores stepping down from 90.
    fn canned_response(prompt: &str) -> String {
        let results: Vec<serde_json::Value> = candidate_labels(prompt)
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let score = 90u32.saturating_sub(15 * i as u32).max(10);
                json!({
                    "name": name,
                    "match_score": score,
                    "key_skills": ["[MOCK] Relevant experience"],
                    "missing_skills": ["[MOCK] Configure a real model for actual screening"],
                    "summary": format!("[MOCK] Simulated assessment of {}.", name),
                    "status": if score >= 70 { "Interview" } else { "Maybe" },
                })
            })
            .collect();
        format!("Mock screening result:\n{}", serde_json::Value::Array(results))
    }
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate_labels(prompt: &str) -> Vec<String> {
    prompt
        .lines()
        .filter_map(|line| line.strip_prefix("--- CANDIDATE ")?.strip_suffix(" ---"))
        .map(|label| match (label.find('('), label.rfind(')')) {
            (Some(s), Some(e)) if s < e => label[s + 1..e].to_string(),
            _ => label.to_string(),
        })
        .collect()
}

#[async_trait::async_trait]
impl LlmPort for MockLlmAdapter {
    fn label(&self) -> String {
        "mock".to_string()
    }

    fn check_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::ConfigurationMissing(
                "API key missing (mock)".to_string(),
            ))
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        info!(prompt_len = prompt.len(), "[MOCK] Simulating AI screening");

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.script {
            Script::Canned => Ok(Self::canned_response(prompt)),
            Script::Respond(raw) => Ok(raw.clone()),
            Script::Fail(message) => Err(DomainError::Backend(message.clone())),
        }
    }
}
