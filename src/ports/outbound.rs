//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, ScanRecord};

/// Language-model backend. One capability: turn a prompt into a text completion.
#[async_trait::async_trait]
pub trait LlmPort: Send + Sync {
    /// Short label for logs and the UI (e.g. "gemini-2.5-flash", "ollama:mistral").
    fn label(&self) -> String;

    /// Fails with `DomainError::ConfigurationMissing` when the backend cannot be called
    /// (e.g. no API key). Checked before any request is attempted.
    fn check_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Send the prompt and return the raw completion text.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Text extraction from an uploaded document.
#[async_trait::async_trait]
pub trait TextExtractorPort: Send + Sync {
    /// Returns usable text, or `DomainError::Extraction` when the document has none
    /// (unreadable, encrypted, scanned/image-only, or too short).
    async fn extract(&self, name: &str, bytes: &[u8]) -> Result<String, DomainError>;
}

/// Scan log. Insert-only record of screening results.
#[async_trait::async_trait]
pub trait ScanLogPort: Send + Sync {
    /// Append one record.
    async fn save_scan(&self, record: &ScanRecord) -> Result<(), DomainError>;

    /// Most recent records, newest first.
    async fn recent_scans(&self, limit: u32) -> Result<Vec<ScanRecord>, DomainError>;
}
