//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single upload yielded no usable text. Dropped from the batch, not shown per file.
    #[error("No usable text: {0}")]
    Extraction(String),

    /// Every upload in the batch was dropped.
    #[error("No valid text found in the uploaded resumes.")]
    NoUsableText,

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("AI Error: {0}")]
    Backend(String),

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("UI error: {0}")]
    Ui(String),
}

/// Model output was received but no JSON array could be recovered from it.
///
/// Carries the untouched raw text so the caller can show it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("JSON parse failed: {reason}")]
pub struct ParseFailure {
    pub reason: String,
    pub raw: String,
}
