//! PDF text extraction.
//!
//! Wraps pdf-extract with the "usable text" policy: pages joined by newlines, stripped,
//! and rejected below [`MIN_TEXT_CHARS`] characters (scanned or image-only PDFs).

use crate::domain::DomainError;
use crate::ports::TextExtractorPort;
use async_trait::async_trait;
use tracing::debug;

/// Minimum stripped length (in characters) for extracted text to be sent to the model.
pub const MIN_TEXT_CHARS: usize = 50;

/// Join page texts with `\n` and strip. `None` when fewer than [`MIN_TEXT_CHARS`] remain.
pub fn usable_text<I, S>(pages: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        if !page.is_empty() {
            text.push_str(page);
            text.push('\n');
        }
    }
    let stripped = text.trim();
    (stripped.chars().count() >= MIN_TEXT_CHARS).then(|| stripped.to_string())
}

/// PDF extractor. Parsing runs on the blocking pool; a parser panic surfaces as a
/// `JoinError` and is mapped like any other extraction failure.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractorPort for PdfTextExtractor {
    async fn extract(&self, name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let owned = bytes.to_vec();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&owned)
        })
        .await
        .map_err(|e| DomainError::Extraction(format!("{}: PDF parser aborted: {}", name, e)))?
        .map_err(|e| DomainError::Extraction(format!("{}: {}", name, e)))?;

        debug!(file = name, pages = pages.len(), "extracted PDF pages");

        usable_text(&pages).ok_or_else(|| {
            DomainError::Extraction(format!(
                "{}: fewer than {} characters of text (scanned or image-only PDF?)",
                name, MIN_TEXT_CHARS
            ))
        })
    }
}
