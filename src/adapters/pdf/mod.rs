//! PDF adapter. Implements TextExtractorPort via the pdf-extract crate.

pub mod pdf_extractor;

pub use pdf_extractor::{MIN_TEXT_CHARS, PdfTextExtractor, usable_text};
