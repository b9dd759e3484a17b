//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    CandidateResult, JOB_TITLE_MAX_CHARS, Resume, ResumeUpload, ScanRecord, ScreeningReport,
    ScreeningRequest, job_title_prefix, rank_by_score,
};
pub use errors::{DomainError, ParseFailure};
