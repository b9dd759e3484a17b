//! Screening service. Orchestrates one screening run.
//!
//! Coordinates text extraction, the AI backend, response parsing and the optional scan log.

use crate::adapters::ai::{build_prompt, parse_candidates};
use crate::domain::{
    CandidateResult, DomainError, Resume, ResumeUpload, ScanRecord, ScreeningReport,
    ScreeningRequest,
};
use crate::ports::{LlmPort, ScanLogPort, TextExtractorPort};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service for AI-powered resume screening.
///
/// Orchestrates the flow:
/// 1. Validate input and backend configuration
/// 2. Extract text from each upload, dropping unusable ones
/// 3. Build one prompt for the whole batch and send it to the model
/// 4. Parse the candidate array from the raw output
/// 5. Log one scan record per candidate (best effort)
pub struct ScreeningService {
    llm: Arc<dyn LlmPort>,
    extractor: Arc<dyn TextExtractorPort>,
    scan_log: Option<Arc<dyn ScanLogPort>>,
    max_resume_chars: Option<usize>,
}

impl ScreeningService {
    /// Create a new screening service.
    ///
    /// # Arguments
    /// * `llm` - Backend implementation (hosted, local, mock)
    /// * `extractor` - Document text extractor
    /// * `scan_log` - Optional scan log; `None` disables persistence
    /// * `max_resume_chars` - Per-resume character budget in the prompt (`None` = unbounded)
    pub fn new(
        llm: Arc<dyn LlmPort>,
        extractor: Arc<dyn TextExtractorPort>,
        scan_log: Option<Arc<dyn ScanLogPort>>,
        max_resume_chars: Option<usize>,
    ) -> Self {
        Self {
            llm,
            extractor,
            scan_log,
            max_resume_chars,
        }
    }

    pub fn backend_label(&self) -> String {
        self.llm.label()
    }

    pub fn is_persistence_enabled(&self) -> bool {
        self.scan_log.is_some()
    }

    /// Run the full pipeline for one batch.
    ///
    /// Requires a non-empty job description and at least one upload. Uploads without usable
    /// text are dropped; if none remain the run fails with `NoUsableText`.
    pub async fn screen(
        &self,
        job_description: &str,
        uploads: &[ResumeUpload],
        blind_mode: bool,
    ) -> Result<ScreeningReport, DomainError> {
        if job_description.trim().is_empty() || uploads.is_empty() {
            return Err(DomainError::InvalidInput(
                "Please upload resumes and paste a job description.".to_string(),
            ));
        }

        self.llm.check_configured()?;

        let (resumes, dropped_uploads) = self.extract_resumes(uploads).await;
        if resumes.is_empty() {
            return Err(DomainError::NoUsableText);
        }

        let request = ScreeningRequest {
            job_description: job_description.to_string(),
            resumes,
            blind_mode,
        };
        let candidates = self.evaluate(&request).await?;
        let job_title = request.job_title();
        self.record_scans(&job_title, &candidates).await;

        info!(
            candidates = candidates.len(),
            dropped = dropped_uploads.len(),
            "screening complete"
        );

        Ok(ScreeningReport {
            job_title,
            candidates,
            dropped_uploads,
        })
    }

    /// Extract text from every upload. Returns usable resumes (upload order) and the names
    /// of dropped uploads.
    pub async fn extract_resumes(&self, uploads: &[ResumeUpload]) -> (Vec<Resume>, Vec<String>) {
        let mut resumes = Vec::with_capacity(uploads.len());
        let mut dropped = Vec::new();

        for upload in uploads {
            match self.extractor.extract(&upload.name, &upload.bytes).await {
                Ok(raw_text) => resumes.push(Resume {
                    identifier: upload.name.clone(),
                    raw_text,
                }),
                Err(e) => {
                    debug!(file = %upload.name, error = %e, "dropping upload");
                    dropped.push(upload.name.clone());
                }
            }
        }
        (resumes, dropped)
    }

    /// Send one batch to the model and parse the answer.
    pub async fn evaluate(
        &self,
        request: &ScreeningRequest,
    ) -> Result<Vec<CandidateResult>, DomainError> {
        let prompt = build_prompt(request, self.max_resume_chars);
        info!(
            backend = %self.llm.label(),
            resumes = request.resumes.len(),
            blind = request.blind_mode,
            prompt_len = prompt.len(),
            "screening batch"
        );

        let raw = self.llm.generate(&prompt).await?;
        Ok(parse_candidates(&raw)?)
    }

    /// Write one scan record per candidate. Failures are logged and never surface.
    async fn record_scans(&self, job_title: &str, candidates: &[CandidateResult]) {
        let Some(scan_log) = &self.scan_log else {
            return;
        };
        let scanned_at = Utc::now().timestamp();
        for candidate in candidates.iter().filter(|c| c.issue.is_none()) {
            let record = ScanRecord::from_candidate(job_title, candidate, scanned_at);
            if let Err(e) = scan_log.save_scan(&record).await {
                warn!(candidate = %record.candidate_name, error = %e, "failed to save scan");
            }
        }
    }
}
