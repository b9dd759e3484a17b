//! Domain entities. Pure data structures for the screening pipeline.
//!
//! No PDF/HTTP/DB types here; adapters map into these.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Max characters of the job description stored as the scan's job title.
pub const JOB_TITLE_MAX_CHARS: usize = 50;

/// An uploaded file before text extraction.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    /// Display name (usually the file name).
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A resume with usable extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resume {
    pub identifier: String,
    pub raw_text: String,
}

/// One screening batch: a job description plus every resume, sent in a single model call.
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub job_description: String,
    pub resumes: Vec<Resume>,
    pub blind_mode: bool,
}

impl ScreeningRequest {
    /// Job title prefix used for persistence: first 50 characters of the JD.
    pub fn job_title(&self) -> String {
        job_title_prefix(&self.job_description)
    }
}

/// First [`JOB_TITLE_MAX_CHARS`] characters of a job description (char-safe).
pub fn job_title_prefix(job_description: &str) -> String {
    job_description.chars().take(JOB_TITLE_MAX_CHARS).collect()
}

/// Per-candidate verdict produced by the model.
///
/// Every field is optional on the wire. Accepts both the hosted schema
/// (`name`, `match_score`, `key_skills`, `missing_skills`, `summary`, `status`)
/// and the local-model schema (`resume_id`, `overall_score`, `strengths`, `gaps`,
/// `explanation`). When an object carries both names for one field, the hosted name wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub name: String,
    pub match_score: u8,
    pub key_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    pub status: String,

    /// Set when this element of the model's array could not be decoded.
    #[serde(skip)]
    pub issue: Option<String>,
}

const NAME_KEYS: &[&str] = &["name", "candidate_name", "resume_id"];
const SCORE_KEYS: &[&str] = &["match_score", "overall_score"];
const SKILL_KEYS: &[&str] = &["key_skills", "strengths"];
const GAP_KEYS: &[&str] = &["missing_skills", "gaps"];
const SUMMARY_KEYS: &[&str] = &["summary", "explanation"];
const STATUS_KEYS: &[&str] = &["status"];

impl<'de> Deserialize<'de> for CandidateResult {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(d)?;
        let mut take = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| fields.remove(*k))
                .find(|v| !v.is_null())
                .unwrap_or(Value::Null)
        };
        Ok(Self {
            name: name_from(take(NAME_KEYS)),
            match_score: score_from(take(SCORE_KEYS)),
            key_skills: list_from(take(SKILL_KEYS)),
            missing_skills: list_from(take(GAP_KEYS)),
            summary: text_from(take(SUMMARY_KEYS)),
            status: text_from(take(STATUS_KEYS)),
            issue: None,
        })
    }
}

impl CandidateResult {
    /// Error record standing in for a malformed array element.
    pub fn malformed(issue: impl Into<String>) -> Self {
        Self {
            name: unknown_name(),
            match_score: 0,
            key_skills: Vec::new(),
            missing_skills: Vec::new(),
            summary: String::new(),
            status: String::new(),
            issue: Some(issue.into()),
        }
    }
}

/// Sort candidates by score, best first. Stable: ties keep model order.
pub fn rank_by_score(candidates: &mut [CandidateResult]) {
    candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}

/// Row written to the scan log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub job_title: String,
    pub candidate_name: String,
    pub match_score: i64,
    pub summary: String,
    /// Unix timestamp (seconds).
    pub scanned_at: i64,
}

impl ScanRecord {
    pub fn from_candidate(job_title: &str, candidate: &CandidateResult, scanned_at: i64) -> Self {
        Self {
            job_title: job_title_prefix(job_title),
            candidate_name: candidate.name.clone(),
            match_score: i64::from(candidate.match_score),
            summary: candidate.summary.clone(),
            scanned_at,
        }
    }
}

/// Outcome of one successful screening run, handed to the renderer.
#[derive(Debug, Clone)]
pub struct ScreeningReport {
    pub job_title: String,
    pub candidates: Vec<CandidateResult>,
    /// Uploads dropped because no usable text could be extracted.
    pub dropped_uploads: Vec<String>,
}

impl ScreeningReport {
    /// Candidates in display order: best score first, ties in model order.
    pub fn ranked(&self) -> Vec<CandidateResult> {
        let mut ranked = self.candidates.clone();
        rank_by_score(&mut ranked);
        ranked
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

fn name_from(v: Value) -> String {
    match v {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Number(n) => format!("Resume {}", n),
        _ => unknown_name(),
    }
}

fn score_from(v: Value) -> u8 {
    let score = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

fn list_from(v: Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    }
}

fn text_from(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
