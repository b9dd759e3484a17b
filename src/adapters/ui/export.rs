//! CSV export of the scoreboard. Uses the `csv` crate for quoting/escaping.

use crate::domain::{CandidateResult, DomainError};
use std::path::Path;
use tracing::info;

/// Convert candidates to CSV with a header row.
///
/// Columns: `name,match_score,status,summary,key_skills,missing_skills`. List columns are
/// joined with `; `.
pub fn candidates_to_csv(candidates: &[CandidateResult]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record([
        "name",
        "match_score",
        "status",
        "summary",
        "key_skills",
        "missing_skills",
    ])?;

    for c in candidates {
        let score = c.match_score.to_string();
        let strengths = c.key_skills.join("; ");
        let gaps = c.missing_skills.join("; ");
        wtr.write_record([
            c.name.as_str(),
            score.as_str(),
            c.status.as_str(),
            c.summary.as_str(),
            strengths.as_str(),
            gaps.as_str(),
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

/// Write the CSV export to `path`.
pub async fn export_csv(path: &Path, candidates: &[CandidateResult]) -> Result<(), DomainError> {
    let content = candidates_to_csv(candidates)
        .map_err(|e| DomainError::Export(format!("Failed to generate CSV: {}", e)))?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| DomainError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
    info!(path = %path.display(), rows = candidates.len(), "scoreboard exported");
    Ok(())
}
