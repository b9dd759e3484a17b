//! Upload collection: turns user-supplied paths into `ResumeUpload`s.
//!
//! Directories are expanded to the PDF files they contain (non-recursive, sorted by name).

use crate::domain::{DomainError, ResumeUpload};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Expand directories into their PDF files; plain files are kept as given.
pub async fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DomainError> {
    let mut files = Vec::new();
    for path in paths {
        if fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
            let mut entries = fs::read_dir(path)
                .await
                .map_err(|e| DomainError::InvalidInput(format!("{}: {}", path.display(), e)))?;
            let mut found = Vec::new();
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| DomainError::InvalidInput(format!("{}: {}", path.display(), e)))?
            {
                let p = entry.path();
                if is_pdf(&p) {
                    found.push(p);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Read every file into an upload named after its file name.
///
/// Non-PDF and unreadable files are skipped with a warning; the returned list only holds
/// what could be read.
pub async fn load_uploads(paths: &[PathBuf]) -> Result<Vec<ResumeUpload>, DomainError> {
    let mut uploads = Vec::new();
    for path in expand_paths(paths).await? {
        if !is_pdf(&path) {
            warn!(path = %path.display(), "skipping non-PDF file");
            continue;
        }
        match fs::read(&path).await {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                uploads.push(ResumeUpload::new(name, bytes));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "cannot read upload"),
        }
    }
    Ok(uploads)
}

/// Split a comma-separated path list as typed in the interactive form.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\''))
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Job description from inline text, or from a file when written as `@path`.
pub async fn resolve_job_description(input: &str) -> Result<String, DomainError> {
    match input.trim().strip_prefix('@') {
        Some(path) => fs::read_to_string(path.trim())
            .await
            .map_err(|e| DomainError::InvalidInput(format!("Cannot read job description {}: {}", path, e))),
        None => Ok(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_list() {
        assert_eq!(
            parse_path_list(" a.pdf, 'b c.pdf' ,,\"d.pdf\""),
            vec![
                PathBuf::from("a.pdf"),
                PathBuf::from("b c.pdf"),
                PathBuf::from("d.pdf")
            ]
        );
        assert!(parse_path_list("  ").is_empty());
    }

    #[tokio::test]
    async fn test_directory_expands_to_sorted_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"%PDF-b").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"%PDF-a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignore").unwrap();

        let uploads = load_uploads(&[dir.path().to_path_buf()]).await.unwrap();
        let names: Vec<&str> = uploads.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
        assert_eq!(uploads[0].bytes, b"%PDF-a");
    }

    #[tokio::test]
    async fn test_missing_and_non_pdf_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("resume.txt");
        std::fs::write(&txt, b"text").unwrap();

        let uploads = load_uploads(&[txt, dir.path().join("ghost.pdf")]).await.unwrap();
        assert!(uploads.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let jd = dir.path().join("jd.txt");
        std::fs::write(&jd, "Senior Go engineer").unwrap();

        let loaded = resolve_job_description(&format!("@{}", jd.display())).await.unwrap();
        assert_eq!(loaded, "Senior Go engineer");
        assert_eq!(resolve_job_description("inline JD").await.unwrap(), "inline JD");
        assert!(resolve_job_description("@/no/such/file").await.is_err());
    }
}
