//! libSQL-backed scan log. Implements ScanLogPort.
//!
//! Either a local SQLite file or a remote libSQL/Turso database. Single insert-only
//! `resume_scans` table, one row per candidate per run.

use crate::domain::{DomainError, ScanRecord};
use crate::ports::ScanLogPort;
use libsql::{Database, params};
use std::path::Path;
use tracing::info;

const SCANS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS resume_scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_title TEXT NOT NULL,
    candidate_name TEXT NOT NULL,
    match_score INTEGER NOT NULL DEFAULT 0,
    summary TEXT NOT NULL DEFAULT '',
    scanned_at INTEGER NOT NULL
)"#;
const SCANS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_resume_scans_scanned_at ON resume_scans (scanned_at DESC)";

pub struct SqliteScanLog {
    db: Database,
    location: String,
}

impl SqliteScanLog {
    /// Open (or create) a local database file. Parent directories are created.
    pub async fn connect_local(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DomainError::Repo(e.to_string()))?;
        }
        let location = path.to_string_lossy().to_string();
        let db = libsql::Builder::new_local(location.as_str())
            .build()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        Self::init(db, location).await
    }

    /// Connect to a remote libSQL server (e.g. Turso).
    pub async fn connect_remote(url: &str, token: &str) -> Result<Self, DomainError> {
        let db = libsql::Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        Self::init(db, url.to_string()).await
    }

    async fn init(db: Database, location: String) -> Result<Self, DomainError> {
        let conn = db.connect().map_err(|e| DomainError::Repo(e.to_string()))?;
        conn.execute(SCANS_TABLE, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        conn.execute(SCANS_INDEX, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;

        info!(location = %location, "scan log connected");
        Ok(Self { db, location })
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[async_trait::async_trait]
impl ScanLogPort for SqliteScanLog {
    async fn save_scan(&self, record: &ScanRecord) -> Result<(), DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO resume_scans (job_title, candidate_name, match_score, summary, scanned_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.job_title.as_str(),
                record.candidate_name.as_str(),
                record.match_score,
                record.summary.as_str(),
                record.scanned_at
            ],
        )
        .await
        .map_err(|e| DomainError::Repo(e.to_string()))?;
        Ok(())
    }

    async fn recent_scans(&self, limit: u32) -> Result<Vec<ScanRecord>, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let mut rows = conn
            .query(
                r#"
                SELECT job_title, candidate_name, match_score, summary, scanned_at
                FROM resume_scans
                ORDER BY scanned_at DESC, id DESC
                LIMIT ?1
                "#,
                params![i64::from(limit)],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;

        let mut scans = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            scans.push(ScanRecord {
                job_title: row.get::<String>(0).unwrap_or_default(),
                candidate_name: row.get::<String>(1).unwrap_or_default(),
                match_score: row.get::<i64>(2).unwrap_or_default(),
                summary: row.get::<String>(3).unwrap_or_default(),
                scanned_at: row.get::<i64>(4).map_err(|e| DomainError::Repo(e.to_string()))?,
            });
        }
        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: i64, at: i64) -> ScanRecord {
        ScanRecord {
            job_title: "Senior Go engineer".to_string(),
            candidate_name: name.to_string(),
            match_score: score,
            summary: format!("{} summary", name),
            scanned_at: at,
        }
    }

    #[tokio::test]
    async fn test_save_and_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let log = SqliteScanLog::connect_local(dir.path().join("nested/scans.db"))
            .await
            .unwrap();

        log.save_scan(&record("Alice", 90, 100)).await.unwrap();
        log.save_scan(&record("Bob", 20, 200)).await.unwrap();

        let scans = log.recent_scans(10).await.unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0], record("Bob", 20, 200));
        assert_eq!(scans[1].candidate_name, "Alice");

        assert_eq!(log.recent_scans(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scans.db");
        {
            let log = SqliteScanLog::connect_local(&path).await.unwrap();
            log.save_scan(&record("Alice", 90, 100)).await.unwrap();
        }
        let log = SqliteScanLog::connect_local(&path).await.unwrap();
        assert_eq!(log.recent_scans(5).await.unwrap().len(), 1);
    }
}
