//! Persistence adapters. Optional scan log.

pub mod sqlite_repo;

pub use sqlite_repo::SqliteScanLog;
