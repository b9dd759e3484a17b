//! Infrastructure adapters. Implement outbound ports.
//!
//! LLM backends, PDF extraction, scan log, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod pdf;
pub mod persistence;
pub mod ui;
