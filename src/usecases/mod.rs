//! Application use cases. Orchestrate domain logic via ports.

pub mod screening_service;

pub use screening_service::ScreeningService;
