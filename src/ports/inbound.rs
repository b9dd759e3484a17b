//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI collects the form and invokes the screening use case.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive screening form until the user is done.
    async fn run(&self) -> Result<(), DomainError>;
}
