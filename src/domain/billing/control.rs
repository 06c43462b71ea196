use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Trait for the protective action taken when the budget is breached
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServiceControl: Send + Sync {
    /// Disable billable services for the project. Invoked at most once per
    /// monitor run, and only when the run decided to enforce a breach.
    async fn disable_services(&self, project_id: &str) -> Result<(), DomainError>;
}
