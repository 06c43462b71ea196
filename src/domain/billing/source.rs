use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::budget::Money;
use crate::domain::DomainError;

/// Trait for the billing backend (account lookup and budget reads)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BillingSource: Send + Sync {
    /// Resolve the billing account that funds the project.
    async fn billing_account(&self, project_id: &str) -> Result<String, DomainError>;

    /// Fetch the configured amount of one budget.
    async fn fetch_budget(
        &self,
        billing_account: &str,
        budget_id: &str,
    ) -> Result<Money, DomainError>;
}
