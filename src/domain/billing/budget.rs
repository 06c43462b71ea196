//! Budget amount model and the strict budget fetch

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::DomainError;

use super::source::BillingSource;
use super::validate_budget_id;

/// The only billing currency the guardrail understands. A budget in any
/// other currency is an operator error, not a conversion problem.
pub const SUPPORTED_CURRENCY: &str = "USD";

const NANOS_PER_UNIT: f64 = 1_000_000_000.0;

/// A monetary amount as the billing API expresses it: whole currency units
/// plus a parts-per-billion fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    /// Combined amount in whole currency units.
    pub fn amount(&self) -> f64 {
        self.units as f64 + f64::from(self.nanos) / NANOS_PER_UNIT
    }
}

/// Fetch and validate the configured budget for a project, returning the
/// threshold in whole currency units.
///
/// Every failure here is fatal: the budget gates the disable decision, so
/// a missing or malformed budget must never be papered over with a default.
pub async fn resolve_budget(
    source: &dyn BillingSource,
    project_id: &str,
    billing_account: Option<&str>,
    budget_id: &str,
) -> Result<f64, DomainError> {
    validate_budget_id(budget_id)
        .map_err(|error| DomainError::configuration(error.to_string()))?;

    let account = match billing_account {
        Some(account) if !account.is_empty() => account.to_string(),
        _ => source.billing_account(project_id).await?,
    };

    let money = source.fetch_budget(&account, budget_id).await?;

    if money.currency_code != SUPPORTED_CURRENCY {
        return Err(DomainError::configuration(format!(
            "budget {} is denominated in {:?}, only {} is supported",
            budget_id, money.currency_code, SUPPORTED_CURRENCY
        )));
    }

    let amount = money.amount();
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::configuration(format!(
            "budget {} amount {} must be a positive number",
            budget_id, amount
        )));
    }

    info!(budget_id, account = %account, amount, "Resolved budget");
    Ok(amount)
}
