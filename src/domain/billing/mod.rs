//! Billing domain: budget resolution and the service kill switch

mod budget;
mod control;
mod source;

pub use budget::{resolve_budget, Money, SUPPORTED_CURRENCY};
pub use control::ServiceControl;
pub use source::BillingSource;

#[cfg(test)]
pub use control::MockServiceControl;
#[cfg(test)]
pub use source::MockBillingSource;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for budget IDs
pub const MAX_BUDGET_ID_LENGTH: usize = 64;

static BUDGET_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Validate a budget ID before it is interpolated into an API path
pub fn validate_budget_id(id: &str) -> Result<(), BudgetIdError> {
    if id.is_empty() {
        return Err(BudgetIdError::Empty);
    }

    if id.len() > MAX_BUDGET_ID_LENGTH {
        return Err(BudgetIdError::TooLong(id.len()));
    }

    if !BUDGET_ID_PATTERN.is_match(id) {
        return Err(BudgetIdError::InvalidFormat);
    }

    Ok(())
}

/// Budget ID validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetIdError {
    Empty,
    TooLong(usize),
    InvalidFormat,
}

impl std::fmt::Display for BudgetIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Budget ID cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "Budget ID too long: {} chars (max {})",
                len, MAX_BUDGET_ID_LENGTH
            ),
            Self::InvalidFormat => {
                write!(f, "Budget ID must be alphanumeric with hyphens/underscores")
            }
        }
    }
}

impl std::error::Error for BudgetIdError {}
