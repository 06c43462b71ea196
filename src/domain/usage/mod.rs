//! Usage aggregation: zero-skip summation, daily free quotas and the
//! enterprise/standard edition split

mod aggregate;
mod period;

pub use aggregate::{
    billable_excluding, billable_usage, total_and_mark, total_usage, DailyFreeTier, EditionMarks,
};
pub use period::{billing_day_of_month, current_period_start, BILLING_TIMEZONE};
