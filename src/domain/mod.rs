//! Domain layer - Core guardrail logic and entities

pub mod billing;
pub mod cost;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod pricing;
pub mod usage;

pub use billing::{
    resolve_budget, validate_budget_id, BillingSource, BudgetIdError, Money, ServiceControl,
    SUPPORTED_CURRENCY,
};
pub use cost::{
    compute_cost, database_cost, hosting_cost, storage_cost, CostContext, ResourceCost,
    ResourceKind,
};
pub use error::DomainError;
pub use metrics::{MetricsSource, Point, QueryWindow, SampleValue, TimeSeries};
pub use monitor::{MonitorMode, MonitorOutcome, MonitorReport, MonitorSettings, UsageMonitor};
pub use pricing::{resolve_price, PriceOverrides, PriceRejection, PriceSpec};
pub use usage::{current_period_start, DailyFreeTier, EditionMarks, BILLING_TIMEZONE};
