//! The usage monitor
//!
//! One run fans out the budget fetch and every resource cost calculator
//! concurrently, sums the estimates, and detaches billing when the total
//! exceeds the budget. A run either completes with a full comparison or
//! fails without touching the kill switch.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::billing::{resolve_budget, BillingSource, ServiceControl};
use crate::domain::cost::{
    compute_cost, database_cost, hosting_cost, storage_cost, CostContext, ResourceCost,
};
use crate::domain::metrics::{MetricsSource, QueryWindow};
use crate::domain::pricing::PriceOverrides;
use crate::domain::usage::current_period_start;
use crate::domain::DomainError;

/// Master switch for the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonitorMode {
    /// Monitoring disabled; runs are no-ops.
    #[default]
    Off,
    /// A breach disables billable services.
    On,
    /// A breach is logged but services stay up.
    DryRun,
}

impl fmt::Display for MonitorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
            Self::DryRun => write!(f, "dry-run"),
        }
    }
}

/// Static inputs shared by every run.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub mode: MonitorMode,
    pub project_id: String,
    /// Billing account override. When unset the account is resolved
    /// through the billing API.
    pub billing_account: Option<String>,
    pub budget_id: String,
    /// Database granted the daily free tier, if any.
    pub free_tier_database: Option<String>,
    pub prices: PriceOverrides,
}

/// Everything a completed run decided and observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorOutcome {
    pub run_id: Uuid,
    pub mode: MonitorMode,
    pub total_cost: f64,
    pub budget: f64,
    pub breached: bool,
    pub services_disabled: bool,
    pub costs: Vec<ResourceCost>,
}

/// What a single invocation did.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonitorReport {
    /// The master switch is off; nothing was fetched or compared.
    Disabled,
    Completed(MonitorOutcome),
}

/// Runs the cost/budget comparison. Holds its collaborators behind traits
/// so runs are driven the same way in production and in tests.
pub struct UsageMonitor {
    metrics: Arc<dyn MetricsSource>,
    billing: Arc<dyn BillingSource>,
    control: Arc<dyn ServiceControl>,
    settings: MonitorSettings,
}

impl UsageMonitor {
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        billing: Arc<dyn BillingSource>,
        control: Arc<dyn ServiceControl>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            metrics,
            billing,
            control,
            settings,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Execute one monitor run.
    ///
    /// The budget fetch and all four calculators run concurrently; the
    /// first fatal error aborts the run before any comparison, so the
    /// disable action can never fire on partial data.
    #[instrument(skip(self), fields(project = %self.settings.project_id, mode = %self.settings.mode))]
    pub async fn run(&self) -> Result<MonitorReport, DomainError> {
        if self.settings.mode == MonitorMode::Off {
            info!("Monitoring is off, skipping run");
            return Ok(MonitorReport::Disabled);
        }

        let run_id = Uuid::new_v4();
        let now = Utc::now();
        let window = QueryWindow::new(current_period_start(now)?, now);
        info!(run_id = %run_id, window_start = %window.start, "Starting usage monitor run");

        let ctx = CostContext {
            project_id: &self.settings.project_id,
            window,
            prices: &self.settings.prices,
            free_tier_database: self.settings.free_tier_database.as_deref(),
        };

        let (budget, database, hosting, storage, compute) = tokio::try_join!(
            resolve_budget(
                self.billing.as_ref(),
                &self.settings.project_id,
                self.settings.billing_account.as_deref(),
                &self.settings.budget_id,
            ),
            database_cost(self.metrics.as_ref(), &ctx),
            hosting_cost(self.metrics.as_ref(), &ctx),
            storage_cost(self.metrics.as_ref(), &ctx),
            compute_cost(self.metrics.as_ref(), &ctx),
        )?;

        let costs = vec![database, hosting, storage, compute];
        let total_cost: f64 = costs.iter().map(|cost| cost.amount).sum();
        let breached = total_cost > budget;

        for cost in &costs {
            info!(run_id = %run_id, resource = %cost.resource, amount = cost.amount, "Resource cost");
        }
        info!(run_id = %run_id, total_cost, budget, breached, "Usage monitor comparison");

        let mut services_disabled = false;
        if breached {
            if self.settings.mode == MonitorMode::DryRun {
                warn!(
                    run_id = %run_id,
                    total_cost,
                    budget,
                    "Budget exceeded in dry-run mode, skipping disable action"
                );
            } else {
                warn!(run_id = %run_id, total_cost, budget, "Budget exceeded, disabling services");
                self.control
                    .disable_services(&self.settings.project_id)
                    .await?;
                services_disabled = true;
            }
        }

        Ok(MonitorReport::Completed(MonitorOutcome {
            run_id,
            mode: self.settings.mode,
            total_cost,
            budget,
            breached,
            services_disabled,
            costs,
        }))
    }
}
