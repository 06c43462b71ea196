//! Spend guard for metered cloud projects
//!
//! Polls metered usage for a project, prices it against free tiers and
//! configurable unit rates, and compares the month-to-date total to a
//! budget fetched from the billing API. When the budget is breached the
//! guard detaches billing from the project so spending stops.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::monitor::{MonitorSettings, UsageMonitor};
use infrastructure::http::{BillingApiClient, BillingServiceControl, HttpClient, MetricsApiClient};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the monitor with its HTTP connectors from configuration
pub fn build_monitor(config: &AppConfig) -> UsageMonitor {
    let client = HttpClient::with_timeout(HTTP_TIMEOUT);
    let monitor = &config.monitor;

    let metrics = match &monitor.metrics_base_url {
        Some(base_url) => {
            MetricsApiClient::with_base_url(client.clone(), &monitor.auth_token, base_url)
        }
        None => MetricsApiClient::new(client.clone(), &monitor.auth_token),
    };

    let billing = match &monitor.billing_base_url {
        Some(base_url) => {
            BillingApiClient::with_base_url(client.clone(), &monitor.auth_token, base_url)
        }
        None => BillingApiClient::new(client.clone(), &monitor.auth_token),
    };

    let control = match &monitor.billing_base_url {
        Some(base_url) => {
            BillingServiceControl::with_base_url(client, &monitor.auth_token, base_url)
        }
        None => BillingServiceControl::new(client, &monitor.auth_token),
    };

    let settings = MonitorSettings {
        mode: monitor.mode,
        project_id: monitor.project_id.clone(),
        billing_account: monitor.billing_account.clone(),
        budget_id: monitor.budget_id.clone(),
        free_tier_database: monitor.free_tier_database.clone(),
        prices: monitor.prices.clone(),
    };

    UsageMonitor::new(
        Arc::new(metrics),
        Arc::new(billing),
        Arc::new(control),
        settings,
    )
}
