//! HTTP connectors for the cloud provider's metrics and billing APIs

pub mod billing;
pub mod client;
pub mod control;
pub mod monitoring;

pub use billing::BillingApiClient;
pub use client::{HttpClient, HttpClientTrait};
pub use control::BillingServiceControl;
pub use monitoring::MetricsApiClient;
