use serde::Deserialize;

use crate::domain::monitor::MonitorMode;
use crate::domain::pricing::PriceOverrides;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Monitor configuration as the operator supplies it. Prices stay raw
/// strings here; the resolver validates them on every run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Master switch: "off", "on" or "dry-run".
    pub mode: MonitorMode,
    pub project_id: String,
    /// Billing account override. Unset means resolve it via the billing API.
    pub billing_account: Option<String>,
    pub budget_id: String,
    /// Database granted the daily free tier, if any.
    pub free_tier_database: Option<String>,
    /// Bearer token for the metrics and billing APIs.
    pub auth_token: String,
    /// Endpoint overrides, mainly for tests and local stubs.
    pub metrics_base_url: Option<String>,
    pub billing_base_url: Option<String>,
    pub prices: PriceOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            mode: MonitorMode::Off,
            project_id: String::new(),
            billing_account: None,
            budget_id: String::new(),
            free_tier_database: None,
            auth_token: String::new(),
            metrics_base_url: None,
            billing_base_url: None,
            prices: PriceOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_safe() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        // The monitor never acts unless the operator turns it on.
        assert_eq!(config.monitor.mode, MonitorMode::Off);
        assert!(config.monitor.billing_account.is_none());
    }

    #[test]
    fn test_monitor_config_deserializes_from_partial_input() {
        let config: MonitorConfig = serde_json::from_str(
            r#"{
                "mode": "dry-run",
                "project_id": "demo-project",
                "budget_id": "monthly-cap",
                "prices": {"database_read": "0.75"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, MonitorMode::DryRun);
        assert_eq!(config.project_id, "demo-project");
        assert_eq!(config.budget_id, "monthly-cap");
        assert_eq!(config.prices.database_read.as_deref(), Some("0.75"));
        assert!(config.free_tier_database.is_none());
        assert!(config.metrics_base_url.is_none());
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
