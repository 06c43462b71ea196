//! Health check endpoints for Kubernetes probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::domain::monitor::{MonitorMode, MonitorSettings};

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

/// Health check status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness probes
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check verifying the monitor configuration
/// A monitor that is switched on but missing its identifiers can never
/// complete a run, so readiness fails until the config is corrected.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.monitor.settings();
    let checks = vec![check_project(settings), check_budget(settings)];

    let overall_status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used for Kubernetes liveness probes to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn check_project(settings: &MonitorSettings) -> HealthCheck {
    if settings.mode == MonitorMode::Off {
        return HealthCheck {
            name: "project".to_string(),
            status: HealthStatus::Healthy,
            message: Some("monitoring is off".to_string()),
        };
    }

    if settings.project_id.is_empty() {
        HealthCheck {
            name: "project".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some("project_id is not configured".to_string()),
        }
    } else {
        HealthCheck {
            name: "project".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }
}

fn check_budget(settings: &MonitorSettings) -> HealthCheck {
    if settings.mode == MonitorMode::Off {
        return HealthCheck {
            name: "budget".to_string(),
            status: HealthStatus::Healthy,
            message: Some("monitoring is off".to_string()),
        };
    }

    if settings.budget_id.is_empty() {
        HealthCheck {
            name: "budget".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some("budget_id is not configured".to_string()),
        }
    } else {
        HealthCheck {
            name: "budget".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::PriceOverrides;

    fn settings(mode: MonitorMode, project_id: &str, budget_id: &str) -> MonitorSettings {
        MonitorSettings {
            mode,
            project_id: project_id.to_string(),
            billing_account: None,
            budget_id: budget_id.to_string(),
            free_tier_database: None,
            prices: PriceOverrides::default(),
        }
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[test]
    fn test_missing_project_id_is_unhealthy() {
        let check = check_project(&settings(MonitorMode::On, "", "budget-1"));
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert!(check.message.unwrap().contains("project_id"));
    }

    #[test]
    fn test_missing_budget_id_is_unhealthy() {
        let check = check_budget(&settings(MonitorMode::DryRun, "my-project", ""));
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert!(check.message.unwrap().contains("budget_id"));
    }

    #[test]
    fn test_off_mode_is_always_ready() {
        let config = settings(MonitorMode::Off, "", "");
        assert_eq!(check_project(&config).status, HealthStatus::Healthy);
        assert_eq!(check_budget(&config).status, HealthStatus::Healthy);
    }

    #[test]
    fn test_configured_monitor_is_ready() {
        let config = settings(MonitorMode::On, "my-project", "budget-1");
        let check = check_project(&config);
        assert_eq!(check.status, HealthStatus::Healthy);
        assert!(check.message.is_none());
    }
}
