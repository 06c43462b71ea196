//! Monitor run endpoint handlers

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::monitor::MonitorReport;

/// POST /v1/monitor/run
///
/// Executes one usage-versus-budget evaluation and returns the report.
/// Fatal errors from the run surface as 5xx responses and never trigger
/// the disable action.
pub async fn run_monitor(State(state): State<AppState>) -> Result<Json<MonitorReport>, ApiError> {
    debug!("Monitor run requested");

    let report = state.monitor.run().await.map_err(ApiError::from)?;

    Ok(Json(report))
}
