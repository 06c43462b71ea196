//! Application state for shared services

use std::sync::Arc;

use crate::domain::monitor::UsageMonitor;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<UsageMonitor>,
}

impl AppState {
    /// Create new application state with the provided monitor
    pub fn new(monitor: Arc<UsageMonitor>) -> Self {
        Self { monitor }
    }
}
