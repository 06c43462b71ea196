use serde::{Deserialize, Serialize};

/// Configured price overrides, one per priced dimension. Values stay raw
/// strings so parsing, bounds checking and fallback all happen in the
/// resolver rather than at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceOverrides {
    pub database_read: Option<String>,
    pub database_write: Option<String>,
    pub database_delete: Option<String>,
    pub database_enterprise_read: Option<String>,
    pub database_enterprise_write: Option<String>,
    pub hosting_egress: Option<String>,
    pub storage_egress: Option<String>,
    pub compute_cpu: Option<String>,
    pub compute_memory: Option<String>,
    pub compute_egress: Option<String>,
    pub compute_requests: Option<String>,
}
