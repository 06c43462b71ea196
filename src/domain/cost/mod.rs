//! Resource cost calculators
//!
//! Each calculator fetches the metrics for one resource family, reduces
//! them to billable usage and prices the result. Calculators are
//! independent: they share nothing across resource families except the
//! query window and the configured price overrides.

pub mod compute;
pub mod database;
pub mod hosting;
pub mod storage;

pub use compute::compute_cost;
pub use database::database_cost;
pub use hosting::hosting_cost;
pub use storage::storage_cost;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::metrics::QueryWindow;
use crate::domain::pricing::PriceOverrides;

/// Bytes per binary gigabyte, the unit bandwidth and egress are priced in.
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Operations per priced million.
pub const OPS_PER_MILLION: f64 = 1_000_000.0;

/// One metered resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Database,
    Hosting,
    Storage,
    Compute,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Hosting => write!(f, "hosting"),
            Self::Storage => write!(f, "storage"),
            Self::Compute => write!(f, "compute"),
        }
    }
}

/// One resource family's estimated spend over the billing period so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub resource: ResourceKind,
    /// Estimated cost in whole currency units.
    pub amount: f64,
}

impl ResourceCost {
    pub fn new(resource: ResourceKind, amount: f64) -> Self {
        Self { resource, amount }
    }
}

/// Shared inputs every calculator needs besides its metrics source.
#[derive(Debug, Clone, Copy)]
pub struct CostContext<'a> {
    pub project_id: &'a str,
    pub window: QueryWindow,
    pub prices: &'a PriceOverrides,
    /// Database granted the daily free tier, if any.
    pub free_tier_database: Option<&'a str>,
}
