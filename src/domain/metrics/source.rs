use async_trait::async_trait;
use std::fmt::Debug;

use super::{QueryWindow, TimeSeries};
use crate::domain::DomainError;

/// Trait for the metered-usage backend (cloud monitoring API)
#[async_trait]
pub trait MetricsSource: Send + Sync + Debug {
    /// Fetch every time series recorded for one metric within the window.
    ///
    /// An empty result means no usage. Entries and their samples come back
    /// in provider order with no sorting or density guarantees.
    async fn fetch_time_series(
        &self,
        project_id: &str,
        metric_id: &str,
        window: QueryWindow,
    ) -> Result<Vec<TimeSeries>, DomainError>;
}
