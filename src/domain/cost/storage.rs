//! Object-storage egress costs

use tracing::{info, instrument};

use crate::domain::metrics::MetricsSource;
use crate::domain::pricing::{resolve_price, PriceSpec};
use crate::domain::usage::total_usage;
use crate::domain::DomainError;

use super::{CostContext, ResourceCost, ResourceKind, BYTES_PER_GIB};

pub const EGRESS_METRIC: &str = "storage/network/sent_bytes_count";

/// Bucket label carrying the region the data was served from.
const LOCATION_LABEL: &str = "location";

/// Monthly no-cost egress, granted only to quota-eligible regions.
const FREE_BYTES_PER_MONTH: f64 = BYTES_PER_GIB;

const EGRESS_PRICE: PriceSpec = PriceSpec::new("storage.egress_per_gib", 0.12, 0.01, 5.0);

/// The monthly allowance covers US regions and the North American
/// multi-region. Buckets elsewhere, and buckets whose location is missing,
/// pay from the first byte and never consume the allowance.
fn quota_eligible(location: &str) -> bool {
    let location = location.to_ascii_lowercase();
    location.starts_with("us") || location.starts_with("nam")
}

/// Estimate object-storage egress spend for the window.
#[instrument(skip(source, ctx))]
pub async fn storage_cost(
    source: &dyn MetricsSource,
    ctx: &CostContext<'_>,
) -> Result<ResourceCost, DomainError> {
    let series = source
        .fetch_time_series(ctx.project_id, EGRESS_METRIC, ctx.window)
        .await?;

    let (eligible, other): (Vec<_>, Vec<_>) = series
        .into_iter()
        .partition(|entry| quota_eligible(entry.resource_label(LOCATION_LABEL)));

    let eligible_bytes = total_usage(EGRESS_METRIC, &eligible)?;
    let other_bytes = total_usage(EGRESS_METRIC, &other)?;
    let billable_bytes = (eligible_bytes - FREE_BYTES_PER_MONTH).max(0.0) + other_bytes;

    let price = resolve_price(&EGRESS_PRICE, ctx.prices.storage_egress.as_deref());
    let amount = billable_bytes / BYTES_PER_GIB * price;

    info!(
        eligible_bytes,
        other_bytes,
        billable_bytes,
        price_per_gib = price,
        cost = amount,
        "Storage cost computed"
    );

    Ok(ResourceCost::new(ResourceKind::Storage, amount))
}
