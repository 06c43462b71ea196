//! Hosting bandwidth costs

use tracing::{info, instrument};

use crate::domain::metrics::MetricsSource;
use crate::domain::pricing::{resolve_price, PriceSpec};
use crate::domain::usage::total_usage;
use crate::domain::DomainError;

use super::{CostContext, ResourceCost, ResourceKind, BYTES_PER_GIB};

pub const EGRESS_METRIC: &str = "hosting/network/sent_bytes_count";

/// Monthly no-cost transfer allowance, applied to the aggregate total.
const FREE_BYTES_PER_MONTH: f64 = 10.0 * BYTES_PER_GIB;

const EGRESS_PRICE: PriceSpec = PriceSpec::new("hosting.egress_per_gib", 0.15, 0.01, 5.0);

/// Estimate hosting bandwidth spend for the window. All sites share one
/// monthly allowance; only the remainder is priced.
#[instrument(skip(source, ctx))]
pub async fn hosting_cost(
    source: &dyn MetricsSource,
    ctx: &CostContext<'_>,
) -> Result<ResourceCost, DomainError> {
    let series = source
        .fetch_time_series(ctx.project_id, EGRESS_METRIC, ctx.window)
        .await?;

    let total_bytes = total_usage(EGRESS_METRIC, &series)?;
    let billable_bytes = (total_bytes - FREE_BYTES_PER_MONTH).max(0.0);
    let price = resolve_price(&EGRESS_PRICE, ctx.prices.hosting_egress.as_deref());
    let amount = billable_bytes / BYTES_PER_GIB * price;

    info!(
        total_bytes,
        billable_bytes,
        price_per_gib = price,
        cost = amount,
        "Hosting cost computed"
    );

    Ok(ResourceCost::new(ResourceKind::Hosting, amount))
}
