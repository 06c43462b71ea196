//! Serverless compute costs: CPU time, memory time, egress and invocations

use tracing::{info, instrument};

use crate::domain::metrics::MetricsSource;
use crate::domain::pricing::{resolve_price, PriceSpec};
use crate::domain::usage::total_usage;
use crate::domain::DomainError;

use super::{CostContext, ResourceCost, ResourceKind, BYTES_PER_GIB, OPS_PER_MILLION};

pub const CPU_SECONDS_METRIC: &str = "compute/cpu/allocation_time";
pub const MEMORY_GIB_SECONDS_METRIC: &str = "compute/memory/allocation_time";
pub const EGRESS_METRIC: &str = "compute/network/sent_bytes_count";
pub const REQUESTS_METRIC: &str = "compute/request_count";

/// Monthly no-cost allotments, each applied to its own dimension.
const FREE_CPU_SECONDS: f64 = 180_000.0;
const FREE_MEMORY_GIB_SECONDS: f64 = 360_000.0;
const FREE_EGRESS_BYTES: f64 = BYTES_PER_GIB;
const FREE_REQUESTS: f64 = 2_000_000.0;

const CPU_PRICE: PriceSpec = PriceSpec::new("compute.cpu_per_second", 0.000_024, 0.000_001, 0.01);
const MEMORY_PRICE: PriceSpec =
    PriceSpec::new("compute.memory_per_gib_second", 0.000_002_5, 0.000_000_1, 0.001);
const EGRESS_PRICE: PriceSpec = PriceSpec::new("compute.egress_per_gib", 0.12, 0.01, 5.0);
const REQUEST_PRICE: PriceSpec = PriceSpec::new("compute.requests_per_million", 0.40, 0.01, 5.0);

/// Estimate serverless compute spend for the window. The four dimensions
/// are metered and priced independently, then summed.
#[instrument(skip(source, ctx))]
pub async fn compute_cost(
    source: &dyn MetricsSource,
    ctx: &CostContext<'_>,
) -> Result<ResourceCost, DomainError> {
    let (cpu, memory, egress, requests) = tokio::try_join!(
        source.fetch_time_series(ctx.project_id, CPU_SECONDS_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, MEMORY_GIB_SECONDS_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, EGRESS_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, REQUESTS_METRIC, ctx.window),
    )?;

    let cpu_seconds = total_usage(CPU_SECONDS_METRIC, &cpu)?;
    let memory_gib_seconds = total_usage(MEMORY_GIB_SECONDS_METRIC, &memory)?;
    let egress_bytes = total_usage(EGRESS_METRIC, &egress)?;
    let request_count = total_usage(REQUESTS_METRIC, &requests)?;

    let billable_cpu = (cpu_seconds - FREE_CPU_SECONDS).max(0.0);
    let billable_memory = (memory_gib_seconds - FREE_MEMORY_GIB_SECONDS).max(0.0);
    let billable_egress = (egress_bytes - FREE_EGRESS_BYTES).max(0.0);
    let billable_requests = (request_count - FREE_REQUESTS).max(0.0);

    let cpu_price = resolve_price(&CPU_PRICE, ctx.prices.compute_cpu.as_deref());
    let memory_price = resolve_price(&MEMORY_PRICE, ctx.prices.compute_memory.as_deref());
    let egress_price = resolve_price(&EGRESS_PRICE, ctx.prices.compute_egress.as_deref());
    let request_price = resolve_price(&REQUEST_PRICE, ctx.prices.compute_requests.as_deref());

    let amount = billable_cpu * cpu_price
        + billable_memory * memory_price
        + billable_egress / BYTES_PER_GIB * egress_price
        + billable_requests / OPS_PER_MILLION * request_price;

    info!(
        cpu_seconds,
        memory_gib_seconds,
        egress_bytes,
        request_count,
        billable_cpu,
        billable_memory,
        billable_egress,
        billable_requests,
        cpu_price,
        memory_price,
        egress_price,
        request_price,
        cost = amount,
        "Compute cost computed"
    );

    Ok(ResourceCost::new(ResourceKind::Compute, amount))
}
