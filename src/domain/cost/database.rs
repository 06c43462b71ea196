//! Document-database operation costs, standard and enterprise editions

use tracing::{info, instrument};

use crate::domain::metrics::MetricsSource;
use crate::domain::pricing::{resolve_price, PriceSpec};
use crate::domain::usage::{billable_excluding, total_and_mark, DailyFreeTier, EditionMarks};
use crate::domain::DomainError;

use super::{CostContext, ResourceCost, ResourceKind, OPS_PER_MILLION};

pub const READS_METRIC: &str = "database/document/read_count";
pub const WRITES_METRIC: &str = "database/document/write_count";
pub const DELETES_METRIC: &str = "database/document/delete_count";
pub const ENTERPRISE_READS_METRIC: &str = "database/document/enterprise/read_unit_count";
pub const ENTERPRISE_WRITES_METRIC: &str = "database/document/enterprise/write_unit_count";

/// Resource label carrying the database identity.
const DATABASE_ID_LABEL: &str = "database_id";

/// Daily free allowances on the designated free-tier database.
const FREE_READS_PER_DAY: f64 = 50_000.0;
const FREE_WRITES_PER_DAY: f64 = 20_000.0;
const FREE_DELETES_PER_DAY: f64 = 20_000.0;

const READ_PRICE: PriceSpec = PriceSpec::new("database.read_per_million", 0.60, 0.01, 10.0);
const WRITE_PRICE: PriceSpec = PriceSpec::new("database.write_per_million", 1.80, 0.01, 10.0);
const DELETE_PRICE: PriceSpec = PriceSpec::new("database.delete_per_million", 0.20, 0.01, 10.0);
const ENTERPRISE_READ_PRICE: PriceSpec =
    PriceSpec::new("database.enterprise_read_per_million", 0.50, 0.01, 10.0);
const ENTERPRISE_WRITE_PRICE: PriceSpec =
    PriceSpec::new("database.enterprise_write_per_million", 1.50, 0.01, 10.0);

/// Estimate document-database spend for the window.
///
/// Enterprise metrics are aggregated first and every database seen there is
/// excluded from the standard metrics, so operations billed as enterprise
/// read/write units are never double counted under standard pricing.
#[instrument(skip(source, ctx))]
pub async fn database_cost(
    source: &dyn MetricsSource,
    ctx: &CostContext<'_>,
) -> Result<ResourceCost, DomainError> {
    let (enterprise_reads, enterprise_writes, reads, writes, deletes) = tokio::try_join!(
        source.fetch_time_series(ctx.project_id, ENTERPRISE_READS_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, ENTERPRISE_WRITES_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, READS_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, WRITES_METRIC, ctx.window),
        source.fetch_time_series(ctx.project_id, DELETES_METRIC, ctx.window),
    )?;

    let mut marks = EditionMarks::new();
    let enterprise_read_units = total_and_mark(
        ENTERPRISE_READS_METRIC,
        &enterprise_reads,
        DATABASE_ID_LABEL,
        &mut marks,
    )?;
    let enterprise_write_units = total_and_mark(
        ENTERPRISE_WRITES_METRIC,
        &enterprise_writes,
        DATABASE_ID_LABEL,
        &mut marks,
    )?;

    let billable_reads = billable_excluding(
        READS_METRIC,
        &reads,
        DATABASE_ID_LABEL,
        free_tier(ctx, FREE_READS_PER_DAY).as_ref(),
        &marks,
    )?;
    let billable_writes = billable_excluding(
        WRITES_METRIC,
        &writes,
        DATABASE_ID_LABEL,
        free_tier(ctx, FREE_WRITES_PER_DAY).as_ref(),
        &marks,
    )?;
    let billable_deletes = billable_excluding(
        DELETES_METRIC,
        &deletes,
        DATABASE_ID_LABEL,
        free_tier(ctx, FREE_DELETES_PER_DAY).as_ref(),
        &marks,
    )?;

    let read_price = resolve_price(&READ_PRICE, ctx.prices.database_read.as_deref());
    let write_price = resolve_price(&WRITE_PRICE, ctx.prices.database_write.as_deref());
    let delete_price = resolve_price(&DELETE_PRICE, ctx.prices.database_delete.as_deref());
    let enterprise_read_price = resolve_price(
        &ENTERPRISE_READ_PRICE,
        ctx.prices.database_enterprise_read.as_deref(),
    );
    let enterprise_write_price = resolve_price(
        &ENTERPRISE_WRITE_PRICE,
        ctx.prices.database_enterprise_write.as_deref(),
    );

    let amount = billable_reads / OPS_PER_MILLION * read_price
        + billable_writes / OPS_PER_MILLION * write_price
        + billable_deletes / OPS_PER_MILLION * delete_price
        + enterprise_read_units / OPS_PER_MILLION * enterprise_read_price
        + enterprise_write_units / OPS_PER_MILLION * enterprise_write_price;

    info!(
        reads = billable_reads,
        writes = billable_writes,
        deletes = billable_deletes,
        enterprise_read_units,
        enterprise_write_units,
        read_price,
        write_price,
        delete_price,
        enterprise_read_price,
        enterprise_write_price,
        cost = amount,
        "Database cost computed"
    );

    Ok(ResourceCost::new(ResourceKind::Database, amount))
}

fn free_tier<'a>(ctx: &CostContext<'a>, units_per_day: f64) -> Option<DailyFreeTier<'a>> {
    ctx.free_tier_database.map(|free_id| DailyFreeTier {
        free_id,
        units_per_day,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{MockMetricsSource, Point, QueryWindow, TimeSeries};
    use crate::domain::pricing::PriceOverrides;
    use chrono::{TimeZone, Utc};

    fn window() -> QueryWindow {
        QueryWindow::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
        )
    }

    fn epoch(day: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
            .unwrap()
            .timestamp()
    }

    fn db_entry(id: &str, points: Vec<Point>) -> TimeSeries {
        TimeSeries::new()
            .with_resource_label("database_id", id)
            .with_points(points)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[tokio::test]
    async fn test_no_usage_costs_nothing() {
        let source = MockMetricsSource::new();
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        assert_eq!(cost.resource, ResourceKind::Database);
        assert_eq!(cost.amount, 0.0);
    }

    #[tokio::test]
    async fn test_standard_operations_priced_per_million() {
        let source = MockMetricsSource::new()
            .with_series(
                READS_METRIC,
                vec![db_entry("orders", vec![Point::int(epoch(10, 12), 2_000_000)])],
            )
            .with_series(
                WRITES_METRIC,
                vec![db_entry("orders", vec![Point::int(epoch(10, 12), 1_000_000)])],
            );
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        // 2M reads at 0.60/M plus 1M writes at 1.80/M.
        assert_close(cost.amount, 2.0 * 0.60 + 1.80);
    }

    #[tokio::test]
    async fn test_free_tier_database_only_pays_overage() {
        let source = MockMetricsSource::new().with_series(
            READS_METRIC,
            vec![db_entry(
                "(default)",
                vec![
                    Point::int(epoch(10, 12), 5_000),
                    Point::int(epoch(11, 12), 60_000),
                ],
            )],
        );
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: Some("(default)"),
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        // Only day two's 10_000 read overage is billable.
        assert_close(cost.amount, 10_000.0 / 1_000_000.0 * 0.60);
    }

    #[tokio::test]
    async fn test_enterprise_databases_are_excluded_from_standard_pricing() {
        let source = MockMetricsSource::new()
            .with_series(
                ENTERPRISE_READS_METRIC,
                vec![db_entry("orders", vec![Point::int(epoch(10, 12), 2_000_000)])],
            )
            .with_series(
                READS_METRIC,
                vec![
                    db_entry("orders", vec![Point::int(epoch(10, 12), 2_000_000)]),
                    db_entry("users", vec![Point::int(epoch(10, 12), 1_000_000)]),
                ],
            );
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        // orders: 2M enterprise read units at 0.50/M. users: 1M standard
        // reads at 0.60/M. The standard series for orders contributes nothing.
        assert_close(cost.amount, 2.0 * 0.50 + 0.60);
    }

    #[tokio::test]
    async fn test_price_overrides_are_applied() {
        let source = MockMetricsSource::new().with_series(
            READS_METRIC,
            vec![db_entry("orders", vec![Point::int(epoch(10, 12), 1_000_000)])],
        );
        let prices = PriceOverrides {
            database_read: Some("1.0".to_string()),
            ..Default::default()
        };
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        assert_eq!(cost.amount, 1.0);
    }

    #[tokio::test]
    async fn test_out_of_range_override_falls_back_to_default() {
        let source = MockMetricsSource::new().with_series(
            READS_METRIC,
            vec![db_entry("orders", vec![Point::int(epoch(10, 12), 1_000_000)])],
        );
        let prices = PriceOverrides {
            database_read: Some("99.0".to_string()),
            ..Default::default()
        };
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let cost = database_cost(&source, &ctx).await.unwrap();
        assert_close(cost.amount, 0.60);
    }

    #[tokio::test]
    async fn test_corrupt_samples_fail_the_calculation() {
        let source = MockMetricsSource::new().with_series(
            WRITES_METRIC,
            vec![db_entry("orders", vec![Point::int(epoch(10, 12), -20)])],
        );
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        let error = database_cost(&source, &ctx).await.unwrap_err();
        assert!(matches!(error, DomainError::UsageData { .. }));
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let source = MockMetricsSource::new().with_error(DELETES_METRIC, "HTTP 503");
        let prices = PriceOverrides::default();
        let ctx = CostContext {
            project_id: "demo-project",
            window: window(),
            prices: &prices,
            free_tier_database: None,
        };

        assert!(database_cost(&source, &ctx).await.is_err());
    }
}
