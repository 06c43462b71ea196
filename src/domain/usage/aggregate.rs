//! Aggregation of raw time series into billable usage totals

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::metrics::TimeSeries;
use crate::domain::DomainError;

use super::period::billing_day_of_month;

/// Daily free allowance granted to exactly one designated sub-resource.
/// Usage on every other sub-resource is billable from the first operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyFreeTier<'a> {
    /// The sub-resource the allowance is attached to.
    pub free_id: &'a str,
    /// Allowance per billing-timezone calendar day.
    pub units_per_day: f64,
}

/// Sub-resources observed under enterprise-priced metrics during a single
/// calculation. Built fresh per run and never shared across runs.
#[derive(Debug, Default)]
pub struct EditionMarks {
    ids: HashSet<String>,
}

impl EditionMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            debug!(sub_resource = id, "Marked enterprise sub-resource");
        }
    }
}

/// Sum one entry's samples. Zero samples are skipped; a negative or
/// non-finite sample fails the whole calculation.
fn entry_total(metric: &str, entry: &TimeSeries) -> Result<f64, DomainError> {
    let mut total = 0.0;
    for point in &entry.points {
        if point.value.is_zero() {
            continue;
        }
        total += point.value.checked_magnitude(metric)?;
    }
    Ok(total)
}

/// Paid overage for a free-tier entry: samples are bucketed per calendar day
/// in the billing timezone, the allowance is subtracted from each day
/// independently (floored at zero) and the remainders are summed.
fn entry_overage(metric: &str, entry: &TimeSeries, units_per_day: f64) -> Result<f64, DomainError> {
    let mut used_per_day: BTreeMap<u32, f64> = BTreeMap::new();
    for point in &entry.points {
        if point.value.is_zero() {
            continue;
        }
        let value = point.value.checked_magnitude(metric)?;
        let day = billing_day_of_month(point.interval_start)?;
        *used_per_day.entry(day).or_insert(0.0) += value;
    }

    Ok(used_per_day
        .values()
        .map(|used| (used - units_per_day).max(0.0))
        .sum())
}

/// Total usage across all entries, with no free tier and no edition rules.
pub fn total_usage(metric: &str, entries: &[TimeSeries]) -> Result<f64, DomainError> {
    let mut total = 0.0;
    for entry in entries {
        total += entry_total(metric, entry)?;
    }
    Ok(total)
}

/// Billable usage with the daily free tier applied to the designated
/// sub-resource. `id_label` is the resource label carrying the identity.
pub fn billable_usage(
    metric: &str,
    entries: &[TimeSeries],
    id_label: &str,
    tier: &DailyFreeTier<'_>,
) -> Result<f64, DomainError> {
    billable_excluding(metric, entries, id_label, Some(tier), &EditionMarks::new())
}

/// Enterprise pass: sums the metric and records every entry's sub-resource
/// id in `marks`. Presence under an enterprise metric is the signal, so an
/// entry whose samples are all zero still gets marked.
pub fn total_and_mark(
    metric: &str,
    entries: &[TimeSeries],
    id_label: &str,
    marks: &mut EditionMarks,
) -> Result<f64, DomainError> {
    let mut total = 0.0;
    for entry in entries {
        marks.mark(entry.resource_label(id_label));
        total += entry_total(metric, entry)?;
    }
    Ok(total)
}

/// Standard pass after marking: entries whose sub-resource was marked
/// contribute nothing, because their operations are already billed under
/// the enterprise metrics. Unmarked entries follow the free-tier rule.
pub fn billable_excluding(
    metric: &str,
    entries: &[TimeSeries],
    id_label: &str,
    tier: Option<&DailyFreeTier<'_>>,
    marks: &EditionMarks,
) -> Result<f64, DomainError> {
    let mut total = 0.0;
    for entry in entries {
        let id = entry.resource_label(id_label);
        if marks.contains(id) {
            debug!(metric, sub_resource = id, "Skipping enterprise-marked entry");
            continue;
        }
        total += match tier {
            Some(tier) if id == tier.free_id => entry_overage(metric, entry, tier.units_per_day)?,
            _ => entry_total(metric, entry)?,
        };
    }
    Ok(total)
}
