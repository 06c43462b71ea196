//! Time-series usage data model

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Placeholder identity for entries missing an expected label.
pub const UNKNOWN_LABEL: &str = "unknown";

/// A single metered sample.
///
/// Count-like metrics carry integers, duration-like metrics (CPU-seconds,
/// GiB-seconds) carry doubles. The representation is kept so a zero sample
/// is recognized in its own kind before any float conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Int(i64),
    Float(f64),
}

impl SampleValue {
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
        }
    }

    /// Converts to a usable magnitude. Negative and non-finite samples mean
    /// corrupted usage data and fail the calculation they belong to.
    pub fn checked_magnitude(&self, metric: &str) -> Result<f64, DomainError> {
        let value = self.as_f64();
        if !value.is_finite() {
            return Err(DomainError::usage_data(
                metric,
                format!("non-finite sample value {}", value),
            ));
        }
        if value < 0.0 {
            return Err(DomainError::usage_data(
                metric,
                format!("negative sample value {}", value),
            ));
        }
        Ok(value)
    }
}

/// One sample within a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Start of the sampled interval, seconds since the Unix epoch.
    pub interval_start: i64,
    pub value: SampleValue,
}

impl Point {
    pub fn new(interval_start: i64, value: SampleValue) -> Self {
        Self {
            interval_start,
            value,
        }
    }

    pub fn int(interval_start: i64, value: i64) -> Self {
        Self::new(interval_start, SampleValue::Int(value))
    }

    pub fn float(interval_start: i64, value: f64) -> Self {
        Self::new(interval_start, SampleValue::Float(value))
    }
}

/// One metered stream for one sub-resource within the query window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Labels describing the monitored resource (database id, bucket
    /// location, site name).
    pub resource_labels: HashMap<String, String>,
    /// Labels describing the metric itself (operation type, response code).
    pub metric_labels: HashMap<String, String>,
    /// Samples in provider order. Callers must not assume the samples are
    /// sorted or gap-free.
    pub points: Vec<Point>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource_labels.insert(name.into(), value.into());
        self
    }

    pub fn with_metric_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metric_labels.insert(name.into(), value.into());
        self
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }

    /// Resource label lookup that degrades to [`UNKNOWN_LABEL`] instead of
    /// failing, so a mislabeled entry still gets counted.
    pub fn resource_label(&self, name: &str) -> &str {
        self.resource_labels
            .get(name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn metric_label(&self, name: &str) -> &str {
        self.metric_labels
            .get(name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Time window a metrics query covers, from the start of the current
/// billing period up to now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}
