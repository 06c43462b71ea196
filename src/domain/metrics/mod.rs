//! Metered usage time series and the source they are fetched from

mod entity;
mod source;

pub use entity::{Point, QueryWindow, SampleValue, TimeSeries, UNKNOWN_LABEL};
pub use source::MetricsSource;

#[cfg(test)]
pub use source::mock::MockMetricsSource;
