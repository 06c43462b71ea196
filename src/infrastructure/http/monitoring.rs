//! Metrics API connector: time-series listing over REST

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use serde::Deserialize;
use tracing::debug;

use super::client::HttpClientTrait;
use crate::domain::metrics::{MetricsSource, Point, QueryWindow, SampleValue, TimeSeries};
use crate::domain::DomainError;

const DEFAULT_METRICS_BASE_URL: &str = "https://monitoring.googleapis.com";
const PROVIDER: &str = "metrics-api";

/// REST connector for the cloud monitoring time-series API
#[derive(Debug)]
pub struct MetricsApiClient<C: HttpClientTrait> {
    client: C,
    bearer: Option<String>,
    base_url: String,
}

impl<C: HttpClientTrait> MetricsApiClient<C> {
    pub fn new(client: C, auth_token: impl Into<String>) -> Self {
        Self::with_base_url(client, auth_token, DEFAULT_METRICS_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        auth_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_token = auth_token.into();
        let bearer = if auth_token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", auth_token))
        };

        Self {
            client,
            bearer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn list_url(&self, project_id: &str) -> String {
        format!("{}/v3/projects/{}/timeSeries", self.base_url, project_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        match &self.bearer {
            Some(bearer) => vec![("Authorization", bearer.as_str())],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> MetricsSource for MetricsApiClient<C> {
    async fn fetch_time_series(
        &self,
        project_id: &str,
        metric_id: &str,
        window: QueryWindow,
    ) -> Result<Vec<TimeSeries>, DomainError> {
        let url = self.list_url(project_id);
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("filter", format!("metric.type = \"{}\"", metric_id)),
                (
                    "interval.startTime",
                    window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "interval.endTime",
                    window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let json = self.client.get_json(&url, self.headers(), &query).await?;
            let page: ListTimeSeriesResponse = serde_json::from_value(json).map_err(|e| {
                DomainError::provider(
                    PROVIDER,
                    format!("Failed to parse time series response: {}", e),
                )
            })?;

            for wire in page.time_series {
                entries.push(wire.into_entry(metric_id)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(metric = metric_id, entries = entries.len(), "Fetched time series");
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<WireTimeSeries>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTimeSeries {
    #[serde(default)]
    resource: Option<WireLabels>,
    #[serde(default)]
    metric: Option<WireLabels>,
    #[serde(default)]
    points: Vec<WirePoint>,
}

#[derive(Debug, Default, Deserialize)]
struct WireLabels {
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    interval: WireInterval,
    value: WireValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInterval {
    start_time: String,
}

/// Sample value as the API encodes it: 64-bit integers arrive as JSON
/// strings to survive precision-blind clients, doubles as plain numbers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireValue {
    #[serde(default)]
    int64_value: Option<serde_json::Value>,
    #[serde(default)]
    double_value: Option<f64>,
}

impl WireTimeSeries {
    fn into_entry(self, metric_id: &str) -> Result<TimeSeries, DomainError> {
        let mut entry = TimeSeries::new();
        if let Some(resource) = self.resource {
            entry.resource_labels = resource.labels;
        }
        if let Some(metric) = self.metric {
            entry.metric_labels = metric.labels;
        }

        for point in self.points {
            let start = DateTime::parse_from_rfc3339(&point.interval.start_time)
                .map_err(|e| {
                    DomainError::provider(
                        PROVIDER,
                        format!(
                            "invalid interval start {:?} for {}: {}",
                            point.interval.start_time, metric_id, e
                        ),
                    )
                })?
                .timestamp();
            entry.points.push(Point::new(start, point.value.into_sample(metric_id)?));
        }

        Ok(entry)
    }
}

impl WireValue {
    fn into_sample(self, metric_id: &str) -> Result<SampleValue, DomainError> {
        if let Some(raw) = self.int64_value {
            let value = match &raw {
                serde_json::Value::String(text) => text.parse::<i64>().ok(),
                serde_json::Value::Number(number) => number.as_i64(),
                _ => None,
            }
            .ok_or_else(|| {
                DomainError::provider(
                    PROVIDER,
                    format!("unparsable int64 sample {:?} for {}", raw, metric_id),
                )
            })?;
            return Ok(SampleValue::Int(value));
        }

        if let Some(value) = self.double_value {
            return Ok(SampleValue::Float(value));
        }

        Err(DomainError::provider(
            PROVIDER,
            format!("sample for {} carries no value", metric_id),
        ))
    }
}
