use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{error::FetchError, model::WeatherResult};

use super::{FetchOutcome, WeatherProvider};

/// Visual Crossing timeline endpoint; the city is appended as a path segment.
pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: Url,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid weather service URL: {base_url}"))?;

        if base_url.cannot_be_a_base() {
            bail!("Weather service URL cannot take a path: {base_url}");
        }

        Ok(Self {
            api_key,
            base_url,
            http: Client::new(),
        })
    }

    /// Timeline URL for `city`, without query parameters.
    ///
    /// The city becomes exactly one percent-encoded path segment.
    pub fn request_url(&self, city: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(city);
        }
        url
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcTimelineResponse {
    resolved_address: String,
    current_conditions: VcCurrentConditions,
}

#[derive(Debug, Deserialize)]
struct VcCurrentConditions {
    temp: f64,
    humidity: f64,
    conditions: String,
    icon: String,
    windspeed: f64,
    #[serde(rename = "datetimeEpoch", default)]
    datetime_epoch: Option<i64>,
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn current_conditions(&self, city: &str) -> FetchOutcome {
        let url = self.request_url(city);
        tracing::debug!(city, path = url.path(), "requesting current conditions");

        let res = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", "metric"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        if let Some(err) = FetchError::from_status(status) {
            tracing::debug!(city, %status, kind = %err.kind(), "weather request rejected");
            return Err(err);
        }

        let body = res.text().await.map_err(FetchError::from_transport)?;

        decode_timeline(&body)
    }
}

fn decode_timeline(body: &str) -> FetchOutcome {
    let parsed: VcTimelineResponse = serde_json::from_str(body).map_err(|source| {
        tracing::debug!(error = %source, body = %truncate_body(body), "unexpected response shape");
        FetchError::Malformed { source }
    })?;

    let current = parsed.current_conditions;

    Ok(WeatherResult {
        location: parsed.resolved_address,
        temperature_c: current.temp,
        humidity_pct: current.humidity,
        conditions: current.conditions,
        icon: current.icon,
        wind_speed_kph: current.windspeed,
        observed_at: current.datetime_epoch.and_then(unix_to_utc),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
