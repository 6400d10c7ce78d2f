//! Current-temperature lookups (WeatherAPI-compatible).

use axum::http::StatusCode;
use opentelemetry::{Context, KeyValue};
use reqwest::Client;
use serde::Deserialize;

use crate::observability::{metrics, Telemetry};
use crate::upstream::{send_traced, UpstreamError};

pub const UPSTREAM_NAME: &str = "weather";

const SPAN_NAME: &str = "fetchTemperature";

#[derive(Debug, Deserialize)]
struct WeatherSample {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
}

/// Fetches the current Celsius temperature for a city.
#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
    telemetry: Telemetry,
}

impl WeatherClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            telemetry,
        }
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the temperature under a `fetchTemperature` span parented to `parent`.
    pub async fn fetch_temperature(
        &self,
        parent: &Context,
        city: &str,
    ) -> Result<f64, UpstreamError> {
        let span = self.telemetry.start_span(parent, SPAN_NAME);

        match self.current(span.context(), city).await {
            Ok(temp_c) => {
                span.set_attribute(KeyValue::new("tempC", temp_c));
                tracing::debug!(city = %city, temp_c, "Temperature fetched");
                Ok(temp_c)
            }
            Err(err) => {
                span.record_failure(&err);
                metrics::record_upstream_error(err.upstream());
                tracing::warn!(city = %city, error = %err, "Temperature fetch failed");
                Err(err)
            }
        }
    }

    async fn current(&self, cx: &Context, city: &str) -> Result<f64, UpstreamError> {
        // `query` percent-encodes, so "São Paulo" travels as "S%C3%A3o+Paulo".
        let request = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", city)]);

        let response = send_traced(&self.http, &self.telemetry, cx, request)
            .await
            .map_err(|source| UpstreamError::Transport {
                upstream: UPSTREAM_NAME,
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status {
                upstream: UPSTREAM_NAME,
                status,
            });
        }

        let sample: WeatherSample =
            response
                .json()
                .await
                .map_err(|source| UpstreamError::Decode {
                    upstream: UPSTREAM_NAME,
                    source,
                })?;

        Ok(sample.current.temp_c)
    }
}
