//! Postal-code directory lookups (ViaCEP-compatible).

use axum::http::StatusCode;
use opentelemetry::{Context, KeyValue};
use reqwest::Client;
use serde::Deserialize;

use crate::observability::{metrics, Telemetry};
use crate::upstream::{send_traced, UpstreamError};

pub const UPSTREAM_NAME: &str = "directory";

const SPAN_NAME: &str = "fetchCityFromCEP";

/// Subset of the directory payload the pipeline needs.
#[derive(Debug, Deserialize)]
struct DirectoryResult {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    erro: bool,
}

/// Resolves a CEP to its city name.
#[derive(Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
    telemetry: Telemetry,
}

impl DirectoryClient {
    pub fn new(http: Client, base_url: impl Into<String>, telemetry: Telemetry) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            telemetry,
        }
    }

    /// URL of the JSON lookup for `cep`.
    pub fn lookup_url(&self, cep: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url.trim_end_matches('/'), cep)
    }

    /// Look up `cep` under a `fetchCityFromCEP` span parented to `parent`.
    pub async fn fetch_city(&self, parent: &Context, cep: &str) -> Result<String, UpstreamError> {
        let span = self.telemetry.start_span(parent, SPAN_NAME);

        match self.lookup(span.context(), cep).await {
            Ok(city) => {
                span.set_attribute(KeyValue::new("city", city.clone()));
                tracing::debug!(cep = %cep, city = %city, "CEP resolved");
                Ok(city)
            }
            Err(err) => {
                span.record_failure(&err);
                metrics::record_upstream_error(err.upstream());
                tracing::warn!(cep = %cep, error = %err, "CEP lookup failed");
                Err(err)
            }
        }
    }

    async fn lookup(&self, cx: &Context, cep: &str) -> Result<String, UpstreamError> {
        let request = self.http.get(self.lookup_url(cep));
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

        let result: DirectoryResult =
            response
                .json()
                .await
                .map_err(|source| UpstreamError::Decode {
                    upstream: UPSTREAM_NAME,
                    source,
                })?;

        if result.erro {
            return Err(UpstreamError::NotFound);
        }

        Ok(result.localidade)
    }
}
