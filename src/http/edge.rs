//! Edge service (A): `POST /cep`.
//!
//! Validates the CEP locally and forwards valid requests to the resolver,
//! relaying whatever the resolver answers.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use opentelemetry::{Context, KeyValue};
use reqwest::Client;

use crate::http::request::{decode_cep_request, ensure_valid};
use crate::http::response::{mirror_upstream, PipelineError};
use crate::observability::{metrics, Telemetry};
use crate::upstream::send_traced;

pub const SERVICE_LABEL: &str = "edge";

const SPAN_NAME: &str = "handleCEP";

/// State injected into the edge handler.
#[derive(Clone)]
pub struct EdgeState {
    pub telemetry: Telemetry,
    pub client: Client,
    /// Full URL of the resolver's `/weather` endpoint.
    pub weather_endpoint: String,
}

pub async fn handle_cep(
    State(state): State<EdgeState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let parent = state.telemetry.extract(&headers);
    let span = state.telemetry.start_span(&parent, SPAN_NAME);

    let response = match forward(&state, span.context(), &method, &body).await {
        Ok(response) => {
            tracing::debug!(status = %response.status(), "Resolver response relayed");
            response
        }
        Err(err) => {
            span.record_failure(&err);
            tracing::info!(status = %err.status(), error = %err, "Request rejected");
            err.into_response()
        }
    };

    let status = response.status().as_u16();
    span.set_attribute(KeyValue::new("http.response.status_code", i64::from(status)));
    metrics::record_request(SERVICE_LABEL, status, start_time);
    response
}

async fn forward(
    state: &EdgeState,
    cx: &Context,
    method: &Method,
    body: &[u8],
) -> Result<Response, PipelineError> {
    let request = decode_cep_request(method, body)?;
    ensure_valid(&request)?;

    let outbound = state.client.post(&state.weather_endpoint).json(&request);
    let upstream = send_traced(&state.client, &state.telemetry, cx, outbound)
        .await
        .map_err(|e| {
            tracing::error!(endpoint = %state.weather_endpoint, error = %e, "Resolver unreachable");
            PipelineError::ResolverUnavailable(e)
        })?;

    Ok(mirror_upstream(upstream))
}
