//! Resolver service (B): `POST /weather`.
//!
//! CEP → city (directory) → Celsius (weather provider) → three scales.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use opentelemetry::KeyValue;

use crate::domain::{Temperatures, WeatherResponse};
use crate::http::request::{decode_cep_request, ensure_valid};
use crate::http::response::PipelineError;
use crate::observability::{metrics, SpanGuard, Telemetry};
use crate::upstream::{DirectoryClient, WeatherClient};

pub const SERVICE_LABEL: &str = "resolver";

const SPAN_NAME: &str = "handleWeather";

/// State injected into the resolver handler.
#[derive(Clone)]
pub struct ResolverState {
    pub telemetry: Telemetry,
    pub directory: DirectoryClient,
    pub weather: WeatherClient,
}

pub async fn handle_weather(
    State(state): State<ResolverState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let parent = state.telemetry.extract(&headers);
    let span = state.telemetry.start_span(&parent, SPAN_NAME);

    let response = match resolve(&state, &span, &method, &body).await {
        Ok(weather) => {
            tracing::info!(city = %weather.city, temp_c = weather.temp_c, "Weather resolved");
            (StatusCode::OK, Json(weather)).into_response()
        }
        Err(err) => {
            span.record_failure(&err);
            tracing::info!(status = %err.status(), error = %err, "Request failed");
            err.into_response()
        }
    };

    let status = response.status().as_u16();
    span.set_attribute(KeyValue::new("http.response.status_code", i64::from(status)));
    metrics::record_request(SERVICE_LABEL, status, start_time);
    response
}

async fn resolve(
    state: &ResolverState,
    span: &SpanGuard,
    method: &Method,
    body: &[u8],
) -> Result<WeatherResponse, PipelineError> {
    let request = decode_cep_request(method, body)?;
    span.set_attribute(KeyValue::new("cep", request.cep.clone()));
    ensure_valid(&request)?;

    let city = state
        .directory
        .fetch_city(span.context(), &request.cep)
        .await
        .map_err(PipelineError::ZipcodeNotFound)?;

    let temp_c = state
        .weather
        .fetch_temperature(span.context(), &city)
        .await
        .map_err(PipelineError::TemperatureUnavailable)?;

    Ok(WeatherResponse::new(city, Temperatures::from_celsius(temp_c)))
}
