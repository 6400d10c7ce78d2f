//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map pipeline errors to exactly one HTTP response each
//! - Mirror a resolver response (status, content type, streamed body) to the client
//!
//! # Design Decisions
//! - JSON envelope only for invalid and unknown zipcodes; plain text otherwise
//! - Mirrored bodies are streamed chunk by chunk, never buffered

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;
use thiserror::Error;

use crate::domain::ErrorResponse;
use crate::upstream::UpstreamError;

/// Every way a request through the pipeline can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Method not allowed")]
    InvalidMethod,

    #[error("Invalid request body")]
    MalformedBody(#[source] serde_json::Error),

    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    ZipcodeNotFound(#[source] UpstreamError),

    #[error("Service B unavailable")]
    ResolverUnavailable(#[source] reqwest::Error),

    #[error("Failed to fetch temperature")]
    TemperatureUnavailable(#[source] UpstreamError),
}

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            PipelineError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            PipelineError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::ZipcodeNotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::ResolverUnavailable(_) | PipelineError::TemperatureUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Classified failures carry the JSON envelope.
    fn is_classified(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidZipcode | PipelineError::ZipcodeNotFound(_)
        )
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if self.is_classified() {
            (status, Json(ErrorResponse::new(message))).into_response()
        } else {
            (status, message).into_response()
        }
    }
}

/// Relay an upstream response: same status, same `Content-Type`, body streamed.
pub fn mirror_upstream(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    let stream = upstream.bytes_stream().inspect_err(|e| {
        tracing::warn!(error = %e, "Upstream body stream interrupted");
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response
}
