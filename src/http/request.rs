//! Request handling shared by both services.
//!
//! # Responsibilities
//! - Reject methods other than POST
//! - Decode the `{"cep": ...}` body
//! - Apply the eight-digit CEP check
//! - Provide the request-ID header name used by the middleware stack

use axum::http::{HeaderName, Method};

use crate::domain::CepRequest;
use crate::http::response::PipelineError;

/// Header carrying the per-request correlation ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Check the method and decode the body. CEP syntax is not checked here, so
/// callers can annotate spans with the raw value before validating.
pub fn decode_cep_request(method: &Method, body: &[u8]) -> Result<CepRequest, PipelineError> {
    if method != Method::POST {
        return Err(PipelineError::InvalidMethod);
    }
    serde_json::from_slice(body).map_err(PipelineError::MalformedBody)
}

/// Reject a request whose CEP is not exactly eight digits.
pub fn ensure_valid(request: &CepRequest) -> Result<(), PipelineError> {
    if request.is_valid() {
        Ok(())
    } else {
        Err(PipelineError::InvalidZipcode)
    }
}
