//! Shared outbound HTTP client.

use std::time::Duration;

use opentelemetry::Context;
use reqwest::{Client, RequestBuilder, Response};

use crate::observability::Telemetry;

/// Build a client whose `timeout` bounds each call from connect to last body byte.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Finish `request`, inject the propagation headers for `cx`, and send it.
pub async fn send_traced(
    client: &Client,
    telemetry: &Telemetry,
    cx: &Context,
    request: RequestBuilder,
) -> reqwest::Result<Response> {
    let mut request = request.build()?;
    telemetry.inject(cx, request.headers_mut());
    client.execute(request).await
}
