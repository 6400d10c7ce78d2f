//! Distributed tracing runtime.
//!
//! # Responsibilities
//! - Build one tracer provider per process, batching spans to a Zipkin collector
//! - Extract W3C TraceContext and Baggage from inbound headers
//! - Inject the active context into every outbound request
//! - Hand out span guards that end their span on every exit path
//! - Flush pending spans on shutdown
//!
//! # Design Decisions
//! - `Telemetry` is passed to handlers through state rather than read from
//!   the OpenTelemetry globals, so tests can run isolated providers side by side
//! - Context travels as an explicit `opentelemetry::Context` value
//! - Exporter errors surface through the SDK's internal logging, never to callers

use std::error::Error as StdError;
use std::sync::Arc;

use axum::http::HeaderMap;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry::trace::{Status, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::TelemetryConfig;

/// Instrumentation scope name attached to every span this crate creates.
const INSTRUMENTATION_SCOPE: &str = env!("CARGO_PKG_NAME");

/// Errors raised while building the tracing pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to create Zipkin exporter: {0}")]
    Exporter(String),
}

/// Process-wide tracing handle. Cheap to clone.
#[derive(Clone)]
pub struct Telemetry {
    provider: SdkTracerProvider,
    propagator: Arc<TextMapCompositePropagator>,
}

impl Telemetry {
    /// Build the provider for `service_name` from configuration.
    ///
    /// Must be called outside the async runtime: the Zipkin exporter owns a
    /// blocking HTTP client that runs on the batch processor's own thread.
    pub fn init(config: &TelemetryConfig, service_name: &str) -> Result<Self, TelemetryError> {
        let resource = Resource::builder()
            .with_service_name(service_name.to_string())
            .build();

        let builder = SdkTracerProvider::builder().with_resource(resource);
        let provider = if config.enabled {
            let exporter = opentelemetry_zipkin::ZipkinExporter::builder()
                .with_collector_endpoint(config.collector_endpoint.clone())
                .build()
                .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
            builder.with_batch_exporter(exporter).build()
        } else {
            builder.build()
        };

        tracing::info!(
            service = service_name,
            export_enabled = config.enabled,
            collector = %config.collector_endpoint,
            "Tracer provider initialized"
        );

        Ok(Self::with_provider(provider))
    }

    /// Wrap an already-built provider.
    pub fn with_provider(provider: SdkTracerProvider) -> Self {
        let propagator = TextMapCompositePropagator::new(vec![
            Box::new(TraceContextPropagator::new()),
            Box::new(BaggagePropagator::new()),
        ]);
        Self {
            provider,
            propagator: Arc::new(propagator),
        }
    }

    /// Start a span named `name` as a child of `parent`.
    pub fn start_span(&self, parent: &Context, name: &'static str) -> SpanGuard {
        let tracer = self.provider.tracer(INSTRUMENTATION_SCOPE);
        let span = tracer.start_with_context(name, parent);
        SpanGuard {
            cx: parent.with_span(span),
        }
    }

    /// Read propagation headers. Missing or malformed headers give an empty
    /// context, so the next span becomes a root.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Write propagation headers for `cx` into an outbound carrier.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Flush pending spans and stop the exporter.
    pub fn shutdown(&self) {
        match self.provider.shutdown() {
            Ok(()) => tracing::info!("Tracer provider shut down"),
            Err(e) => tracing::warn!(error = %e, "Tracer provider shutdown failed"),
        }
    }
}

/// Owns a started span and ends it when dropped.
pub struct SpanGuard {
    cx: Context,
}

impl SpanGuard {
    /// Context carrying this span; parent for child spans and outbound calls.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn set_attribute(&self, attribute: KeyValue) {
        self.cx.span().set_attribute(attribute);
    }

    /// Record `err` as an exception event and mark the span as failed.
    pub fn record_failure(&self, err: &(dyn StdError + 'static)) {
        let span = self.cx.span();
        span.record_error(err);
        span.set_status(Status::error(error_chain(err)));
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
