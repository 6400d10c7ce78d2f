//! End-to-end scenarios: client → edge → resolver → mock directory / weather.

use std::net::SocketAddr;

use cep_weather::{HttpServer, Shutdown};
use opentelemetry::trace::{Status, TraceId};
use opentelemetry_sdk::trace::InMemorySpanExporter;
use serde_json::{json, Value};

mod common;

use common::{MockReply, MockUpstream};

const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

struct Pipeline {
    edge: SocketAddr,
    exporter: InMemorySpanExporter,
    shutdown: Vec<Shutdown>,
}

impl Pipeline {
    async fn start(directory: &MockUpstream, weather: &MockUpstream) -> Self {
        let (resolver_telemetry, exporter) = common::in_memory_telemetry();
        let edge_telemetry = common::telemetry_for(&exporter);

        let resolver_config = common::test_config(Some(directory), Some(weather), None);
        let (resolver, resolver_shutdown) = common::spawn_server(
            HttpServer::resolver(&resolver_config, resolver_telemetry).unwrap(),
        )
        .await;

        let edge_config = common::test_config(None, None, Some(resolver));
        let (edge, edge_shutdown) =
            common::spawn_server(HttpServer::edge(&edge_config, edge_telemetry).unwrap()).await;

        Self {
            edge,
            exporter,
            shutdown: vec![edge_shutdown, resolver_shutdown],
        }
    }

    fn cep_url(&self) -> String {
        format!("http://{}/cep", self.edge)
    }

    async fn post(&self, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.cep_url())
            .json(&body)
            .send()
            .await
            .expect("edge unreachable")
    }

    fn stop(&self) {
        for s in &self.shutdown {
            s.trigger();
        }
    }
}

async fn sao_paulo_mocks() -> (MockUpstream, MockUpstream) {
    let directory = common::start_mock_backend(MockReply::json(
        200,
        r#"{"cep":"01310-100","localidade":"São Paulo","erro":false}"#,
    ))
    .await;
    let weather =
        common::start_mock_backend(MockReply::json(200, r#"{"current":{"temp_c":25.0}}"#)).await;
    (directory, weather)
}

fn content_type(res: &reqwest::Response) -> String {
    res.headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

#[tokio::test]
async fn s1_valid_cep_returns_all_scales() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "01310100"})).await;

    assert_eq!(res.status(), 200);
    assert_eq!(content_type(&res), "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"city": "São Paulo", "temp_C": 25.0, "temp_F": 77.0, "temp_K": 298.0})
    );
    assert_eq!(directory.request_count(), 1);
    assert_eq!(weather.request_count(), 1);

    pipeline.stop();
}

#[tokio::test]
async fn s2_short_cep_is_rejected_at_the_edge() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "1234"})).await;

    assert_eq!(res.status(), 422);
    assert_eq!(res.text().await.unwrap(), r#"{"message":"invalid zipcode"}"#);
    assert_eq!(directory.request_count(), 0);

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    assert!(common::spans_named(&spans, "handleWeather").is_empty());
    let edge_spans = common::spans_named(&spans, "handleCEP");
    assert_eq!(edge_spans.len(), 1);
    assert_eq!(edge_spans[0].status, Status::error("invalid zipcode"));

    pipeline.stop();
}

#[tokio::test]
async fn s3_non_digit_cep_is_rejected() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "abcdefgh"})).await;

    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"message": "invalid zipcode"}));
    assert_eq!(directory.request_count(), 0);
    assert_eq!(weather.request_count(), 0);

    pipeline.stop();
}

#[tokio::test]
async fn s4_unknown_cep_is_forwarded_as_404() {
    let directory = common::start_mock_backend(MockReply::json(200, r#"{"erro":true}"#)).await;
    let weather =
        common::start_mock_backend(MockReply::json(200, r#"{"current":{"temp_c":25.0}}"#)).await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "99999999"})).await;

    assert_eq!(res.status(), 404);
    assert_eq!(content_type(&res), "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"message": "can not find zipcode"}));
    assert_eq!(weather.request_count(), 0);

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    let lookup = common::spans_named(&spans, "fetchCityFromCEP");
    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup[0].status, Status::error("CEP not found"));
    assert!(common::spans_named(&spans, "fetchTemperature").is_empty());

    pipeline.stop();
}

#[tokio::test]
async fn s5_weather_failure_is_plain_500() {
    let directory = common::start_mock_backend(MockReply::json(
        200,
        r#"{"localidade":"São Paulo","erro":false}"#,
    ))
    .await;
    let weather = common::start_mock_backend(MockReply::text(500, "upstream exploded")).await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "01310100"})).await;

    assert_eq!(res.status(), 500);
    assert!(content_type(&res).starts_with("text/plain"));
    assert_eq!(res.text().await.unwrap(), "Failed to fetch temperature");

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    let fetch = common::spans_named(&spans, "fetchTemperature");
    assert_eq!(fetch.len(), 1);
    assert_eq!(
        fetch[0].status,
        Status::error("weather returned status 500 Internal Server Error")
    );
    let handler = common::spans_named(&spans, "handleWeather");
    assert!(matches!(handler[0].status, Status::Error { .. }));

    pipeline.stop();
}

#[tokio::test]
async fn s6_get_is_method_not_allowed() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = reqwest::get(pipeline.cep_url()).await.unwrap();

    assert_eq!(res.status(), 405);
    assert!(content_type(&res).starts_with("text/plain"));
    assert_eq!(res.text().await.unwrap(), "Method not allowed");

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    assert_eq!(common::spans_named(&spans, "handleCEP").len(), 1);

    pipeline.stop();
}

#[tokio::test]
async fn null_cep_is_invalid_zipcode() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": null})).await;

    assert_eq!(res.status(), 422);
    assert_eq!(res.text().await.unwrap(), r#"{"message":"invalid zipcode"}"#);
    assert_eq!(directory.request_count(), 0);

    pipeline.stop();
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = reqwest::Client::new()
        .post(pipeline.cep_url())
        .header("content-type", "application/json")
        .body("{\"cep\":")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Invalid request body");

    pipeline.stop();
}

#[tokio::test]
async fn incoming_trace_reaches_every_hop() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = reqwest::Client::new()
        .post(pipeline.cep_url())
        .header("traceparent", TRACEPARENT)
        .header("baggage", "tenant=acme")
        .json(&json!({"cep": "01310100"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    let trace_id = TraceId::from_hex(TRACE_ID).unwrap();
    assert!(spans.iter().all(|s| s.span_context.trace_id() == trace_id));

    let edge = common::spans_named(&spans, "handleCEP");
    let handler = common::spans_named(&spans, "handleWeather");
    let lookup = common::spans_named(&spans, "fetchCityFromCEP");
    let fetch = common::spans_named(&spans, "fetchTemperature");
    assert_eq!((edge.len(), handler.len(), lookup.len(), fetch.len()), (1, 1, 1, 1));

    // Client → edge → resolver → {directory, weather}
    assert_eq!(edge[0].parent_span_id.to_string(), "00f067aa0ba902b7");
    assert_eq!(handler[0].parent_span_id, edge[0].span_context.span_id());
    assert_eq!(lookup[0].parent_span_id, handler[0].span_context.span_id());
    assert_eq!(fetch[0].parent_span_id, handler[0].span_context.span_id());
    assert!(lookup[0].end_time <= fetch[0].start_time);

    // Outbound third-party calls carry the child span as parent.
    let directory_head = &directory.requests()[0];
    assert!(directory_head.contains(&format!(
        "traceparent: 00-{}-{}-01",
        TRACE_ID,
        lookup[0].span_context.span_id()
    )));
    assert!(directory_head.contains("baggage: tenant=acme"));

    let weather_head = &weather.requests()[0];
    assert!(weather_head.contains(&format!(
        "traceparent: 00-{}-{}-01",
        TRACE_ID,
        fetch[0].span_context.span_id()
    )));

    pipeline.stop();
}

#[tokio::test]
async fn request_without_trace_starts_a_new_root() {
    let (directory, weather) = sao_paulo_mocks().await;
    let pipeline = Pipeline::start(&directory, &weather).await;

    let res = pipeline.post(json!({"cep": "01310100"})).await;
    assert_eq!(res.status(), 200);

    let spans = pipeline.exporter.get_finished_spans().unwrap();
    let edge = common::spans_named(&spans, "handleCEP");
    assert_eq!(edge.len(), 1);
    assert_eq!(edge[0].parent_span_id, opentelemetry::trace::SpanId::INVALID);
    let trace_id = edge[0].span_context.trace_id();
    assert!(spans.iter().all(|s| s.span_context.trace_id() == trace_id));

    pipeline.stop();
}
