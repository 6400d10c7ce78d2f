//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the edge (`/cep`) or resolver (`/weather`) role
//! - Wire up middleware (access logs, request ID, inbound deadline)
//! - Build the shared outbound client and upstream clients
//! - Serve until the shutdown signal fires, then drain

use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::edge::{handle_cep, EdgeState};
use crate::http::request::X_REQUEST_ID;
use crate::http::resolver::{handle_weather, ResolverState};
use crate::observability::Telemetry;
use crate::upstream::{build_client, DirectoryClient, WeatherClient};

/// HTTP server for one pipeline role.
pub struct HttpServer {
    router: Router,
    role: &'static str,
}

impl HttpServer {
    /// Edge service: validates and forwards to the resolver.
    pub fn edge(config: &ServiceConfig, telemetry: Telemetry) -> reqwest::Result<Self> {
        let client = build_client(Duration::from_secs(config.timeouts.outbound_secs))?;
        let state = EdgeState {
            telemetry,
            client,
            weather_endpoint: config.edge.weather_endpoint(),
        };

        let routes = Router::new()
            .route("/cep", any(handle_cep))
            .route("/health", get(health))
            .with_state(state);

        Ok(Self {
            router: Self::with_middleware(routes, config),
            role: "edge",
        })
    }

    /// Resolver service: CEP → city → temperature.
    pub fn resolver(config: &ServiceConfig, telemetry: Telemetry) -> reqwest::Result<Self> {
        let client = build_client(Duration::from_secs(config.timeouts.outbound_secs))?;
        let state = ResolverState {
            directory: DirectoryClient::new(
                client.clone(),
                config.upstream.directory_url.clone(),
                telemetry.clone(),
            ),
            weather: WeatherClient::new(
                client,
                config.upstream.weather_url.clone(),
                config.upstream.weather_api_key.clone(),
                telemetry.clone(),
            ),
            telemetry,
        };

        let routes = Router::new()
            .route("/weather", any(handle_weather))
            .route("/health", get(health))
            .with_state(state);

        Ok(Self {
            router: Self::with_middleware(routes, config),
            role: "resolver",
        })
    }

    fn with_middleware(routes: Router, config: &ServiceConfig) -> Router {
        routes.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.timeouts.inbound_secs),
                )),
        )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(role = self.role, address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining");
            })
            .await?;

        tracing::info!(role = self.role, "HTTP server stopped");
        Ok(())
    }

    /// Router with all middleware applied, for in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn health() -> &'static str {
    "ok"
}
