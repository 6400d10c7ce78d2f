//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the role's bind address and service name
//! - Start the metrics endpoint when enabled
//! - Build the role's server and bind its listener
//! - Serve until a termination signal arrives
//!
//! Telemetry is built by the caller before the runtime starts and shut down
//! after this returns, so spans recorded during draining are still flushed.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, Telemetry};

/// Which half of the pipeline this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Edge,
    Resolver,
}

impl Role {
    /// Service name reported on spans when the config does not override it.
    pub fn default_service_name(&self) -> &'static str {
        match self {
            Role::Edge => "service-a",
            Role::Resolver => "service-b",
        }
    }

    pub fn service_name(&self, config: &ServiceConfig) -> String {
        config
            .telemetry
            .service_name
            .clone()
            .unwrap_or_else(|| self.default_service_name().to_string())
    }

    pub fn bind_address<'a>(&self, config: &'a ServiceConfig) -> &'a str {
        match self {
            Role::Edge => &config.edge.bind_address,
            Role::Resolver => &config.resolver.bind_address,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Run `role` until SIGINT/SIGTERM.
pub async fn run(role: Role, config: ServiceConfig, telemetry: Telemetry) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = match role {
        Role::Edge => {
            tracing::info!(resolver = %config.edge.weather_endpoint(), "Forwarding to resolver");
            HttpServer::edge(&config, telemetry)?
        }
        Role::Resolver => {
            if config.uses_placeholder_api_key() {
                tracing::warn!(
                    "WEATHER_API_KEY is not set; weather lookups will use a placeholder key and fail upstream"
                );
            }
            HttpServer::resolver(&config, telemetry)?
        }
    };

    let listener = TcpListener::bind(role.bind_address(&config)).await?;
    tracing::info!(
        service = %role.service_name(&config),
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_task = shutdown.trigger_on_signal();

    let result = server.run(listener, server_shutdown).await;
    signal_task.abort();
    result?;

    Ok(())
}
