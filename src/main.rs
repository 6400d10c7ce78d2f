use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_weather::config::load_config;
use cep_weather::lifecycle::{self, Role};
use cep_weather::observability::{logging, Telemetry};

#[derive(Parser)]
#[command(name = "cep-weather", version)]
#[command(about = "CEP to temperature pipeline: edge and resolver services")]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the edge service (POST /cep)
    Edge,
    /// Run the resolver service (POST /weather)
    Resolver,
}

impl From<Commands> for Role {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Edge => Role::Edge,
            Commands::Resolver => Role::Resolver,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = Role::from(cli.command);

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), role = ?role, "cep-weather starting");

    // Built before the runtime: the exporter's blocking client must not be
    // created or dropped inside an async context.
    let telemetry = Telemetry::init(&config.telemetry, &role.service_name(&config))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(lifecycle::run(role, config, telemetry.clone()));
    drop(runtime);

    telemetry.shutdown();
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
