//! iviewer-routes
//!
//! Serves and inspects the OMERO.iviewer route table.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http::server ──▶ routing::router ──▶ ViewHandler
//!                       (request id,     (mount prefix,      (opaque view,
//!                        timeout,         first match         echo by default)
//!                        trace)           wins)
//!
//!     Unmatched path ──▶ 404
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use iviewer_routes::config::{load_config, ServerConfig};
use iviewer_routes::http::HttpServer;
use iviewer_routes::lifecycle::{wait_for_signal, Shutdown};
use iviewer_routes::observability::{logging, metrics};
use iviewer_routes::routing::iviewer_routes;

#[derive(Parser)]
#[command(name = "iviewer-routes")]
#[command(about = "Serve and inspect the OMERO.iviewer route table", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP dispatcher
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// List routes in match order
    Routes,
    /// Resolve a request path and print the match as JSON
    Resolve { path: String },
    /// Build the URL of a named route
    Reverse {
        name: String,
        /// Parameters as KEY=VALUE
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    match cli.command {
        Commands::Serve { bind } => serve(config, bind).await?,
        Commands::Routes => {
            let table = iviewer_routes(&config.routing.mount_prefix)?;
            for route in table.routes() {
                println!(
                    "{:<36} {:<20} {}",
                    route.name(),
                    route.handler().as_str(),
                    route.pattern().source()
                );
            }
        }
        Commands::Resolve { path } => {
            let table = iviewer_routes(&config.routing.mount_prefix)?;
            match table.resolve(&path) {
                Some(matched) => println!("{}", serde_json::to_string_pretty(&matched)?),
                None => {
                    eprintln!("No route matches '{}'", path);
                    std::process::exit(1);
                }
            }
        }
        Commands::Reverse { name, params } => {
            let table = iviewer_routes(&config.routing.mount_prefix)?;
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            println!("{}", table.reverse(&name, &params)?);
        }
    }

    Ok(())
}

async fn serve(mut config: ServerConfig, bind: Option<SocketAddr>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bind) = bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init_logging(&config.observability);
    tracing::info!("iviewer-routes v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.routing.mount_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    // Compile routes before binding so a bad table never takes traffic.
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signals = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                tracing::info!(signal, "Stop requested");
                signals.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for signals"),
        }
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
