//! Lode Gateway - Read-only gateway for serving stored content
//!
//! Serves primary-record content over HTTP, reconstructing segmented
//! payloads from their on-ledger segment records before responding.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use http::header::{ACCEPT, ORIGIN};
use http::Method;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use common::testkit::MemoryLedger;
use service::{Config, ServiceState};

/// Lode Gateway - Read-only gateway for serving stored content
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Chunk size in bytes used by the segmentation protocol
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    tracing::info!("Starting Lode Gateway");

    // Create configuration
    let config = Config {
        listen_addr: Some(SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?),
        chunk_size: args.chunk_size,
        log_level,
        ..Config::default()
    };
    let listen_addr = config
        .listen_addr
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

    // TODO: wire the RPC ledger client once the indexer endpoint is stable;
    //  until then the gateway serves from an in-process ledger
    let ledger = Arc::new(MemoryLedger::new());

    // Create state
    let state = match ServiceState::from_config(&config, ledger) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    // Build gateway router
    let router = build_gateway_router(state);

    tracing::info!("Gateway listening on {}", listen_addr);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    let mut server_rx = shutdown_rx.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = server_rx.changed().await;
        })
        .await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}

/// Build the gateway router with content and health routes
fn build_gateway_router(state: ServiceState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET])
        .allow_headers(vec![ACCEPT, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    let trace_layer = TraceLayer::new_for_http();

    Router::new()
        // Content route for serving primary-record payloads
        .route("/content/:id", get(service::http::content::handler))
        // Health check routes
        .nest("/_status", service::http::health::router(state.clone()))
        .with_state(state)
        .layer(cors_layer)
        .layer(trace_layer)
}
