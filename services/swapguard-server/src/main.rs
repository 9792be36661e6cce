//! SwapGuard Server
//!
//! Serves the escrow transaction engine over HTTP for the marketplace UI.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! swapguard-server
//!
//! # Start with environment overrides
//! SWAPGUARD_PORT=9090 SWAPGUARD_LOG_FORMAT=json swapguard-server
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swapguard_api::{create_router, AppState};
use swapguard_engine::{EngineConfig, EscrowService};
use swapguard_types::EscrowStatus;

// =============================================================================
// CLI Arguments
// =============================================================================

/// SwapGuard escrow server
#[derive(Parser, Debug)]
#[command(name = "swapguard-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "SWAPGUARD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SWAPGUARD_PORT", default_value_t = 8080)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SWAPGUARD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "SWAPGUARD_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Also allow cancelling a funded-but-unshipped escrow
    #[arg(long, env = "SWAPGUARD_CANCEL_FUNDED")]
    cancel_funded: bool,

    /// Per-escrow lock wait in milliseconds before contention is reported
    #[arg(long, env = "SWAPGUARD_LOCK_WAIT_MS", default_value_t = 2000)]
    lock_wait_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args);

    let mut config = EngineConfig::default();
    config.lock_wait = Duration::from_millis(args.lock_wait_ms);
    if args.cancel_funded {
        config.cancellation_sources =
            vec![EscrowStatus::PendingPayment, EscrowStatus::Funded];
    }

    let service = Arc::new(EscrowService::new(config));
    let state = AppState::new(service);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "swapguard server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("swapguard server stopped");
    Ok(())
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("ctrl_c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
