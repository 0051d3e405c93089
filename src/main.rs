//! QuickCreate web backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ diagnostics ─▶ default document ─▶ static files
//!                                                          │ miss
//!                                                          ▼
//!                    auth gate ◀─ route table ◀──── cookie auth
//!                        │            │ match
//!                        ▼            ▼
//!                     mounts      handler (sign-in, user note)
//!                        │            │
//!                        ▼            ▼
//!                   /foo app     note service
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use quickcreate_web::config::resolve_config;
use quickcreate_web::notes::HttpNoteService;
use quickcreate_web::observability::{logging, metrics};
use quickcreate_web::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "quickcreate-web", version, about = "QuickCreate single-page site backend")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = resolve_config(args.config.as_deref(), args.bind)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("quickcreate-web v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.site.environment,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let notes = HttpNoteService::new(&config.note_service)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, Arc::new(notes))?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
