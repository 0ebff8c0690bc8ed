//! postventa server - Gantt timeline service
//!
//! Fetches the published requirement sheet, keeps an in-memory dataset
//! refreshed on a timer, and serves chart descriptions over HTTP.

use anyhow::Result;
use clap::Parser;
use postventa_loader::SheetLoader;
use postventa_server::refresh::RefreshController;
use postventa_server::routes;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "postventa")]
#[command(author, version, about = "Gantt timeline service for postventa requirements", long_about = None)]
struct Cli {
    /// Port to bind on all interfaces
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Published sheet CSV export URL
    #[arg(long, env = "SHEET_URL", default_value = postventa_loader::SHEET_URL)]
    sheet_url: String,

    /// Seconds between automatic refreshes
    #[arg(long, default_value_t = 60)]
    refresh_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let loader = SheetLoader::new(&cli.sheet_url)?;
    let controller = Arc::new(RefreshController::new(Arc::new(loader)));

    let initial = controller.refresh().await;
    tracing::info!(succeeded = initial.succeeded, "initial load done");

    let ticker = Arc::clone(&controller);
    let period = Duration::from_secs(cli.refresh_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // the first tick completes immediately; the initial load covered it
        interval.tick().await;
        loop {
            interval.tick().await;
            let summary = ticker.refresh().await;
            tracing::debug!(succeeded = summary.succeeded, "periodic refresh");
        }
    });

    let app = routes::router(controller);
    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    tracing::info!(port = cli.port, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
