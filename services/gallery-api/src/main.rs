//! Gallery API service.
//!
//! Serves resolved portfolio projects, team members and the hero image from
//! an S3-compatible bucket, plus a small admin surface for file management.

use anyhow::{Context, Result};
use clap::Parser;
use std::{net::SocketAddr, process::ExitCode, sync::Arc};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use gallery_api::{build_router, config::Args, state::AppState};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let storage_config = match args.validated_storage_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        endpoint = %storage_config.endpoint,
        bucket = %storage_config.bucket,
        url_mode = ?storage_config.url_mode,
        "Starting gallery API server"
    );

    let state = Arc::new(AppState::new(&args, &storage_config).await?);
    let app = build_router(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(ExitCode::SUCCESS)
}
