//! Humidex GWL Viewer API Server
//!
//! Loads a GWL humidex NetCDF file once and serves selections over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use humidex_api::config::load_loader_config;
use humidex_api::state::AppState;

/// Humidex GWL Viewer API Server
#[derive(Parser, Debug)]
#[command(name = "humidex-api")]
#[command(about = "Serves humidex maxima by global warming level and year")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8085", env = "HUMIDEX_LISTEN_ADDR")]
    listen: String,

    /// Path to the GWL humidex NetCDF file
    #[arg(
        short,
        long,
        default_value = "all_gwl_humidex_max_with_dates.nc",
        env = "HUMIDEX_DATA_PATH"
    )]
    data_path: PathBuf,

    /// Optional YAML file overriding variable and dimension names
    #[arg(short, long, env = "HUMIDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "HUMIDEX_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting humidex API server");

    let loader_config = load_loader_config(args.config.as_deref())?;

    // Reading the whole file is blocking I/O
    let data_path = args.data_path.clone();
    let state = tokio::task::spawn_blocking(move || AppState::load(&data_path, &loader_config))
        .await
        .context("Dataset loading task panicked")??
        .with_prometheus(prometheus_handle);
    let state = Arc::new(state);

    let app = humidex_api::build_router(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!(address = %addr, "Humidex API listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
