use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use promptlens_core::config::discover_config;
use promptlens_core::LazyDataset;
use promptlens_server::config;
use promptlens_server::methods::MethodContext;
use promptlens_server::server::Server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset config (defaults to ./promptlens.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::ServerConfig::from_env();

    init_logging(&cfg.log_level);

    let mut dataset_cfg = discover_config(args.config.as_deref(), false)?;
    if let Some(dir) = args.data_dir {
        dataset_cfg.data_dir = dir;
    }

    tracing::info!(
        event = "server_start",
        data_dir = ?dataset_cfg.data_dir,
        config = ?cfg
    );

    // load eagerly: a missing table must stop startup, not the first request
    let lazy = LazyDataset::new(dataset_cfg.clone());
    let dataset = tokio::task::spawn_blocking(move || lazy.get())
        .await?
        .context("failed to load dataset")?;

    Server::run(MethodContext::new(dataset, dataset_cfg, cfg)).await
}
