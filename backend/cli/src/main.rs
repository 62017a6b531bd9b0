mod collaborators;
mod match_cmd;
mod status_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pillscan_config::{config_dir, config_file_path, load_and_prepare, log_report, PillScanConfig};
use pillscan_core::{Catalog, MatchPolicy, ScanPipeline};
use pillscan_gateway::{start_server, GatewayState, RouterOptions};

#[derive(Parser)]
#[command(name = "pillscan")]
#[command(about = "PillScan: identify medicines from label photos")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.pillscan/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the label-scanning HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Match label text against the catalog without OCR
    Match {
        /// Text as it would come back from OCR
        text: String,
        /// Drug name to search with instead of the text
        #[arg(long)]
        hint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let (config, report) = load_and_prepare(&path).await?;

    let log_config = config.logging.clone().unwrap_or_default();
    logging::init_logger(
        log_config.dir.as_deref(),
        &config.log_level(),
        log_config.json.unwrap_or(false),
    );
    log_report(&report);

    match cli.command {
        Commands::Serve { port } => {
            if !report.is_valid() {
                bail!("Invalid configuration in {}", path.display());
            }
            run_server(config, port).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or_else(|| config.port())).await?;
        }
        Commands::Match { text, hint } => {
            let catalog = load_catalog(&config)?;
            match_cmd::run(&text, hint, &catalog, MatchPolicy::new(config.min_confidence()))?;
        }
    }

    Ok(())
}

fn load_catalog(config: &PillScanConfig) -> Result<Catalog> {
    let path = config.catalog_path();
    let catalog = Catalog::from_csv_path(&path)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
    info!(path = %path.display(), records = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

async fn run_server(config: PillScanConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or_else(|| config.port());
    let addr: SocketAddr = format!("{}:{}", config.bind_address(), port)
        .parse()
        .context("Invalid server bind address")?;

    info!(%addr, "Starting PillScan");

    let catalog = Arc::new(load_catalog(&config)?);
    let extractor = collaborators::build_extractor(&config)?;
    let recognizer = collaborators::build_recognizer(&config)?;

    let pipeline = ScanPipeline::new(catalog, extractor, recognizer)
        .with_policy(MatchPolicy::new(config.min_confidence()));

    let options = RouterOptions {
        cors: config.cors_enabled(),
        max_upload_bytes: config.max_upload_bytes(),
    };
    start_server(addr, GatewayState::new(pipeline), options).await
}
