//! Energy data service
//!
//! Fake paginated REST API serving the static facility dataset.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use energy_fetcher::config::AppConfig;
use energy_fetcher::errors::Result;
use energy_fetcher::server::{router, AppState};

/// Energy data service
#[derive(Parser, Debug)]
#[command(name = "energy_server", version)]
#[command(about = "Fake paginated REST API serving facility energy data")]
struct Args {
    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "ENERGY_SERVER_LISTEN_ADDR")]
    listen: Option<String>,

    /// Dataset file (overrides the configuration file)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!(category = e.category(), "Server failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config.clone()).await?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_target(true).init();

    let (_, mut server, _) = config.to_runtime_config();
    if let Some(listen) = args.listen {
        server.listen = listen;
    }
    if let Some(data) = args.data {
        server.data_file = data;
    }

    info!("Starting energy data service");
    let state = Arc::new(AppState::load(&server.data_file, server.page_size).await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&server.listen).await?;
    info!("Listening on {}", server.listen);

    axum::serve(listener, app).await?;
    Ok(())
}
