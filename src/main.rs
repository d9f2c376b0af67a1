//! Energy Fetcher CLI application
//!
//! Command-line client for the facility energy data service. Fetches,
//! validates, reshapes and splits facility records into JSON and CSV
//! artifacts.

use std::process;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use energy_fetcher::cli::{
    handle_api_split, handle_fetch_many, handle_fetch_one, handle_flatten, handle_portfolio,
    handle_split, handle_summary, Cli, CommandContext, Commands,
};
use energy_fetcher::config::AppConfig;
use energy_fetcher::constants::HTTP_ERROR_MESSAGE;
use energy_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!(category = e.category(), "Command failed: {}", e);
        if e.is_network() {
            println!("{}", HTTP_ERROR_MESSAGE);
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("Energy Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.global.config.clone()).await?;
    let (mut client, server, pipeline) = config.to_runtime_config();
    if let Some(base_url) = &cli.global.base_url {
        client.base_url = base_url.clone();
    }

    let ctx = CommandContext {
        client,
        pipeline,
        dataset: server.data_file,
        quiet: cli.global.quiet,
    };

    match cli.command {
        Commands::FetchOne(args) => handle_fetch_one(args, &ctx).await,
        Commands::FetchMany(args) => handle_fetch_many(args, &ctx).await,
        Commands::Flatten(args) => {
            info!("Executing flatten command");
            handle_flatten(args, &ctx).await
        }
        Commands::Split(args) => {
            info!("Executing split command");
            handle_split(args, &ctx).await
        }
        Commands::ApiSplit(args) => {
            info!("Executing api-split command");
            handle_api_split(args, &ctx).await
        }
        Commands::Summary(args) => {
            info!("Executing summary command");
            handle_summary(args, &ctx).await
        }
        Commands::Portfolio(args) => {
            info!("Executing portfolio command");
            handle_portfolio(args, &ctx).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("energy_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    // Logs go to stderr so fetch output on stdout stays pipeable
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
