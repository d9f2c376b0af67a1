//! Command-line argument parsing for Energy Fetcher
//!
//! This module defines the CLI structure using clap derive macros. Every
//! subcommand runs one pipeline against the data service or a local dataset
//! file and exits.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::fileio::OutputFormat;
use crate::app::models::Agency;

/// Energy Fetcher - facility energy data ETL tools
#[derive(Parser, Debug)]
#[command(
    name = "energy_fetcher",
    version,
    about = "Fetch, reshape and split facility energy data from the paginated data service",
    long_about = "Client tools for the facility energy data service.
Drains the paginated list view, validates records, and writes flattened, summarized
or per-agency JSON and CSV artifacts."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the data service (overrides the configuration file)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single facility and print it as JSON
    FetchOne(FetchOneArgs),

    /// Fetch every facility matching the filters and print them as JSON
    FetchMany(FetchManyArgs),

    /// Flatten a local dataset file into one CSV row per reading
    Flatten(FlattenArgs),

    /// Split a local dataset file per agency and state
    Split(SplitArgs),

    /// Fetch facilities per state and split them per agency
    ApiSplit(ApiSplitArgs),

    /// Summarize every facility and write per-agency summaries
    Summary(SummaryArgs),

    /// Summarize the facilities of one agency
    Portfolio(PortfolioArgs),
}

/// Arguments for the fetch-one command
#[derive(Args, Debug, Clone)]
pub struct FetchOneArgs {
    /// Facility id to look up
    pub facility_id: i64,
}

/// Arguments for the fetch-many command
#[derive(Args, Debug, Clone)]
pub struct FetchManyArgs {
    /// Query filter as key=value (repeatable), e.g. -k agency=A -k sqft_gte=30000
    #[arg(short = 'k', long = "keyword", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub keywords: Vec<(String, String)>,
}

/// Arguments for the flatten command
#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    /// Dataset file to read (defaults to the configured dataset)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output root (defaults to the configured output root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for the split command
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Dataset file to read (defaults to the configured dataset)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output root (defaults to the configured output root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// States to categorize by (repeatable; defaults to the configured states)
    #[arg(short, long = "state", value_name = "STATE")]
    pub states: Vec<String>,
}

/// Arguments for the api-split command
#[derive(Args, Debug, Clone)]
pub struct ApiSplitArgs {
    /// Artifact format; csv writes flattened rows
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output root (defaults to the configured output root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// States to query (repeatable; defaults to the configured states)
    #[arg(short, long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// Lower sqft bound (defaults to the configured bound)
    #[arg(long)]
    pub min_sqft: Option<i64>,
}

/// Arguments for the summary command
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Output root (defaults to the configured output root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for the portfolio command
#[derive(Args, Debug, Clone)]
pub struct PortfolioArgs {
    /// Agency to summarize (A, B, C or D)
    pub agency: Agency,

    /// Existing directory to write into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Artifact format; csv writes flattened summaries
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Parse a `key=value` query filter
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("address_contains=Albany, NY"),
            Ok(("address_contains".to_string(), "Albany, NY".to_string()))
        );
        assert_eq!(
            parse_key_value("sqft_gte=a=b"),
            Ok(("sqft_gte".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_value("agency").is_err());
        assert!(parse_key_value("=A").is_err());
    }

    #[test]
    fn test_fetch_many_collects_keywords() {
        let cli = Cli::try_parse_from([
            "energy_fetcher",
            "fetch-many",
            "-k",
            "agency=A",
            "--keyword",
            "sqft_gte=30000",
        ])
        .unwrap();

        match cli.command {
            Commands::FetchMany(args) => assert_eq!(
                args.keywords,
                vec![
                    ("agency".to_string(), "A".to_string()),
                    ("sqft_gte".to_string(), "30000".to_string()),
                ]
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_portfolio_arguments() {
        let cli = Cli::try_parse_from([
            "energy_fetcher",
            "--base-url",
            "http://127.0.0.1:9000",
            "portfolio",
            "B",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.global.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        match cli.command {
            Commands::Portfolio(args) => {
                assert_eq!(args.agency, Agency::B);
                assert_eq!(args.format, OutputFormat::Csv);
                assert_eq!(args.directory, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["energy_fetcher", "portfolio", "Z"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["energy_fetcher", "-q", "summary"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);

        let cli = Cli::try_parse_from(["energy_fetcher", "--very-verbose", "summary"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);

        let cli = Cli::try_parse_from(["energy_fetcher", "summary"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }
}
