//! Command handlers for Energy Fetcher CLI
//!
//! Each handler runs one pipeline to completion: fetch or read records,
//! validate and reshape them, then print or write the result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::{
    categorize, fetch_facilities, fetch_facility, flatten, list_of_agencies_in, sort, splitter,
    summarize, summary_splitter, Agency, ClientConfig, FacilityClient, FacilityRecord, Field,
    FlatRecord, FlatSummaryRecord, OutputFormat, SummaryRecord,
};
use crate::cli::{
    ApiSplitArgs, FetchManyArgs, FetchOneArgs, FlattenArgs, PortfolioArgs, SplitArgs, SummaryArgs,
};
use crate::config::PipelineConfig;
use crate::constants::{files, query};
use crate::errors::{FileIoError, Result};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Data service client settings
    pub client: ClientConfig,
    /// Pipeline defaults
    pub pipeline: PipelineConfig,
    /// Local dataset used when no input file is given
    pub dataset: PathBuf,
    /// Suppress spinners and summaries
    pub quiet: bool,
}

impl CommandContext {
    fn facility_client(&self) -> Result<FacilityClient> {
        Ok(FacilityClient::new(self.client.clone())?)
    }

    fn output_dir(&self, output: Option<&Path>, pipeline_dir: &str) -> Result<PathBuf> {
        let root = output.unwrap_or(&self.pipeline.output_root);
        let dir = root.join(pipeline_dir);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn report(&self, written: &[PathBuf], dir: &Path) {
        info!("Wrote {} artifacts under {}", written.len(), dir.display());
        if !self.quiet {
            println!("Wrote {} files under {}", written.len(), dir.display());
        }
    }
}

/// Handle the fetch-one command
pub async fn handle_fetch_one(args: FetchOneArgs, ctx: &CommandContext) -> Result<()> {
    let client = ctx.facility_client()?;

    let spinner = ctx.spinner(format!("Fetching facility {}...", args.facility_id));
    let record = fetch_facility(&client, args.facility_id).await;
    spinner.finish_and_clear();

    print_json(&record?)
}

/// Handle the fetch-many command
pub async fn handle_fetch_many(args: FetchManyArgs, ctx: &CommandContext) -> Result<()> {
    let client = ctx.facility_client()?;
    info!("Fetching facilities with {} filters", args.keywords.len());

    let spinner = ctx.spinner("Fetching facilities...".to_string());
    let records = fetch_facilities(&client, args.keywords).await;
    spinner.finish_and_clear();

    print_json(&records?)
}

/// Handle the flatten command
pub async fn handle_flatten(args: FlattenArgs, ctx: &CommandContext) -> Result<()> {
    let input = args.input.as_deref().unwrap_or(&ctx.dataset);
    let records: Vec<FacilityRecord> = OutputFormat::Json.read(input)?;

    let rows: Vec<FlatRecord> = flatten(&records, FacilityRecord::readings)?;
    let rows = sort(
        rows,
        &[Field::FacilityId, Field::EnergyType, Field::Timestamp, Field::Agency],
    )?;

    let dir = ctx.output_dir(args.output.as_deref(), files::FLATTEN_DIR)?;
    let path = dir.join(files::FLAT_CSV_NAME);
    OutputFormat::Csv.write(&rows, &path)?;

    ctx.report(&[path], &dir);
    Ok(())
}

/// Handle the split command
pub async fn handle_split(args: SplitArgs, ctx: &CommandContext) -> Result<()> {
    let input = args.input.as_deref().unwrap_or(&ctx.dataset);
    let states = or_default(args.states, &ctx.pipeline.split_states);
    let records: Vec<FacilityRecord> = OutputFormat::Json.read(input)?;

    let buckets = categorize(&records, Field::Address, &states)?;
    let agencies = list_of_agencies_in(&records);

    let dir = ctx.output_dir(args.output.as_deref(), files::SPLITTER_DIR)?;
    let written = splitter(OutputFormat::Json, &agencies, &buckets, &dir)?;

    ctx.report(&written, &dir);
    Ok(())
}

/// Handle the api-split command
///
/// Fetches facilities per state above the sqft bound, then writes either the
/// facilities (json) or their flattened readings (csv) per agency and state.
pub async fn handle_api_split(args: ApiSplitArgs, ctx: &CommandContext) -> Result<()> {
    let client = ctx.facility_client()?;
    let states = or_default(args.states, &ctx.pipeline.api_states);
    let min_sqft = args.min_sqft.unwrap_or(ctx.pipeline.min_sqft);

    let mut records = Vec::new();
    for state in &states {
        let spinner = ctx.spinner(format!("Fetching facilities in {state}..."));
        let filters = vec![
            (query::ADDRESS_CONTAINS.to_string(), state.clone()),
            (query::SQFT_GTE.to_string(), min_sqft.to_string()),
        ];
        let fetched = fetch_facilities(&client, filters).await;
        spinner.finish_and_clear();
        records.extend(fetched?);
    }
    let agencies = list_of_agencies_in(&records);

    let (dir, written) = match args.format {
        OutputFormat::Json => {
            let records = sort(records, &[Field::FacilityId])?;
            let buckets = categorize(&records, Field::Address, &states)?;
            let dir = ctx.output_dir(args.output.as_deref(), files::API_SPLITTER_DIR)?;
            let written = splitter(OutputFormat::Json, &agencies, &buckets, &dir)?;
            (dir, written)
        }
        OutputFormat::Csv => {
            let rows: Vec<FlatRecord> = flatten(&records, FacilityRecord::readings)?;
            let rows = sort(
                rows,
                &[Field::FacilityId, Field::EnergyType, Field::Timestamp, Field::Agency],
            )?;
            let buckets = categorize(&rows, Field::Address, &states)?;
            let dir = ctx.output_dir(args.output.as_deref(), files::API_FLATTEN_SPLITTER_DIR)?;
            let written = splitter(OutputFormat::Csv, &agencies, &buckets, &dir)?;
            (dir, written)
        }
    };

    ctx.report(&written, &dir);
    Ok(())
}

/// Handle the summary command
pub async fn handle_summary(args: SummaryArgs, ctx: &CommandContext) -> Result<()> {
    let client = ctx.facility_client()?;

    let spinner = ctx.spinner("Fetching facilities...".to_string());
    let records = fetch_facilities(&client, Vec::new()).await;
    spinner.finish_and_clear();

    let summaries = summarize(&records?)?;
    let dir = ctx.output_dir(args.output.as_deref(), files::SUMMARY_DIR)?;

    let mut written = write_summaries(&summaries, OutputFormat::Json, files::SUMMARY_STEM, &dir)?;
    written.extend(write_summaries(
        &summaries,
        OutputFormat::Csv,
        files::SUMMARY_STEM,
        &dir,
    )?);

    ctx.report(&written, &dir);
    Ok(())
}

/// Handle the portfolio command
pub async fn handle_portfolio(args: PortfolioArgs, ctx: &CommandContext) -> Result<()> {
    if !args.directory.is_dir() {
        return Err(FileIoError::DirectoryMissing {
            path: args.directory,
        }
        .into());
    }

    let client = ctx.facility_client()?;
    let spinner = ctx.spinner(format!("Fetching portfolio of agency {}...", args.agency));
    let filters = vec![(query::AGENCY.to_string(), args.agency.to_string())];
    let records = fetch_facilities(&client, filters).await;
    spinner.finish_and_clear();

    let summaries = summarize(&records?)?;
    if summaries.is_empty() {
        warn!("Agency {} has no facilities", args.agency);
    }

    let written = write_summaries(&summaries, args.format, files::PORTFOLIO_STEM, &args.directory)?;
    ctx.report(&written, &args.directory);
    Ok(())
}

/// Write `agency<A>-<stem>.<ext>` per agency
///
/// JSON holds summary records sorted by facility id; CSV holds flattened
/// summaries sorted by facility id, energy type and year.
pub fn write_summaries(
    summaries: &[SummaryRecord],
    format: OutputFormat,
    stem: &str,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let agencies = list_of_agencies_in(summaries);
    let items: Vec<&str> = agencies.iter().map(Agency::as_str).collect();

    let written = match format {
        OutputFormat::Json => {
            let sorted = sort(summaries.to_vec(), &[Field::FacilityId])?;
            let buckets = categorize(&sorted, Field::Agency, &items)?;
            summary_splitter(format, stem, &buckets, dir, &agencies)?
        }
        OutputFormat::Csv => {
            let rows: Vec<FlatSummaryRecord> = flatten(summaries, SummaryRecord::yearly)?;
            let sorted = sort(rows, &[Field::FacilityId, Field::EnergyType, Field::Year])?;
            let buckets = categorize(&sorted, Field::Agency, &items)?;
            summary_splitter(format, stem, &buckets, dir, &agencies)?
        }
    };
    Ok(written)
}

fn or_default(values: Vec<String>, defaults: &[String]) -> Vec<String> {
    if values.is_empty() {
        defaults.to_vec()
    } else {
        values
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string(value).map_err(FileIoError::from)?;
    println!("{text}");
    Ok(())
}
