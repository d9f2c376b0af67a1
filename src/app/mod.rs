//! Client-side pipeline for Energy Fetcher
//!
//! This module contains the data service client, the cursor paginator and
//! aggregator that drain the list view, the record models and reshape
//! engine, and the artifact writers used by the CLI tools.
//!
//! # Examples
//!
//! ```rust,no_run
//! use energy_fetcher::app::{fetch_facilities, summarize, FacilityClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FacilityClient::with_base_url("http://localhost:8080")?;
//! let query = vec![("agency".to_string(), "A".to_string())];
//! let facilities = fetch_facilities(&client, query).await?;
//!
//! for summary in summarize(&facilities)? {
//!     println!("{}: {} yearly aggregates", summary.facility_id, summary.summary.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod client;
pub mod fields;
pub mod fileio;
pub mod models;
pub mod paginator;
pub mod reshape;
pub mod splitter;

// Re-export main public API
pub use aggregate::{collect_records, fetch_data, fetch_facilities, fetch_facility};
pub use client::{ClientConfig, FacilityClient};
pub use fields::{Field, FieldAccess, FieldValue, HasAgency};
pub use fileio::{CsvReader, CsvWriter, JsonReader, JsonWriter, OutputFormat, RecordReader, RecordWriter};
pub use models::{
    parse_record, parse_records, Agency, EnergyReading, EnergyType, FacilityRecord, FlatRecord,
    FlatSummaryRecord, Page, SummaryRecord, Validate, YearlyAggregate,
};
pub use paginator::{tokio_delay, DelayFn, Paginator};
pub use reshape::{categorize, flatten, list_of_agencies_in, sort, summarize, Bucket, FlattenFrom};
pub use splitter::{make_agency_dirs, splitter, summary_splitter};
