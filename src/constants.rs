//! Application constants for Energy Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Energy-Fetcher/0.1.0 (Facility ETL Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Data service endpoints and pagination
pub mod api {
    use super::Duration;

    /// Base URL of the fake data service
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

    /// Address the data service binds to
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

    /// Path of the paginated list view
    pub const DATA_PATH: &str = "/data/";

    /// Records per page
    pub const PAGE_SIZE: usize = 12;

    /// Pause between successive page fetches
    pub const PAGE_DELAY: Duration = Duration::from_millis(100);

    /// Server-internal identity field stripped by the client
    pub const INTERNAL_ID_FIELD: &str = "_id";

    /// Dataset served when no path is configured
    pub const DEFAULT_DATASET_PATH: &str = "data/fake-energy-data-min.json";
}

/// Query parameters understood by the list view
pub mod query {
    /// Page number (1-indexed)
    pub const PAGE: &str = "page";

    /// Exact agency match
    pub const AGENCY: &str = "agency";

    /// Upper sqft bound (inclusive)
    pub const SQFT_LTE: &str = "sqft_lte";

    /// Lower sqft bound (inclusive)
    pub const SQFT_GTE: &str = "sqft_gte";

    /// Address substring
    pub const ADDRESS_CONTAINS: &str = "address_contains";
}

/// Response detail messages
pub mod detail {
    pub const PAGE_NOT_INTEGER: &str = "Page must be an integer.";
    pub const PAGE_BELOW_ONE: &str = "Page num must be greater then or equal to 1.";
    pub const NOT_FOUND: &str = "Not Found.";
}

/// Output artifact naming
pub mod files {
    /// Default root for generated datasets
    pub const DEFAULT_OUTPUT_ROOT: &str = "project_data";

    /// Suffix appended to every category bucket name
    pub const BUCKET_SUFFIX: &str = "_dataset";

    /// Prefix for per-agency directories and artifacts
    pub const AGENCY_PREFIX: &str = "agency";

    /// Flattened CSV written by the flatten command
    pub const FLAT_CSV_NAME: &str = "flat.csv";

    /// Sub-directories per pipeline
    pub const FLATTEN_DIR: &str = "flatten";
    pub const SPLITTER_DIR: &str = "splitter";
    pub const API_SPLITTER_DIR: &str = "api_splitter";
    pub const API_FLATTEN_SPLITTER_DIR: &str = "api_flatten_splitter";
    pub const SUMMARY_DIR: &str = "summary";

    /// Artifact stems for the summary splitter
    pub const SUMMARY_STEM: &str = "summary";
    pub const PORTFOLIO_STEM: &str = "portfolio";
}

/// Pipeline defaults
pub mod pipeline {
    /// States used by the local splitter
    pub const DEFAULT_SPLIT_STATES: &[&str] = &["NY", "NJ", "PA"];

    /// States queried by the API splitters
    pub const DEFAULT_API_STATES: &[&str] = &["NY", "NJ"];

    /// Lower sqft bound used by the API splitters
    pub const DEFAULT_MIN_SQFT: i64 = 30_000;

    /// Decimal places kept for average usage per sqft
    pub const USAGE_PER_SQFT_DECIMALS: usize = 4;
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Environment variable names
pub mod env {
    /// Overrides the configuration file location
    pub const CONFIG_PATH: &str = "ENERGY_FETCHER_CONFIG";
}

/// User-facing error line printed by the CLI tools
pub const HTTP_ERROR_MESSAGE: &str = "http error, please check url";

// Re-export commonly used constants for convenience
pub use api::{DEFAULT_BASE_URL, PAGE_DELAY, PAGE_SIZE};
pub use http::USER_AGENT;
