//! Error types for Energy Fetcher
//!
//! This module defines the error taxonomy shared by the data service and the
//! client tools. Each concern has its own enum; `AppError` folds them together
//! for the CLI entry points.

use std::path::PathBuf;
use thiserror::Error;

/// Record construction and reshaping errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric field below zero (sqft, usage)
    #[error("{field}: {value} cannot be negative")]
    NegativeValue { field: &'static str, value: f64 },

    /// Agency outside the known set
    #[error("Unknown agency: {value}")]
    UnknownAgency { value: String },

    /// Energy type outside the known set
    #[error("Unknown energy type: {value}")]
    UnknownEnergyType { value: String },

    /// Structure did not match the expected record shape
    #[error("Malformed record: {reason}")]
    Malformed { reason: String },

    /// Field token that names no field
    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    /// Field that exists, but not on this record shape
    #[error("Field '{field}' is not available on {shape}")]
    FieldNotOnShape {
        field: &'static str,
        shape: &'static str,
    },

    /// Substring match requested on a non-text field
    #[error("Field '{field}' is not text; cannot match substrings")]
    NotText { field: &'static str },

    /// Facility with readings but no floor area to divide by
    #[error("Facility {facility_id} has sqft 0; cannot compute usage per sqft")]
    ZeroSqft { facility_id: i64 },
}

/// Server-side query and pagination errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Query parameter could not be cast to its expected type
    #[error("{param} must be of type {expected}")]
    TypeCoercion {
        param: &'static str,
        expected: &'static str,
    },

    /// Stored field is not comparable to the query value
    #[error("'{op}' not supported between field '{field}' and the given value")]
    Incomparable { op: &'static str, field: &'static str },

    /// Filtered field does not exist on the stored records
    #[error("Records have no field '{field}'")]
    NoSuchField { field: &'static str },

    /// Page number below one
    #[error("Page num must be greater then or equal to 1.")]
    PageRange { page: i64 },

    /// Page number is not an integer
    #[error("Page must be an integer.")]
    PageNotInteger,
}

/// HTTP client errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure or undecodable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status while raise-on-error was set
    #[error("Server error: HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Page body without the expected shape
    #[error("Malformed page: {reason}")]
    MalformedPage { reason: String },
}

/// Artifact reading and writing errors
#[derive(Error, Debug)]
pub enum FileIoError {
    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Row failed validation after reading
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Output directory does not exist
    #[error("The directory {path} does not exist")]
    DirectoryMissing { path: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    FileIo(#[from] FileIoError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the failure came from talking to the data service
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Fetch(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Filter(_) => "filter",
            AppError::Fetch(_) => "network",
            AppError::FileIo(_) => "file_io",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Filter result type alias
pub type FilterResult<T> = std::result::Result<T, FilterError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// File IO result type alias
pub type FileIoResult<T> = std::result::Result<T, FileIoError>;
