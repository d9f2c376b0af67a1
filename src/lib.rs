//! Energy Fetcher Library
//!
//! A fake paginated REST data service for facility energy records, and the
//! client tools that drain it, validate and reshape the records, and write
//! per-agency JSON and CSV artifacts.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod server;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(PAGE_SIZE, 12);
        assert_eq!(DEFAULT_BASE_URL, "http://localhost:8080");
        assert!(USER_AGENT.contains("Energy-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let app_error = AppError::from(errors::FilterError::PageNotInteger);
        assert_eq!(app_error.category(), "filter");
        assert!(!app_error.is_network());
    }
}
