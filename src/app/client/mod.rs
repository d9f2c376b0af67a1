//! HTTP client for the facility data service
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single GET requests with JSON decoding

use serde_json::Value;
use url::Url;

use crate::app::paginator::Paginator;
use crate::constants::api;
use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Client for the paginated facility data service
#[derive(Debug, Clone)]
pub struct FacilityClient {
    http_handler: HttpHandler,
    base_url: Url,
    config: ClientConfig,
}

impl FacilityClient {
    /// Creates a client for the base URL in `config`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the base URL does not parse, or
    /// `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let base_url = parse_url(&config.base_url)?;
        let http_handler = HttpHandler::new(config.build_http_client()?);

        tracing::debug!("Created facility client for {}", base_url);

        Ok(Self {
            http_handler,
            base_url,
            config,
        })
    }

    /// Creates a client with default settings for the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> FetchResult<Self> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// URL of the paginated list view
    pub fn data_url(&self) -> FetchResult<Url> {
        self.base_url
            .join(api::DATA_PATH)
            .map_err(|e| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
                error: e.to_string(),
            })
    }

    /// URL of the single-record view for `facility_id`
    pub fn detail_url(&self, facility_id: i64) -> FetchResult<Url> {
        let data_url = self.data_url()?;
        data_url
            .join(&facility_id.to_string())
            .map_err(|e| FetchError::InvalidUrl {
                url: data_url.to_string(),
                error: e.to_string(),
            })
    }

    /// Issue one GET and return `(status, body)`
    ///
    /// With `raise_on_error` set, a status >= 400 becomes
    /// `FetchError::Status`; otherwise the error body is returned with its
    /// status code.
    pub async fn fetch(
        &self,
        url: &str,
        raise_on_error: bool,
        query: &[(String, String)],
    ) -> FetchResult<(u16, Value)> {
        let url = parse_url(url)?;
        self.http_handler.get_json(&url, raise_on_error, query).await
    }

    /// Lazily walk the `next` chain starting at `url`
    ///
    /// `query` is sent with the first request only; later requests follow the
    /// server's links verbatim. Successive fetches are separated by the
    /// configured page delay.
    pub fn paginate(&self, url: impl Into<String>, query: Vec<(String, String)>) -> Paginator<'_> {
        Paginator::new(self, url.into(), query).with_delay(self.config.page_delay)
    }
}

fn parse_url(url: &str) -> FetchResult<Url> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_from_base() {
        let client = FacilityClient::with_base_url("http://localhost:8080").unwrap();
        assert_eq!(client.data_url().unwrap().as_str(), "http://localhost:8080/data/");
        assert_eq!(
            client.detail_url(42).unwrap().as_str(),
            "http://localhost:8080/data/42"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = FacilityClient::with_base_url("not a url");
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let client = FacilityClient::with_base_url("http://localhost:8080").unwrap();
        let result = client.fetch("::nope::", true, &[]).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
