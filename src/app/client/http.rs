//! Core HTTP operations
//!
//! This module issues single GET requests against the data service and
//! decodes their JSON bodies. There is no retry or rate limiting here; a
//! failed request is reported to the caller as-is.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::{FetchError, FetchResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler around an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Issue one GET and decode the JSON body
    ///
    /// Query parameters are appended to whatever query `url` already carries.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Status` for a status >= 400 when `raise_on_error`
    /// is set, otherwise only for transport or decoding failures.
    pub async fn get_json(
        &self,
        url: &Url,
        raise_on_error: bool,
        query: &[(String, String)],
    ) -> FetchResult<(u16, Value)> {
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if raise_on_error && (status.is_client_error() || status.is_server_error()) {
            tracing::warn!("GET {} returned {}", response.url(), status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.json::<Value>().await?;
        tracing::debug!("GET {} -> {}", url, status);
        Ok((status.as_u16(), body))
    }
}
