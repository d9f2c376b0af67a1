//! Shared helpers for integration tests
//!
//! Starts the real data service on an ephemeral port and builds clients
//! pointed at it.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use energy_fetcher::app::{ClientConfig, FacilityClient};
use energy_fetcher::server::{router, AppState};

/// Path of the bundled dataset
pub fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("fake-energy-data-min.json")
}

/// Serve the bundled dataset on 127.0.0.1 and return the base URL
pub async fn spawn_server() -> String {
    let state = AppState::load(&dataset_path(), 12).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(state))).await.unwrap();
    });

    format!("http://{addr}")
}

/// Client configuration for `base_url` without inter-page delay
pub fn test_client_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        page_delay: Duration::ZERO,
        ..Default::default()
    }
}

pub fn test_client(base_url: &str) -> FacilityClient {
    FacilityClient::new(test_client_config(base_url)).unwrap()
}
