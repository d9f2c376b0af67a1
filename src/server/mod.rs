//! Fake paginated REST data service
//!
//! Serves a static facility dataset through a filtered, paginated list view
//! and a single-record detail view.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod filter;
pub mod handlers;
pub mod state;
pub mod store;

pub use filter::FacilityQuery;
pub use state::{AppState, StoredFacility};
pub use store::PaginatingStore;

/// Build the service router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data", get(handlers::list_handler))
        .route("/data/", get(handlers::list_handler))
        .route("/data/:facility_id", get(handlers::detail_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
