//! List and detail endpoint handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::app::models::Page;
use crate::constants::{detail, query};
use crate::errors::FilterError;
use crate::server::filter::FacilityQuery;
use crate::server::state::{AppState, StoredFacility};
use crate::server::store::PaginatingStore;

/// Failure reported to the caller as a `{"detail": ...}` body
#[derive(Debug)]
pub enum ApiError {
    Filter(FilterError),
    NotFound,
}

impl From<FilterError> for ApiError {
    fn from(error: FilterError) -> Self {
        Self::Filter(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Coercion failures keep status 200
            Self::Filter(error @ FilterError::TypeCoercion { .. }) => {
                (StatusCode::OK, error.to_string())
            }
            Self::Filter(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, detail::NOT_FOUND.to_string()),
        };
        debug!("Responding {} with detail: {}", status, message);
        (status, Json(json!({ "detail": message }))).into_response()
    }
}

/// `GET /data/`
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<Page<StoredFacility>>, ApiError> {
    let filters = FacilityQuery::from_params(&params)?;
    let records = filters.apply(&state.records)?;

    if records.is_empty() {
        return Ok(Json(Page::empty(0)));
    }

    let page_num = match params.get(query::PAGE) {
        None => 1,
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| FilterError::PageNotInteger)?,
    };

    let store = PaginatingStore::from_records(records, state.page_size);
    let page = store.page_with_query(&base_url(&headers, &uri), page_num, &filters.carried_params())?;
    Ok(Json(page))
}

/// `GET /data/:facility_id`
pub async fn detail_handler(
    State(state): State<Arc<AppState>>,
    Path(facility_id): Path<String>,
) -> Result<Json<StoredFacility>, ApiError> {
    let facility_id: i64 = facility_id.parse().map_err(|_| ApiError::NotFound)?;
    state
        .catalog
        .get_one(facility_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Absolute URL of the requested path, without its query
fn base_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .unwrap_or("localhost");
    format!("http://{host}{}", uri.path())
}
