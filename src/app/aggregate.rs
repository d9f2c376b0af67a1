//! Record aggregation across pages
//!
//! Drains a [`Paginator`] and concatenates every page's `records`, in page
//! order then intra-page order, with the server-internal identity field
//! removed from each record.

use serde_json::Value;
use tracing::{debug, info};

use crate::app::client::FacilityClient;
use crate::app::models::{parse_record, parse_records, FacilityRecord};
use crate::app::paginator::Paginator;
use crate::constants::api;
use crate::errors::{FetchError, FetchResult, Result};

/// Collect the records of every remaining page
pub async fn collect_records(mut paginator: Paginator<'_>) -> FetchResult<Vec<Value>> {
    let mut records = Vec::new();

    while let Some(page) = paginator.next_page().await {
        let (_, mut body) = page?;
        let page_records = body.get_mut("records").map(Value::take);
        let page_records = match page_records {
            Some(Value::Array(page_records)) => page_records,
            _ => {
                return Err(FetchError::MalformedPage {
                    reason: match body.get("detail").and_then(Value::as_str) {
                        Some(detail) => detail.to_string(),
                        None => "page has no 'records' list".to_string(),
                    },
                })
            }
        };
        records.extend(page_records.into_iter().map(strip_internal_id));
    }

    debug!(
        "Collected {} records from {} pages",
        records.len(),
        paginator.pages_fetched()
    );
    Ok(records)
}

/// Fetch every page starting at `url` and return the combined records
pub async fn fetch_data(
    client: &FacilityClient,
    url: &str,
    query: Vec<(String, String)>,
) -> FetchResult<Vec<Value>> {
    collect_records(client.paginate(url, query)).await
}

/// Fetch and validate every facility matching `query`
pub async fn fetch_facilities(
    client: &FacilityClient,
    query: Vec<(String, String)>,
) -> Result<Vec<FacilityRecord>> {
    let url = client.data_url()?;
    let records = fetch_data(client, url.as_str(), query).await?;
    let facilities = parse_records(records)?;
    info!("Fetched {} facilities from {}", facilities.len(), url);
    Ok(facilities)
}

/// Fetch and validate a single facility
pub async fn fetch_facility(client: &FacilityClient, facility_id: i64) -> Result<FacilityRecord> {
    let url = client.detail_url(facility_id)?;
    let (_, body) = client.fetch(url.as_str(), true, &[]).await?;
    Ok(parse_record(strip_internal_id(body))?)
}

fn strip_internal_id(mut record: Value) -> Value {
    if let Some(object) = record.as_object_mut() {
        object.remove(api::INTERNAL_ID_FIELD);
    }
    record
}
