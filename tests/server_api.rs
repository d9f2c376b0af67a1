//! Integration tests for the data service HTTP surface
//!
//! These tests run the real router against the bundled dataset of 100
//! facilities (9 pages of 12) and check the wire contract of the list and
//! detail views.

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_first_and_last_page_links() {
    let base = common::spawn_server().await;

    let (status, page) = get(&format!("{base}/data/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 100);
    assert_eq!(page["prev"], Value::Null);
    assert_eq!(page["next"], json!(format!("{base}/data/?page=2")));
    assert_eq!(page["records"].as_array().unwrap().len(), 12);
    assert!(page["records"][0]["_id"].is_string());

    let (_, page) = get(&format!("{base}/data/?page=9")).await;
    assert_eq!(page["next"], Value::Null);
    assert_eq!(page["prev"], json!(format!("{base}/data/?page=8")));
    assert_eq!(page["records"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let base = common::spawn_server().await;

    let (status, page) = get(&format!("{base}/data/?page=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        page,
        json!({"next": null, "prev": null, "count": 100, "records": []})
    );
}

#[tokio::test]
async fn test_invalid_page_numbers() {
    let base = common::spawn_server().await;

    let (status, body) = get(&format!("{base}/data/?page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "Page num must be greater then or equal to 1."})
    );

    let (status, body) = get(&format!("{base}/data/?page=two")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "Page must be an integer."}));
}

#[tokio::test]
async fn test_sqft_coercion_error_keeps_status_ok() {
    let base = common::spawn_server().await;

    let (status, body) = get(&format!("{base}/data/?sqft_gte=lots")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "sqft_gte must be of type int"}));
}

#[tokio::test]
async fn test_empty_filter_result() {
    let base = common::spawn_server().await;

    // The page number is not even looked at once nothing matches
    let (status, body) = get(&format!("{base}/data/?agency=Z&page=nope")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"next": null, "prev": null, "count": 0, "records": []})
    );
}

#[tokio::test]
async fn test_filtered_pages_carry_filters() {
    let base = common::spawn_server().await;

    let (_, page) = get(&format!("{base}/data/?address_contains=NY")).await;
    assert_eq!(page["count"], 30);
    let next = page["next"].as_str().unwrap().to_string();
    assert_eq!(next, format!("{base}/data/?page=2&address_contains=NY"));

    let (_, page) = get(&next).await;
    assert_eq!(page["count"], 30);
    for record in page["records"].as_array().unwrap() {
        assert!(record["address"].as_str().unwrap().contains("NY"));
    }
}

#[tokio::test]
async fn test_filters_compose() {
    let base = common::spawn_server().await;

    let (_, page) = get(&format!(
        "{base}/data/?address_contains=NJ&sqft_gte=30000&page=1"
    ))
    .await;
    assert_eq!(page["count"], 16);
    for record in page["records"].as_array().unwrap() {
        assert!(record["sqft"].as_i64().unwrap() >= 30_000);
        assert!(record["address"].as_str().unwrap().contains("NJ"));
    }

    let (_, page) = get(&format!("{base}/data?sqft_lte=20000")).await;
    assert_eq!(page["count"], 16);
}

#[tokio::test]
async fn test_detail_view() {
    let base = common::spawn_server().await;

    let (status, record) = get(&format!("{base}/data/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["facility_id"], 1);
    assert_eq!(record["_id"], "250421dd9127dd461447d2ca");
    assert_eq!(record["energy_records"].as_array().unwrap().len(), 8);

    let (status, body) = get(&format!("{base}/data/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found."}));

    let (status, _) = get(&format!("{base}/data/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
