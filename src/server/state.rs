//! Application state for the data service
//!
//! The dataset is loaded once at start-up and never written afterwards;
//! handlers share it through an `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::fields::{Field, FieldAccess, FieldValue};
use crate::app::models::{parse_records, FacilityRecord, Validate};
use crate::errors::{FileIoResult, ValidationResult};
use crate::server::store::PaginatingStore;

/// A facility as stored by the service, with its internal identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFacility {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub facility: FacilityRecord,
}

impl FieldAccess for StoredFacility {
    const SHAPE: &'static str = "stored facility";

    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        self.facility.field(field)
    }
}

impl Validate for StoredFacility {
    fn validate(&self) -> ValidationResult<()> {
        self.facility.validate()
    }
}

/// Shared, read-only service state
#[derive(Debug)]
pub struct AppState {
    /// Every record, in dataset order
    pub records: Vec<StoredFacility>,
    /// Unfiltered store used by the detail view
    pub catalog: PaginatingStore<StoredFacility>,
    /// Records per page of the list view
    pub page_size: usize,
}

impl AppState {
    pub fn from_records(records: Vec<StoredFacility>, page_size: usize) -> Self {
        let catalog = PaginatingStore::from_records(records.clone(), page_size);
        Self {
            records,
            catalog,
            page_size,
        }
    }

    /// Load and validate the dataset at `path`
    pub async fn load(path: &Path, page_size: usize) -> FileIoResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;
        let records: Vec<StoredFacility> = parse_records(values)?;

        info!(
            "Loaded {} facilities from {} ({} per page)",
            records.len(),
            path.display(),
            page_size
        );
        Ok(Self::from_records(records, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FileIoError;
    use serde_json::json;

    #[test]
    fn test_stored_facility_keeps_identity_first() {
        let value = json!({
            "_id": "5f0c6f6e2b1f4c3a9d8e7f60",
            "facility_id": 7,
            "name": "builing_7",
            "address": "state st, Albany, NY, 12207",
            "longitude": -73.75,
            "latitude": 42.65,
            "agency": "D",
            "sqft": 12000,
            "energy_records": []
        });
        let stored: StoredFacility = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(stored.id, "5f0c6f6e2b1f4c3a9d8e7f60");
        assert_eq!(stored.facility.facility_id, 7);

        let round_trip = serde_json::to_value(&stored).unwrap();
        assert_eq!(round_trip, value);
        let keys: Vec<&String> = round_trip.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "_id");
    }

    #[tokio::test]
    async fn test_load_missing_dataset() {
        let result = AppState::load(Path::new("/definitely/not/here.json"), 12).await;
        assert!(matches!(result, Err(FileIoError::Io(_))));
    }
}
