//! Reshaping of facility records
//!
//! Flattening denormalizes a one-to-many relationship (facility to readings,
//! summary to yearly aggregates) into one row per nested element. Summarizing
//! reduces a facility's readings to per-(energy type, year) statistics.
//! Sorting and categorizing operate on any shape through [`FieldAccess`].

use std::collections::BTreeSet;

use chrono::Datelike;
use tracing::debug;

use crate::app::fields::{Field, FieldAccess, HasAgency};
use crate::app::models::{
    Agency, EnergyReading, FacilityRecord, FlatRecord, FlatSummaryRecord, SummaryRecord,
    Validate, YearlyAggregate,
};
use crate::constants::{files, pipeline};
use crate::errors::{ValidationError, ValidationResult};

/// Builds one flat row from a parent record and one of its nested elements
pub trait FlattenFrom<P, C>: Sized {
    fn merge(parent: &P, child: &C) -> Self;
}

impl FlattenFrom<FacilityRecord, EnergyReading> for FlatRecord {
    fn merge(parent: &FacilityRecord, child: &EnergyReading) -> Self {
        Self {
            facility_id: parent.facility_id,
            name: parent.name.clone(),
            address: parent.address.clone(),
            longitude: parent.longitude,
            latitude: parent.latitude,
            agency: parent.agency,
            sqft: parent.sqft,
            energy_type: child.energy_type,
            timestamp: child.timestamp,
            usage: child.usage,
        }
    }
}

impl FlattenFrom<SummaryRecord, YearlyAggregate> for FlatSummaryRecord {
    fn merge(parent: &SummaryRecord, child: &YearlyAggregate) -> Self {
        Self {
            facility_id: parent.facility_id,
            agency: parent.agency,
            sqft: parent.sqft,
            year: child.year,
            energy_type: child.energy_type,
            num_records: child.num_records,
            average_usage_per_sqft: child.average_usage_per_sqft,
        }
    }
}

/// Emit one row per nested element, in input order then nested order.
///
/// `nested` selects the collection to expand, e.g. [`FacilityRecord::readings`].
/// Each merged row is validated before it is emitted.
pub fn flatten<P, C, O, F>(records: &[P], nested: F) -> ValidationResult<Vec<O>>
where
    F: Fn(&P) -> &[C],
    O: FlattenFrom<P, C> + Validate,
{
    let total = records.iter().map(|record| nested(record).len()).sum();
    let mut rows = Vec::with_capacity(total);

    for parent in records {
        for child in nested(parent) {
            let row = O::merge(parent, child);
            row.validate()?;
            rows.push(row);
        }
    }

    debug!("Flattened {} records into {} rows", records.len(), rows.len());
    Ok(rows)
}

/// Summarize every facility's readings per (energy type, year).
///
/// Readings are sorted by (energy type, timestamp) and consecutive readings
/// sharing type and year form one group. The average usage per sqft of a
/// group is rounded to four decimal places.
pub fn summarize(records: &[FacilityRecord]) -> ValidationResult<Vec<SummaryRecord>> {
    records.iter().map(summarize_facility).collect()
}

fn summarize_facility(record: &FacilityRecord) -> ValidationResult<SummaryRecord> {
    let mut readings: Vec<&EnergyReading> = record.energy_records.iter().collect();
    readings.sort_by(|a, b| {
        a.energy_type
            .cmp(&b.energy_type)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    if !readings.is_empty() && record.sqft == 0 {
        return Err(ValidationError::ZeroSqft {
            facility_id: record.facility_id,
        });
    }

    let summary = readings
        .chunk_by(|a, b| {
            a.energy_type == b.energy_type && a.timestamp.year() == b.timestamp.year()
        })
        .map(|group| {
            let first = group[0];
            let total: f64 = group.iter().map(|reading| reading.usage).sum();
            let mean = total / group.len() as f64;
            YearlyAggregate {
                year: first.timestamp.year(),
                energy_type: first.energy_type,
                num_records: group.len(),
                average_usage_per_sqft: round_to(
                    mean / record.sqft as f64,
                    pipeline::USAGE_PER_SQFT_DECIMALS,
                ),
            }
        })
        .collect();

    Ok(SummaryRecord {
        facility_id: record.facility_id,
        agency: record.agency,
        sqft: record.sqft,
        summary,
    })
}

/// Round the exact binary value to `decimals` places
///
/// Formatting works on the exact value, so a product that only looks like a
/// tie in decimal rounds the way the stored float dictates.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Stable ascending sort by the given fields, highest priority first
pub fn sort<T: FieldAccess>(mut records: Vec<T>, fields: &[Field]) -> ValidationResult<Vec<T>> {
    if let Some(first) = records.first() {
        for field in fields {
            first.get(*field)?;
        }
    }

    records.sort_by(|a, b| {
        fields
            .iter()
            .filter_map(|field| Some(a.field(*field)?.sort_cmp(&b.field(*field)?)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(records)
}

/// A named partition of records
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    /// The reference item the bucket was built for
    pub item: String,
    /// `"{item}_dataset"`
    pub name: String,
    pub records: Vec<T>,
}

/// Partition records by substring match of `field` against each item.
///
/// Buckets follow the order of `items`. A record lands in every bucket whose
/// item occurs in its field value.
pub fn categorize<T, S>(records: &[T], field: Field, items: &[S]) -> ValidationResult<Vec<Bucket<T>>>
where
    T: FieldAccess + Clone,
    S: AsRef<str>,
{
    let mut buckets: Vec<Bucket<T>> = Vec::with_capacity(items.len());

    for item in items {
        let item = item.as_ref();
        if buckets.iter().any(|bucket| bucket.item == item) {
            continue;
        }

        let mut matched = Vec::new();
        for record in records {
            let contains = record
                .get(field)?
                .contains(item)
                .ok_or(ValidationError::NotText {
                    field: field.as_str(),
                })?;
            if contains {
                matched.push(record.clone());
            }
        }

        buckets.push(Bucket {
            item: item.to_string(),
            name: format!("{item}{}", files::BUCKET_SUFFIX),
            records: matched,
        });
    }

    Ok(buckets)
}

/// Distinct agencies across the records
pub fn list_of_agencies_in<T: HasAgency>(records: &[T]) -> BTreeSet<Agency> {
    records.iter().map(HasAgency::agency).collect()
}
