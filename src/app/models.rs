//! Data models for Energy Fetcher
//!
//! This module defines the record shapes that flow through the pipeline: the
//! facility records served by the data service, their flattened and summarized
//! derivatives, and the page envelope used by the list view. Every shape can
//! be validated after deserialization via [`Validate`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};

/// Agency owning a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Agency {
    A,
    B,
    C,
    D,
}

impl Agency {
    /// All known agencies in display order
    pub const ALL: [Agency; 4] = [Agency::A, Agency::B, Agency::C, Agency::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|agency| agency.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAgency {
                value: s.to_string(),
            })
    }
}

/// Kind of energy a reading measures
///
/// Ordering follows the display string, so "Elec" < "Fuel Oil" < "Natural Gas".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyType {
    #[serde(rename = "Elec")]
    Elec,
    #[serde(rename = "Natural Gas")]
    NaturalGas,
    #[serde(rename = "Fuel Oil")]
    FuelOil,
}

impl EnergyType {
    pub const ALL: [EnergyType; 3] = [EnergyType::Elec, EnergyType::NaturalGas, EnergyType::FuelOil];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elec => "Elec",
            Self::NaturalGas => "Natural Gas",
            Self::FuelOil => "Fuel Oil",
        }
    }
}

impl PartialOrd for EnergyType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnergyType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownEnergyType {
                value: s.to_string(),
            })
    }
}

/// One timestamped usage observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReading {
    pub timestamp: NaiveDateTime,
    pub energy_type: EnergyType,
    pub usage: f64,
}

/// A building with metadata and its history of energy readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub facility_id: i64,
    pub name: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub agency: Agency,
    pub sqft: i64,
    pub energy_records: Vec<EnergyReading>,
}

impl FacilityRecord {
    /// The nested readings, used as the flatten accessor
    pub fn readings(&self) -> &[EnergyReading] {
        &self.energy_records
    }
}

/// A facility merged with exactly one of its readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub facility_id: i64,
    pub name: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
    pub agency: Agency,
    pub sqft: i64,
    pub energy_type: EnergyType,
    pub timestamp: NaiveDateTime,
    pub usage: f64,
}

/// Per-(year, energy type) statistics for one facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAggregate {
    pub year: i32,
    pub energy_type: EnergyType,
    pub num_records: usize,
    pub average_usage_per_sqft: f64,
}

/// A facility reduced to its yearly aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub facility_id: i64,
    pub agency: Agency,
    pub sqft: i64,
    pub summary: Vec<YearlyAggregate>,
}

impl SummaryRecord {
    /// The nested aggregates, used as the flatten accessor
    pub fn yearly(&self) -> &[YearlyAggregate] {
        &self.summary
    }
}

/// A summary record merged with exactly one yearly aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSummaryRecord {
    pub facility_id: i64,
    pub agency: Agency,
    pub sqft: i64,
    pub year: i32,
    pub energy_type: EnergyType,
    pub num_records: usize,
    pub average_usage_per_sqft: f64,
}

/// One page of the list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub count: usize,
    pub records: Vec<T>,
}

impl<T> Page<T> {
    /// A page with no records and no navigation links
    pub fn empty(count: usize) -> Self {
        Self {
            next: None,
            prev: None,
            count,
            records: Vec::new(),
        }
    }
}

/// Domain constraints checked after a record has been deserialized
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

fn non_negative(field: &'static str, value: f64) -> ValidationResult<()> {
    if value < 0.0 || value.is_nan() {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}

impl Validate for EnergyReading {
    fn validate(&self) -> ValidationResult<()> {
        non_negative("usage", self.usage)
    }
}

impl Validate for FacilityRecord {
    fn validate(&self) -> ValidationResult<()> {
        non_negative("sqft", self.sqft as f64)?;
        self.energy_records.iter().try_for_each(Validate::validate)
    }
}

impl Validate for FlatRecord {
    fn validate(&self) -> ValidationResult<()> {
        non_negative("sqft", self.sqft as f64)?;
        non_negative("usage", self.usage)
    }
}

impl Validate for SummaryRecord {
    fn validate(&self) -> ValidationResult<()> {
        non_negative("sqft", self.sqft as f64)
    }
}

impl Validate for FlatSummaryRecord {
    fn validate(&self) -> ValidationResult<()> {
        non_negative("sqft", self.sqft as f64)
    }
}

/// Deserialize and validate a single record
pub fn parse_record<T>(value: Value) -> ValidationResult<T>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_value(value).map_err(|e| ValidationError::Malformed {
        reason: e.to_string(),
    })?;
    record.validate()?;
    Ok(record)
}

/// Deserialize and validate a list of records, failing on the first bad one
pub fn parse_records<T>(values: Vec<Value>) -> ValidationResult<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    values.into_iter().map(parse_record).collect()
}
