//! Named field access for record shapes
//!
//! Filtering, sorting and categorizing all address record fields by name.
//! Rather than reflecting over records at run time, each shape maps a
//! [`Field`] token to a typed [`FieldValue`] through [`FieldAccess`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};

use crate::app::models::{
    Agency, FacilityRecord, FlatRecord, FlatSummaryRecord, SummaryRecord,
};
use crate::errors::{ValidationError, ValidationResult};

/// Field name tokens understood by every record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FacilityId,
    Name,
    Address,
    Longitude,
    Latitude,
    Agency,
    Sqft,
    EnergyType,
    Timestamp,
    Usage,
    Year,
    NumRecords,
    AverageUsagePerSqft,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::FacilityId,
        Field::Name,
        Field::Address,
        Field::Longitude,
        Field::Latitude,
        Field::Agency,
        Field::Sqft,
        Field::EnergyType,
        Field::Timestamp,
        Field::Usage,
        Field::Year,
        Field::NumRecords,
        Field::AverageUsagePerSqft,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FacilityId => "facility_id",
            Self::Name => "name",
            Self::Address => "address",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Agency => "agency",
            Self::Sqft => "sqft",
            Self::EnergyType => "energy_type",
            Self::Timestamp => "timestamp",
            Self::Usage => "usage",
            Self::Year => "year",
            Self::NumRecords => "num_records",
            Self::AverageUsagePerSqft => "average_usage_per_sqft",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField {
                name: s.to_string(),
            })
    }
}

/// A borrowed, typed field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
    Timestamp(NaiveDateTime),
}

impl FieldValue<'_> {
    /// Compare two values, or `None` when the kinds are not comparable.
    /// Integers and floats compare numerically.
    pub fn compare(&self, other: &FieldValue<'_>) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), FieldValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), FieldValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Substring containment; `None` for non-text values
    pub fn contains(&self, needle: &str) -> Option<bool> {
        match self {
            Self::Text(haystack) => Some(haystack.contains(needle)),
            _ => None,
        }
    }

    /// Total order used for sorting
    pub fn sort_cmp(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (Self::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            _ => self
                .compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Int(_) | Self::Float(_) => 0,
            Self::Text(_) => 1,
            Self::Timestamp(_) => 2,
        }
    }
}

/// Typed lookup of named fields on a record shape
pub trait FieldAccess {
    /// Shape name used in error messages
    const SHAPE: &'static str;

    /// Value of `field`, or `None` if this shape has no such field
    fn field(&self, field: Field) -> Option<FieldValue<'_>>;

    /// Like [`FieldAccess::field`], but a missing field is an error
    fn get(&self, field: Field) -> ValidationResult<FieldValue<'_>> {
        self.field(field).ok_or(ValidationError::FieldNotOnShape {
            field: field.as_str(),
            shape: Self::SHAPE,
        })
    }
}

/// Records that belong to exactly one agency
pub trait HasAgency {
    fn agency(&self) -> Agency;
}

impl FieldAccess for FacilityRecord {
    const SHAPE: &'static str = "facility record";

    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::FacilityId => Some(FieldValue::Int(self.facility_id)),
            Field::Name => Some(FieldValue::Text(&self.name)),
            Field::Address => Some(FieldValue::Text(&self.address)),
            Field::Longitude => Some(FieldValue::Float(self.longitude)),
            Field::Latitude => Some(FieldValue::Float(self.latitude)),
            Field::Agency => Some(FieldValue::Text(self.agency.as_str())),
            Field::Sqft => Some(FieldValue::Int(self.sqft)),
            _ => None,
        }
    }
}

impl FieldAccess for FlatRecord {
    const SHAPE: &'static str = "flat record";

    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::FacilityId => Some(FieldValue::Int(self.facility_id)),
            Field::Name => Some(FieldValue::Text(&self.name)),
            Field::Address => Some(FieldValue::Text(&self.address)),
            Field::Longitude => Some(FieldValue::Float(self.longitude)),
            Field::Latitude => Some(FieldValue::Float(self.latitude)),
            Field::Agency => Some(FieldValue::Text(self.agency.as_str())),
            Field::Sqft => Some(FieldValue::Int(self.sqft)),
            Field::EnergyType => Some(FieldValue::Text(self.energy_type.as_str())),
            Field::Timestamp => Some(FieldValue::Timestamp(self.timestamp)),
            Field::Usage => Some(FieldValue::Float(self.usage)),
            Field::Year => Some(FieldValue::Int(i64::from(self.timestamp.year()))),
            _ => None,
        }
    }
}

impl FieldAccess for SummaryRecord {
    const SHAPE: &'static str = "summary record";

    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::FacilityId => Some(FieldValue::Int(self.facility_id)),
            Field::Agency => Some(FieldValue::Text(self.agency.as_str())),
            Field::Sqft => Some(FieldValue::Int(self.sqft)),
            _ => None,
        }
    }
}

impl FieldAccess for FlatSummaryRecord {
    const SHAPE: &'static str = "flat summary record";

    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::FacilityId => Some(FieldValue::Int(self.facility_id)),
            Field::Agency => Some(FieldValue::Text(self.agency.as_str())),
            Field::Sqft => Some(FieldValue::Int(self.sqft)),
            Field::Year => Some(FieldValue::Int(i64::from(self.year))),
            Field::EnergyType => Some(FieldValue::Text(self.energy_type.as_str())),
            Field::NumRecords => Some(FieldValue::Int(self.num_records as i64)),
            Field::AverageUsagePerSqft => Some(FieldValue::Float(self.average_usage_per_sqft)),
            _ => None,
        }
    }
}

impl HasAgency for FacilityRecord {
    fn agency(&self) -> Agency {
        self.agency
    }
}

impl HasAgency for FlatRecord {
    fn agency(&self) -> Agency {
        self.agency
    }
}

impl HasAgency for SummaryRecord {
    fn agency(&self) -> Agency {
        self.agency
    }
}

impl HasAgency for FlatSummaryRecord {
    fn agency(&self) -> Agency {
        self.agency
    }
}
