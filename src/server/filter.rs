//! Record filtering for the list view
//!
//! Each operator returns a new set holding copies of the matching records in
//! their original order; the input is never modified. Filters compose by
//! sequential application.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::app::fields::{Field, FieldAccess, FieldValue};
use crate::constants::query;
use crate::errors::{FilterError, FilterResult};

fn value_of<T: FieldAccess>(record: &T, field: Field) -> FilterResult<FieldValue<'_>> {
    record.field(field).ok_or(FilterError::NoSuchField {
        field: field.as_str(),
    })
}

fn compare_with<T, P>(
    records: &[T],
    field: Field,
    value: FieldValue<'_>,
    op: &'static str,
    keep: P,
) -> FilterResult<Vec<T>>
where
    T: FieldAccess + Clone,
    P: Fn(Ordering) -> bool,
{
    let mut matched = Vec::new();
    for record in records {
        let ordering = value_of(record, field)?
            .compare(&value)
            .ok_or(FilterError::Incomparable {
                op,
                field: field.as_str(),
            })?;
        if keep(ordering) {
            matched.push(record.clone());
        }
    }
    Ok(matched)
}

/// Records whose `field` equals `value`; values of another kind never match
pub fn equals<T>(records: &[T], field: Field, value: FieldValue<'_>) -> FilterResult<Vec<T>>
where
    T: FieldAccess + Clone,
{
    let mut matched = Vec::new();
    for record in records {
        if value_of(record, field)?.compare(&value) == Some(Ordering::Equal) {
            matched.push(record.clone());
        }
    }
    Ok(matched)
}

/// Records whose `field` is greater than or equal to `value`
pub fn gte<T>(records: &[T], field: Field, value: FieldValue<'_>) -> FilterResult<Vec<T>>
where
    T: FieldAccess + Clone,
{
    compare_with(records, field, value, ">=", Ordering::is_ge)
}

/// Records whose `field` is less than or equal to `value`
pub fn lte<T>(records: &[T], field: Field, value: FieldValue<'_>) -> FilterResult<Vec<T>>
where
    T: FieldAccess + Clone,
{
    compare_with(records, field, value, "<=", Ordering::is_le)
}

/// Records whose text `field` contains `value` as a substring
pub fn isin<T>(records: &[T], field: Field, value: &str) -> FilterResult<Vec<T>>
where
    T: FieldAccess + Clone,
{
    let mut matched = Vec::new();
    for record in records {
        let contains = value_of(record, field)?
            .contains(value)
            .ok_or(FilterError::Incomparable {
                op: "in",
                field: field.as_str(),
            })?;
        if contains {
            matched.push(record.clone());
        }
    }
    Ok(matched)
}

/// Filters supplied as query parameters on the list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityQuery {
    pub agency: Option<String>,
    pub sqft_lte: Option<i64>,
    pub sqft_gte: Option<i64>,
    pub address_contains: Option<String>,
}

impl FacilityQuery {
    /// Read the filters from raw query parameters
    ///
    /// Missing and empty parameters are ignored. The sqft bounds must parse
    /// as integers.
    pub fn from_params(params: &HashMap<String, String>) -> FilterResult<Self> {
        let text = |name: &str| {
            params
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
        };
        let int = |name: &'static str| -> FilterResult<Option<i64>> {
            text(name)
                .map(|value| {
                    value.parse::<i64>().map_err(|_| FilterError::TypeCoercion {
                        param: name,
                        expected: "int",
                    })
                })
                .transpose()
        };

        Ok(Self {
            agency: text(query::AGENCY),
            sqft_lte: int(query::SQFT_LTE)?,
            sqft_gte: int(query::SQFT_GTE)?,
            address_contains: text(query::ADDRESS_CONTAINS),
        })
    }

    /// Apply every supplied filter in turn
    pub fn apply<T>(&self, records: &[T]) -> FilterResult<Vec<T>>
    where
        T: FieldAccess + Clone,
    {
        let mut filtered = records.to_vec();

        if let Some(agency) = &self.agency {
            filtered = equals(&filtered, Field::Agency, FieldValue::Text(agency))?;
        }
        if let Some(bound) = self.sqft_lte {
            filtered = lte(&filtered, Field::Sqft, FieldValue::Int(bound))?;
        }
        if let Some(bound) = self.sqft_gte {
            filtered = gte(&filtered, Field::Sqft, FieldValue::Int(bound))?;
        }
        if let Some(needle) = &self.address_contains {
            filtered = isin(&filtered, Field::Address, needle)?;
        }

        Ok(filtered)
    }

    /// Supplied filters as query pairs, for embedding in page links
    pub fn carried_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(agency) = &self.agency {
            params.push((query::AGENCY.to_string(), agency.clone()));
        }
        if let Some(bound) = self.sqft_lte {
            params.push((query::SQFT_LTE.to_string(), bound.to_string()));
        }
        if let Some(bound) = self.sqft_gte {
            params.push((query::SQFT_GTE.to_string(), bound.to_string()));
        }
        if let Some(needle) = &self.address_contains {
            params.push((query::ADDRESS_CONTAINS.to_string(), needle.clone()));
        }
        params
    }
}
