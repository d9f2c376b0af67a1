//! Reading and writing record artifacts
//!
//! JSON artifacts hold a list of objects. CSV artifacts hold one row per
//! record; the header is the union of field names across all rows in
//! first-seen order, and a row lacking a field gets an empty cell. Readers
//! validate every row they produce.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::app::models::{parse_records, Validate};
use crate::errors::{FileIoResult, ValidationError};

/// Artifact serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Write `data` to `path` in this format
    pub fn write<T: Serialize>(&self, data: &[T], path: &Path) -> FileIoResult<()> {
        match self {
            Self::Json => JsonWriter.write(data, path),
            Self::Csv => CsvWriter.write(data, path),
        }
    }

    /// Read and validate records from `path` in this format
    pub fn read<T: DeserializeOwned + Validate>(&self, path: &Path) -> FileIoResult<Vec<T>> {
        match self {
            Self::Json => JsonReader.read(path),
            Self::Csv => CsvReader.read(path),
        }
    }
}

/// Writes a list of records to a file
pub trait RecordWriter {
    fn write<T: Serialize>(&self, data: &[T], path: &Path) -> FileIoResult<()>;
}

/// Reads a list of validated records from a file
pub trait RecordReader {
    fn read<T: DeserializeOwned + Validate>(&self, path: &Path) -> FileIoResult<Vec<T>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl RecordWriter for JsonWriter {
    fn write<T: Serialize>(&self, data: &[T], path: &Path) -> FileIoResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        info!("Wrote {} records to {}", data.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl RecordWriter for CsvWriter {
    fn write<T: Serialize>(&self, data: &[T], path: &Path) -> FileIoResult<()> {
        let rows = data
            .iter()
            .map(to_object)
            .collect::<FileIoResult<Vec<_>>>()?;

        let mut headers: Vec<&str> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        if !headers.is_empty() {
            writer.write_record(&headers)?;
        }
        for row in &rows {
            writer.write_record(headers.iter().map(|header| cell(row.get(*header))))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

fn to_object<T: Serialize>(record: &T) -> FileIoResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(object) => Ok(object),
        other => Err(ValidationError::Malformed {
            reason: format!("expected a record object, found {other}"),
        }
        .into()),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl RecordReader for JsonReader {
    fn read<T: DeserializeOwned + Validate>(&self, path: &Path) -> FileIoResult<Vec<T>> {
        let reader = BufReader::new(File::open(path)?);
        let values: Vec<Value> = serde_json::from_reader(reader)?;
        Ok(parse_records(values)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl RecordReader for CsvReader {
    fn read<T: DeserializeOwned + Validate>(&self, path: &Path) -> FileIoResult<Vec<T>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize::<T>() {
            let record = row?;
            record.validate()?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Agency, EnergyType, FacilityRecord, FlatRecord};
    use crate::app::reshape::flatten;
    use crate::errors::FileIoError;
    use serde_json::json;
    use tempfile::TempDir;

    fn facilities() -> Vec<FacilityRecord> {
        parse_records(vec![json!({
            "facility_id": 1,
            "name": "builing_1",
            "address": "neon dreams ave, Miami, FL, 9000",
            "longitude": 27.07,
            "latitude": 27.07,
            "agency": "A",
            "sqft": 45000,
            "energy_records": [
                {"energy_type": "Elec", "timestamp": "2014-04-27T10:24:08", "usage": 5099.6442},
                {"energy_type": "Natural Gas", "timestamp": "2018-09-11T10:36:41", "usage": 8099.6442}
            ]
        })])
        .unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("facilities.json");
        let records = facilities();

        OutputFormat::Json.write(&records, &path).unwrap();
        let read_back: Vec<FacilityRecord> = OutputFormat::Json.read(&path).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn test_csv_round_trip_of_flat_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flat.csv");
        let rows: Vec<FlatRecord> = flatten(&facilities(), FacilityRecord::readings).unwrap();

        OutputFormat::Csv.write(&rows, &path).unwrap();
        let read_back: Vec<FlatRecord> = OutputFormat::Csv.read(&path).unwrap();
        assert_eq!(read_back, rows);
        assert_eq!(read_back[1].energy_type, EnergyType::NaturalGas);
        assert_eq!(read_back[0].agency, Agency::A);
    }

    #[test]
    fn test_csv_header_is_union_in_first_seen_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.csv");
        let rows = vec![json!({"a": 1, "b": "x"}), json!({"b": "y", "c": null, "d": 2.5})];

        CsvWriter.write(&rows, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a,b,c,d\n1,x,,\n,y,,2.5\n");
    }

    #[test]
    fn test_csv_of_nothing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        CsvWriter.write::<FlatRecord>(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_reader_validates_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        let mut records = facilities();
        records[0].energy_records[0].usage = -3.0;
        JsonWriter.write(&records, &path).unwrap();

        let result: FileIoResult<Vec<FacilityRecord>> = JsonReader.read(&path);
        assert!(matches!(
            result,
            Err(FileIoError::Validation(ValidationError::NegativeValue { .. }))
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nowhere").join("out.json");
        let result = JsonWriter.write(&facilities(), &path);
        assert!(matches!(result, Err(FileIoError::Io(_))));
    }
}
