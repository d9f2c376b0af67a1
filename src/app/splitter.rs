//! Per-agency artifact layout
//!
//! Every agency gets a directory `agency<A>` under the output directory.
//! [`splitter`] writes one artifact per (agency, bucket) pair holding the
//! bucket's records for that agency. [`summary_splitter`] is used when the
//! buckets are already keyed by agency and writes one artifact per bucket.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::app::fields::HasAgency;
use crate::app::fileio::OutputFormat;
use crate::app::models::Agency;
use crate::app::reshape::Bucket;
use crate::constants::files;
use crate::errors::{FileIoError, FileIoResult};

/// Directory holding the artifacts of `agency`
pub fn agency_dir(dir: &Path, agency: &str) -> PathBuf {
    dir.join(format!("{}{agency}", files::AGENCY_PREFIX))
}

/// Create `agency<A>` under `dir` for every agency that lacks one
pub fn make_agency_dirs<'a, I>(dir: &Path, agencies: I) -> FileIoResult<()>
where
    I: IntoIterator<Item = &'a Agency>,
{
    if !dir.is_dir() {
        return Err(FileIoError::DirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    for agency in agencies {
        let path = agency_dir(dir, agency.as_str());
        if !path.exists() {
            std::fs::create_dir(&path)?;
            debug!("Created {}", path.display());
        }
    }
    Ok(())
}

/// Write `agency<A>/agency<A>-<bucket>.<ext>` for every agency and bucket
///
/// Each artifact holds the bucket's records whose agency is `A`, in bucket
/// order. Returns the written paths.
pub fn splitter<'a, T, I>(
    format: OutputFormat,
    agencies: I,
    buckets: &[Bucket<T>],
    dir: &Path,
) -> FileIoResult<Vec<PathBuf>>
where
    T: Serialize + HasAgency,
    I: IntoIterator<Item = &'a Agency>,
{
    let agencies: Vec<&Agency> = agencies.into_iter().collect();
    make_agency_dirs(dir, agencies.iter().copied())?;

    let mut written = Vec::with_capacity(agencies.len() * buckets.len());
    for agency in agencies {
        for bucket in buckets {
            let records: Vec<&T> = bucket
                .records
                .iter()
                .filter(|record| record.agency() == *agency)
                .collect();

            let path = agency_dir(dir, agency.as_str()).join(format!(
                "{}{agency}-{}.{}",
                files::AGENCY_PREFIX,
                bucket.name,
                format.extension()
            ));
            format.write(&records, &path)?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Write `agency<A>/agency<A>-<stem>.<ext>` for every bucket keyed by agency `A`
pub fn summary_splitter<'a, T, I>(
    format: OutputFormat,
    stem: &str,
    buckets: &[Bucket<T>],
    dir: &Path,
    agencies: I,
) -> FileIoResult<Vec<PathBuf>>
where
    T: Serialize,
    I: IntoIterator<Item = &'a Agency>,
{
    make_agency_dirs(dir, agencies)?;

    let mut written = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let path = agency_dir(dir, &bucket.item).join(format!(
            "{}{}-{stem}.{}",
            files::AGENCY_PREFIX,
            bucket.item,
            format.extension()
        ));
        format.write(&bucket.records, &path)?;
        written.push(path);
    }

    Ok(written)
}
