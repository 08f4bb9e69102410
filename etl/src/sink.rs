//! Tabular sink: one CSV artifact per entity or relationship type. The
//! header comes from the schema descriptor, not from the row shape, and
//! every write is a full overwrite of the named artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::EtlResult;

pub fn artifact_path(dir: &Path, artifact: &str) -> PathBuf {
    dir.join(format!("{artifact}.csv"))
}

/// Write `rows` to `<dir>/<artifact>.csv` with the given column order.
/// Creates `dir` if absent. Zero rows still produce a valid header-only
/// artifact.
pub fn write_rows<T: Serialize>(
    dir: &Path,
    artifact: &str,
    columns: &[&str],
    rows: &[T],
) -> EtlResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = artifact_path(dir, artifact);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(path)
}

/// Read an artifact back into typed rows, matching columns by header
/// name. Used by the round-trip tests and local inspection.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> EtlResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
