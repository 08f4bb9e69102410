use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::errors::{EtlError, EtlResult};

/// Raw input file names, one JSON array per entity type.
pub const SYMPTOMS_RAW: &str = "symptoms_raw.json";
pub const DISEASES_RAW: &str = "diseases_raw.json";
pub const MEDICINES_RAW: &str = "medicines_raw.json";
pub const PRECAUTIONS_RAW: &str = "precautions_raw.json";
pub const CURES_RAW: &str = "cures_raw.json";

/// Load one raw entity file: a JSON array of heterogeneous records.
pub fn load_records(dir: &Path, file_name: &str) -> EtlResult<Vec<Value>> {
    let path = dir.join(file_name);
    let file = File::open(&path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(EtlError::MalformedRecord {
            record: file_name.to_string(),
            reason: "expected a top-level JSON array".to_string(),
        }),
    }
}
