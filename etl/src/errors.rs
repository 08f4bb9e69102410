use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("record {record}: missing required field '{field}'")]
    MissingField { record: String, field: String },

    #[error("record {record}: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EtlError {
    /// Raw-data defects are skippable in lenient mode; I/O and parse
    /// failures of whole files are not.
    pub fn is_record_defect(&self) -> bool {
        matches!(
            self,
            EtlError::MissingField { .. } | EtlError::MalformedRecord { .. }
        )
    }
}

pub type EtlResult<T> = Result<T, EtlError>;
