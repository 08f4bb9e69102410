use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("store connection error: {0}")]
    StoreConnection(String),

    #[error("graph store error: {0}")]
    Store(String),

    #[error("dangling reference: {rel_type} ({from_id} -> {to_id}) references a missing node")]
    DanglingReference {
        rel_type: String,
        from_id: String,
        to_id: String,
    },

    #[error("query timed out after {timeout:?}")]
    QueryTimeout { timeout: Duration },

    #[error("artifact {artifact}: missing column '{column}'")]
    MissingColumn { artifact: String, column: String },

    #[error("artifact {artifact}, row {row}: {reason} ({loaded} rows loaded before failure)")]
    RowFailed {
        artifact: String,
        row: usize,
        loaded: usize,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
