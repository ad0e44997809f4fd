use thiserror::Error;

/// Failures at the edges of the tool: reading dumps, writing reports,
/// reading configuration. Aggregation itself cannot fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Expected an array of records, found {0}")]
    NotARecordArray(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
