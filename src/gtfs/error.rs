use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GTFS parse error: {0}")]
    ParseError(String),
}
