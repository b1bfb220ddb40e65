use thiserror::Error;

/// Errors surfaced while writing pipeline output files. Output write
/// failures are fatal to the binary that hits them.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
