use thiserror::Error;

/// Result type for ingestion operations
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error types for the classification-ingestion pipeline
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Oracle request failed: {0}")]
    Oracle(String),

    #[error("Failed to parse classification response: {0}")]
    ResponseParse(String),

    #[error("Classification response violates expected shape: {0}")]
    SchemaViolation(String),

    #[error("{0}")]
    Store(#[from] crate::error::TextfoldError),
}

impl IngestionError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        IngestionError::Configuration(msg.into())
    }
}
