use std::fmt;
use std::io;

/// Unified error type for the entire application.
///
/// This error type centralizes all possible errors that can occur in the application,
/// providing a consistent interface for error handling and propagation.
///
/// Each variant represents a specific category of errors, with associated context
/// to help with debugging and error reporting.
#[derive(Debug)]
pub enum TextfoldError {
    /// Errors related to store operations
    Database(String),

    /// Errors related to configuration
    Config(String),

    /// Errors related to IO operations
    Io(io::Error),

    /// Errors related to serialization/deserialization
    Serialization(String),

    /// Other errors that don't fit into the above categories
    Other(String),
}

impl fmt::Display for TextfoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for TextfoldError {}

/// Conversion from io::Error to TextfoldError
impl From<io::Error> for TextfoldError {
    fn from(error: io::Error) -> Self {
        TextfoldError::Io(error)
    }
}

/// Conversion from serde_json::Error to TextfoldError
impl From<serde_json::Error> for TextfoldError {
    fn from(error: serde_json::Error) -> Self {
        TextfoldError::Serialization(error.to_string())
    }
}

/// Conversion from sled::Error to TextfoldError
impl From<sled::Error> for TextfoldError {
    fn from(error: sled::Error) -> Self {
        TextfoldError::Database(error.to_string())
    }
}

/// Result type alias for operations that can result in a TextfoldError
pub type TextfoldResult<T> = Result<T, TextfoldError>;
