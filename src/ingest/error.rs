//! Ingestion error types
//!
//! Defines the errors that can occur while turning an upload into a table.

use thiserror::Error;

/// Errors that can occur while decoding an uploaded payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Payload is not of the form `<content-type>,<base64 data>`
    #[error("Format error: {0}")]
    Format(String),

    /// Decoded bytes are not UTF-8 CSV, or rows are ragged
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for IngestError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        IngestError::Parse(format!("payload is not valid UTF-8: {}", err))
    }
}

impl From<base64::DecodeError> for IngestError {
    fn from(err: base64::DecodeError) -> Self {
        IngestError::Format(format!("invalid base64 data: {}", err))
    }
}

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;
