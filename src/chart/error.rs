//! Chart error types

use thiserror::Error;

use super::kind::ChartKind;
use crate::ingest::IngestError;

/// Errors that can occur while building a chart
///
/// None of these reach the user: callers fall back to an empty figure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A column the chart type needs has not been selected
    #[error("Selection incomplete for {kind} chart: {missing}")]
    SelectionIncomplete { kind: ChartKind, missing: String },

    /// Selected column does not exist in the table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Table could not be derived from the payload
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
