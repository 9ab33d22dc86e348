//! Chartdeck Ingestion
//!
//! Turns an uploaded file into tabular data:
//!
//! - **payload**: splits and base64-decodes the `<content-type>,<data>` upload
//! - **table**: parses the decoded CSV text and infers column types
//! - **error**: FormatError / ParseError taxonomy
//!
//! ```text
//! "<content-type>,<base64>" → UploadedPayload → UTF-8 text → csv::Reader → Table
//! ```
//!
//! Parsing is pure and cheap, so callers re-derive the table from the
//! payload whenever they need it instead of caching it.

pub mod error;
pub mod payload;
pub mod table;

pub use error::{IngestError, IngestResult};
pub use payload::UploadedPayload;
pub use table::{decode_table, Column, ColumnKind, Scalar, Table};
