//! Uploaded payload decoding
//!
//! Browsers hand uploads over as data URLs: `data:text/csv;base64,<data>`.
//! This module splits the content-type marker from the data and decodes
//! the base64 body.

use base64::{engine::general_purpose, Engine as _};

use super::error::{IngestError, IngestResult};

/// An uploaded file: declared content type plus decoded bytes
///
/// Immutable once received. A new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPayload {
    /// Content-type marker, e.g. `data:text/csv;base64`
    pub content_type: String,
    /// Decoded file content
    pub data: Vec<u8>,
}

impl UploadedPayload {
    /// Create a payload from already-decoded bytes
    pub fn new(content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Parse the raw `<content-type>,<base64 data>` upload string
    pub fn parse(contents: &str) -> IngestResult<Self> {
        let (content_type, encoded) = contents.split_once(',').ok_or_else(|| {
            IngestError::Format("expected '<content-type>,<data>', found no comma".to_string())
        })?;

        if encoded.contains(',') {
            return Err(IngestError::Format(
                "expected exactly one comma between content type and data".to_string(),
            ));
        }

        let data = general_purpose::STANDARD.decode(encoded.trim())?;

        Ok(Self::new(content_type, data))
    }

    /// Encode bytes the way a browser upload control does
    pub fn encode(content_type: &str, data: &[u8]) -> String {
        format!("{},{}", content_type, general_purpose::STANDARD.encode(data))
    }

    /// Size of the decoded body in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
