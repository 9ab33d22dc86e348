//! Option Derivation
//!
//! Computes what the dashboard shows right after an upload: a preview of
//! the first rows, the column pickers' options, and the preview caption.
//! No table means every output is empty; that is the idle state.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ingest::{decode_table, Scalar, Table};

/// Number of rows shown in the preview
pub const PREVIEW_ROWS: usize = 5;

/// Caption shown above the preview when data is loaded
pub const PREVIEW_CAPTION: &str = "Data Table Preview (First 5 rows)";

/// First rows of a table, for display only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl PreviewTable {
    /// Take the first `PREVIEW_ROWS` rows of a table
    pub fn from_table(table: &Table) -> Self {
        let n = table.row_count().min(PREVIEW_ROWS);
        let rows = (0..n)
            .filter_map(|i| table.row(i))
            .map(|row| row.into_iter().cloned().collect())
            .collect();

        Self {
            columns: table.column_names().into_iter().map(String::from).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as records keyed by column name
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| {
                        let json = serde_json::to_value(value).unwrap_or(Value::Null);
                        (name.clone(), json)
                    })
                    .collect()
            })
            .collect()
    }
}

impl Serialize for PreviewTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records().serialize(serializer)
    }
}

/// One selectable column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnOption {
    /// Display label
    pub label: String,
    /// Underlying column name
    pub value: String,
}

impl ColumnOption {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            value: name,
        }
    }
}

/// Options for a column picker, in table column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnOptionSet(pub Vec<ColumnOption>);

impl ColumnOptionSet {
    pub fn from_table(table: &Table) -> Self {
        Self(
            table
                .column_names()
                .into_iter()
                .map(ColumnOption::new)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a column name is selectable
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|o| o.value == value)
    }
}

/// Everything derived from an upload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataOptions {
    /// Preview rows (serialized as records)
    #[serde(rename = "data")]
    pub preview: PreviewTable,
    pub x_options: ColumnOptionSet,
    pub y_options: ColumnOptionSet,
    pub color_options: ColumnOptionSet,
    /// Preview caption, empty when idle
    #[serde(rename = "header")]
    pub caption: String,
}

impl DataOptions {
    /// Derive preview, options and caption from an optional table
    pub fn derive(table: Option<&Table>) -> Self {
        let Some(table) = table else {
            return Self::default();
        };

        let options = ColumnOptionSet::from_table(table);

        Self {
            preview: PreviewTable::from_table(table),
            x_options: options.clone(),
            y_options: options.clone(),
            color_options: options,
            caption: PREVIEW_CAPTION.to_string(),
        }
    }

    /// Derive from a raw upload string, degrading to idle on any failure
    pub fn from_contents(contents: Option<&str>) -> Self {
        let Some(contents) = contents.filter(|c| !c.is_empty()) else {
            return Self::default();
        };

        match decode_table(contents) {
            Ok(table) => Self::derive(Some(&table)),
            Err(e) => {
                tracing::warn!(error = %e, "Upload could not be decoded, showing no data");
                Self::default()
            }
        }
    }

    /// Check whether data is loaded
    pub fn is_idle(&self) -> bool {
        self.caption.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::UploadedPayload;

    fn table(csv: &str) -> Table {
        Table::from_csv_str(csv).unwrap()
    }

    #[test]
    fn test_three_row_scenario() {
        let t = table("a,b\n1,2\n3,4\n5,6");
        let opts = DataOptions::derive(Some(&t));

        assert_eq!(opts.preview.len(), 3);
        assert_eq!(opts.caption, PREVIEW_CAPTION);
        assert_eq!(
            opts.x_options,
            ColumnOptionSet(vec![ColumnOption::new("a"), ColumnOption::new("b")])
        );
        assert_eq!(opts.x_options, opts.y_options);
        assert_eq!(opts.y_options, opts.color_options);
    }

    #[test]
    fn test_preview_caps_at_five_rows() {
        let csv = "n\n1\n2\n3\n4\n5\n6\n7\n";
        let opts = DataOptions::derive(Some(&table(csv)));

        assert_eq!(opts.preview.len(), PREVIEW_ROWS);
        assert_eq!(opts.preview.rows[4], vec![Scalar::Number(5.0)]);
    }

    #[test]
    fn test_idle_without_table() {
        let opts = DataOptions::derive(None);

        assert!(opts.preview.is_empty());
        assert!(opts.x_options.is_empty());
        assert!(opts.y_options.is_empty());
        assert!(opts.color_options.is_empty());
        assert!(opts.is_idle());
    }

    #[test]
    fn test_undecodable_contents_degrade_to_idle() {
        assert!(DataOptions::from_contents(Some("garbage")).is_idle());
        assert!(DataOptions::from_contents(Some("")).is_idle());
        assert!(DataOptions::from_contents(None).is_idle());
    }

    #[test]
    fn test_from_contents() {
        let raw = UploadedPayload::encode("data:text/csv;base64", b"x,label\n1,a\n2,b");
        let opts = DataOptions::from_contents(Some(&raw));

        assert_eq!(opts.x_options.len(), 2);
        assert!(opts.color_options.contains("label"));
    }

    #[test]
    fn test_serialized_shape() {
        let opts = DataOptions::derive(Some(&table("a,b\n1,x")));
        let json = serde_json::to_value(&opts).unwrap();

        assert_eq!(json["data"][0]["a"], serde_json::json!(1.0));
        assert_eq!(json["data"][0]["b"], serde_json::json!("x"));
        assert_eq!(json["x_options"][1]["label"], "b");
        assert_eq!(json["header"], PREVIEW_CAPTION);
    }
}
