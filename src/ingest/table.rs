//! Tabular data model
//!
//! A `Table` is an ordered list of uniquely named columns holding scalar
//! values. It is a pure function of the uploaded payload and is never
//! mutated after construction.

use serde::Serialize;

use super::error::{IngestError, IngestResult};
use super::payload::UploadedPayload;

/// Largest magnitude below which every whole f64 is an exact integer (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Cell strings treated as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Missing,
}

impl Scalar {
    /// Check whether this cell is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Missing)
    }

    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Human-readable label used for grouping and hierarchy ids
    ///
    /// Whole numbers print without a fractional part. Beyond 2^53 the
    /// float form is kept, since the integer cast would collapse values.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
                Some(format!("{}", *n as i64))
            }
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Missing => None,
        }
    }
}

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-missing cell parses as a number
    Numeric,
    /// At least one cell is not a number
    Text,
}

/// A named column of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Scalar>,
}

impl Column {
    /// Build a column from raw cell strings, inferring its kind
    fn from_cells(name: String, cells: Vec<String>) -> Self {
        let numeric = cells
            .iter()
            .filter(|c| !is_na(c.as_str()))
            .all(|c| c.trim().parse::<f64>().is_ok());

        let values = cells
            .into_iter()
            .map(|cell| {
                if is_na(cell.as_str()) {
                    Scalar::Missing
                } else if numeric {
                    // Checked above
                    cell.trim()
                        .parse::<f64>()
                        .map(Scalar::Number)
                        .unwrap_or(Scalar::Missing)
                } else {
                    Scalar::Text(cell)
                }
            })
            .collect();

        let kind = if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };

        Self { name, kind, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parsed CSV data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Decode an uploaded payload into a table
    pub fn from_payload(payload: &UploadedPayload) -> IngestResult<Self> {
        let text = String::from_utf8(payload.data.clone())?;
        Self::from_csv_str(&text)
    }

    /// Parse CSV text; the first row is the header
    pub fn from_csv_str(text: &str) -> IngestResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(IngestError::Parse(
                "no columns to parse from file".to_string(),
            ));
        }

        let names = unique_names(headers.iter());
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;

        for result in reader.records() {
            let record = result?;
            for (idx, field) in record.iter().enumerate() {
                cells[idx].push(field.to_string());
            }
            row_count += 1;
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::from_cells(name, cells))
            .collect();

        Ok(Self { columns, row_count })
    }

    /// All columns in header order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in header order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Values of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&Scalar>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }
}

/// Check whether a raw cell counts as missing
fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell.trim())
}

/// Make header names unique
///
/// Blank headers become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
fn unique_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for (idx, header) in headers.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }

    names
}

/// Decode a raw upload string straight into a table
pub fn decode_table(contents: &str) -> IngestResult<Table> {
    let payload = UploadedPayload::parse(contents)?;
    Table::from_payload(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let table = Table::from_csv_str("a,b\n1,2\n3,4\n5,6").unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("a").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(
            table.row(1).unwrap(),
            vec![&Scalar::Number(3.0), &Scalar::Number(4.0)]
        );
    }

    #[test]
    fn test_text_column_inference() {
        let table = Table::from_csv_str("city,temp\nOslo,3.5\nLima,19\n").unwrap();

        let city = table.column("city").unwrap();
        assert_eq!(city.kind, ColumnKind::Text);
        assert_eq!(city.values[0], Scalar::Text("Oslo".to_string()));

        let temp = table.column("temp").unwrap();
        assert_eq!(temp.kind, ColumnKind::Numeric);
        assert_eq!(temp.values[1], Scalar::Number(19.0));
    }

    #[test]
    fn test_missing_values_keep_numeric_kind() {
        let table = Table::from_csv_str("x,y\n1,\n2,NA\n3,4").unwrap();

        let y = table.column("y").unwrap();
        assert_eq!(y.kind, ColumnKind::Numeric);
        assert!(y.values[0].is_missing());
        assert!(y.values[1].is_missing());
        assert_eq!(y.values[2], Scalar::Number(4.0));
    }

    #[test]
    fn test_mixed_column_is_text() {
        let table = Table::from_csv_str("v\n1\ntwo\n3").unwrap();
        let v = table.column("v").unwrap();

        assert_eq!(v.kind, ColumnKind::Text);
        assert_eq!(v.values[0], Scalar::Text("1".to_string()));
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let table = Table::from_csv_str("a,a,,a\n1,2,3,4").unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn test_header_only() {
        let table = Table::from_csv_str("a,b\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
        assert!(table.row(0).is_none());
    }

    #[test]
    fn test_ragged_rows_are_parse_error() {
        let err = Table::from_csv_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = Table::from_csv_str("").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_non_utf8_payload_is_parse_error() {
        let payload = UploadedPayload::new("data:text/csv;base64", vec![0x61, 0x0a, 0xff, 0xfe]);
        let err = Table::from_payload(&payload).unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_decode_table() {
        let raw = UploadedPayload::encode("data:text/csv;base64", b"a,b\n1,2\n3,4\n5,6");
        let table = decode_table(&raw).unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_scalar_labels() {
        assert_eq!(Scalar::Number(3.0).as_label().as_deref(), Some("3"));
        assert_eq!(Scalar::Number(2.5).as_label().as_deref(), Some("2.5"));
        assert_eq!(Scalar::Text("x".into()).as_label().as_deref(), Some("x"));
        assert_eq!(Scalar::Missing.as_label(), None);
    }

    #[test]
    fn test_large_whole_numbers_keep_distinct_labels() {
        let a = Scalar::Number(1e20).as_label().unwrap();
        let b = Scalar::Number(2e20).as_label().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, 1e20_f64.to_string());

        assert_eq!(Scalar::Number(-42.0).as_label().as_deref(), Some("-42"));
        assert_eq!(Scalar::Number(f64::INFINITY).as_label().as_deref(), Some("inf"));
    }

    #[test]
    fn test_scalar_serialization() {
        let json = serde_json::to_string(&vec![
            Scalar::Number(1.5),
            Scalar::Text("a".into()),
            Scalar::Missing,
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"a",null]"#);
    }
}
