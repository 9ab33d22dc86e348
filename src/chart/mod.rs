//! Chartdeck Charts
//!
//! Everything between a user's selection and a renderable chart:
//!
//! - **kind**: chart type tags and the `ChartSelection`
//! - **bins**: bin-count control visibility
//! - **figure**: Plotly-shaped chart specification
//! - **builder**: dispatch from selection + table to figure
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use chartdeck::chart::{build_chart, ChartKind, ChartSelection};
//! use chartdeck::ingest::Table;
//!
//! let table = Table::from_csv_str("a,b\n1,2\n3,4").unwrap();
//! let selection = ChartSelection::new(ChartKind::Line).x("a").y("b");
//! let figure = build_chart(&table, &selection).unwrap();
//!
//! assert_eq!(figure.data.len(), 1);
//! ```

pub mod bins;
pub mod builder;
pub mod error;
pub mod figure;
pub mod kind;

pub use bins::{BinsControl, BINS_LABEL};
pub use builder::{build_chart, derive_chart};
pub use error::{ChartError, ChartResult};
pub use figure::{Axis, Figure, Layout, Legend, Title, Trace, TraceType};
pub use kind::{ChartKind, ChartSelection, DEFAULT_BINS};
