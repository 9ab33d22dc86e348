//! # Chartdeck
//!
//! A browser dashboard for exploring CSV files: upload a file, preview its
//! first rows, pick columns and a chart type, and render an interactive
//! chart.
//!
//! ## Modules
//!
//! - [`ingest`]: Upload payload decoding and CSV parsing
//! - [`options`]: Preview table and column pickers for an upload
//! - [`chart`]: Chart selection and figure construction
//! - [`session`]: Per-tab reactive state and the session store
//! - [`api`]: HTTP server with Axum
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use chartdeck::chart::{build_chart, ChartKind, ChartSelection};
//! use chartdeck::ingest::Table;
//!
//! let table = Table::from_csv_str("a,b\n1,2\n3,4\n5,6").unwrap();
//! let selection = ChartSelection::new(ChartKind::Line).x("a").y("b");
//!
//! let figure = build_chart(&table, &selection).unwrap();
//! assert_eq!(figure.data.len(), 1);
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod options;
pub mod session;

// Re-export top-level types for convenience
pub use ingest::{decode_table, IngestError, IngestResult, Scalar, Table, UploadedPayload};

pub use options::{ColumnOption, ColumnOptionSet, DataOptions, PreviewTable};

pub use chart::{
    build_chart, derive_chart, BinsControl, ChartError, ChartKind, ChartResult, ChartSelection,
    Figure,
};

pub use session::{Session, SessionInput, SessionOutput, SessionStore, StoreConfig};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, ConfigSource, LoggingConfig};
