//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::chart::{BinsControl, ChartKind, ChartSelection, Figure, BINS_LABEL};
use crate::options::DataOptions;

// ============================================
// SESSION DTOs
// ============================================

/// Response to opening a dashboard session
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    /// ID to use in subsequent session requests
    pub session_id: String,
    /// When the session was opened
    pub created_at: DateTime<Utc>,
    /// Idle preview and pickers
    pub options: DataOptions,
    /// Bin-count control for the default chart type
    pub bins: BinsControlResponse,
    /// Initial (empty) chart
    pub figure: Figure,
}

/// File upload request
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Raw `<content-type>,<base64 data>` string
    #[serde(default)]
    pub contents: Option<String>,
    /// Original file name, for logging only
    #[serde(default)]
    pub filename: Option<String>,
}

/// Chart type change request
#[derive(Debug, Deserialize)]
pub struct ChartTypeRequest {
    pub chart_type: ChartKind,
}

/// Current column selections
///
/// Replaces x, y and color wholesale. `bins` is applied only when the
/// field is present; an explicit `null` clears it back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub bins: Option<Option<i64>>,
}

/// Wrap a present field in `Some`, keeping `null` apart from absent
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Bin-count control state plus its label
#[derive(Debug, Serialize, PartialEq)]
pub struct BinsControlResponse {
    #[serde(flatten)]
    pub control: BinsControl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
}

impl From<BinsControl> for BinsControlResponse {
    fn from(control: BinsControl) -> Self {
        let label = control.is_visible().then_some(BINS_LABEL);
        Self { control, label }
    }
}

/// Chart generation response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Number of generate presses in this session
    pub clicks: u64,
    pub figure: Figure,
}

// ============================================
// STATELESS DTOs
// ============================================

/// One-shot preview request
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub contents: Option<String>,
}

/// One-shot chart request
#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    /// Raw `<content-type>,<base64 data>` string
    #[serde(default)]
    pub contents: Option<String>,
    /// Columns, chart type and bins
    #[serde(flatten)]
    pub selection: ChartSelection,
}

// ============================================
// CHART TYPE DTOs
// ============================================

/// Entry of the chart type picker
#[derive(Debug, Serialize)]
pub struct ChartTypeOption {
    pub label: &'static str,
    pub value: ChartKind,
}

/// Chart type picker contents
#[derive(Debug, Serialize)]
pub struct ChartTypesResponse {
    pub chart_types: Vec<ChartTypeOption>,
    pub default: ChartKind,
}

impl ChartTypesResponse {
    pub fn all() -> Self {
        Self {
            chart_types: ChartKind::all()
                .iter()
                .map(|kind| ChartTypeOption {
                    label: kind.label(),
                    value: *kind,
                })
                .collect(),
            default: ChartKind::default(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Number of live sessions
    pub sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
