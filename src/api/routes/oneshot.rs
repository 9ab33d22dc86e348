//! One-shot Routes
//!
//! Stateless forms of the dashboard derivations, for scripts and tests
//! that already hold the whole selection.
//!
//! - POST /api/v1/preview - Preview and pickers for an upload
//! - POST /api/v1/chart - Chart for an upload plus a selection
//! - GET /api/v1/chart-types - Chart type picker contents

use axum::Json;

use crate::api::dto::{ChartRequest, ChartTypesResponse, PreviewRequest};
use crate::chart::{derive_chart, Figure};
use crate::ingest::UploadedPayload;
use crate::options::DataOptions;

/// POST /api/v1/preview
pub async fn preview(Json(req): Json<PreviewRequest>) -> Json<DataOptions> {
    Json(DataOptions::from_contents(req.contents.as_deref()))
}

/// POST /api/v1/chart
///
/// Always succeeds; anything unusable yields the empty figure.
pub async fn chart(Json(req): Json<ChartRequest>) -> Json<Figure> {
    let payload = req
        .contents
        .as_deref()
        .filter(|c| !c.is_empty())
        .and_then(|contents| match UploadedPayload::parse(contents) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected upload payload");
                None
            }
        });

    Json(derive_chart(payload.as_ref(), &req.selection))
}

/// GET /api/v1/chart-types
pub async fn chart_types() -> Json<ChartTypesResponse> {
    Json(ChartTypesResponse::all())
}
