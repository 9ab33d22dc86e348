//! Session Routes
//!
//! The dashboard's interactive flow, one session per browser tab.
//!
//! - POST /api/v1/sessions - Open a session
//! - GET /api/v1/sessions/:id - Inspect a session
//! - DELETE /api/v1/sessions/:id - Close a session
//! - POST /api/v1/sessions/:id/upload - Upload a CSV file
//! - PUT /api/v1/sessions/:id/chart-type - Change chart type
//! - PUT /api/v1/sessions/:id/selection - Change column selections
//! - POST /api/v1/sessions/:id/generate - Generate the chart

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    BinsControlResponse, ChartTypeRequest, GenerateResponse, SelectionRequest,
    SessionCreatedResponse, UploadRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::chart::{BinsControl, Figure};
use crate::options::DataOptions;
use crate::session::{SessionInput, SessionOutput, SessionSnapshot};

/// POST /api/v1/sessions
///
/// Open a session and return what the page shows on load.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SessionCreatedResponse>)> {
    let (session_id, handle) = state.sessions.create().await?;
    let session = handle.lock().await;

    let mut options = DataOptions::default();
    let mut bins = BinsControl::Hidden;
    let mut figure = Figure::empty();

    for output in session.initial_outputs() {
        match output {
            SessionOutput::Options(o) => options = o,
            SessionOutput::BinsControl(b) => bins = b,
            SessionOutput::Figure { figure: f, .. } => figure = f,
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id,
            created_at: session.snapshot().created_at,
            options,
            bins: bins.into(),
            figure,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    let handle = state.sessions.get(&id).await?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session '{}' not found", id)))
    }
}

/// POST /api/v1/sessions/:id/upload
///
/// Store the upload and return the preview and pickers. An unreadable file
/// gives the idle (empty) outputs, not an error.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> ApiResult<Json<DataOptions>> {
    let Json(req) = body?;
    tracing::info!(
        session_id = %id,
        filename = req.filename.as_deref().unwrap_or("-"),
        bytes = req.contents.as_deref().map(str::len).unwrap_or(0),
        "Upload received"
    );

    let outputs = dispatch(
        &state,
        &id,
        SessionInput::Upload {
            contents: req.contents.unwrap_or_default(),
        },
    )
    .await?;

    let options = outputs
        .into_iter()
        .find_map(|o| match o {
            SessionOutput::Options(options) => Some(options),
            _ => None,
        })
        .unwrap_or_default();

    Ok(Json(options))
}

/// PUT /api/v1/sessions/:id/chart-type
///
/// Returns the bin-count control for the new chart type.
pub async fn set_chart_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<ChartTypeRequest>, JsonRejection>,
) -> ApiResult<Json<BinsControlResponse>> {
    let Json(req) = body?;
    let outputs = dispatch(
        &state,
        &id,
        SessionInput::SetChartType {
            chart_type: req.chart_type,
        },
    )
    .await?;

    let control = match outputs.into_iter().find_map(|o| match o {
        SessionOutput::BinsControl(control) => Some(control),
        _ => None,
    }) {
        Some(control) => control,
        // Same chart type re-selected: control is unchanged
        None => current_bins(&state, &id).await?,
    };

    Ok(Json(control.into()))
}

/// PUT /api/v1/sessions/:id/selection
pub async fn set_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<SelectionRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = body?;
    let handle = state.sessions.get(&id).await?;
    let mut session = handle.lock().await;

    // Reject before writing so a refused request changes nothing
    if req.bins.is_some() {
        session.ensure_bins_visible()?;
    }

    session.dispatch(SessionInput::SetX { x: req.x })?;
    session.dispatch(SessionInput::SetY { y: req.y })?;
    session.dispatch(SessionInput::SetColor { color: req.color })?;
    if let Some(bins) = req.bins {
        session.dispatch(SessionInput::SetBins { bins })?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<GenerateResponse>> {
    let outputs = dispatch(&state, &id, SessionInput::Generate).await?;

    outputs
        .into_iter()
        .find_map(|o| match o {
            SessionOutput::Figure { clicks, figure } => Some(GenerateResponse { clicks, figure }),
            _ => None,
        })
        .map(Json)
        .ok_or_else(|| ApiError::Internal("Generate produced no figure".to_string()))
}

/// Apply one input to a session under its lock
async fn dispatch(
    state: &AppState,
    id: &str,
    input: SessionInput,
) -> ApiResult<Vec<SessionOutput>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    Ok(session.dispatch(input)?)
}

async fn current_bins(state: &AppState, id: &str) -> ApiResult<BinsControl> {
    let handle = state.sessions.get(id).await?;
    let control = handle.lock().await.bins_control();
    Ok(control)
}
