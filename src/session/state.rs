//! Dashboard session
//!
//! Holds one browser tab's state cells and re-runs the derivations that
//! depend on whatever an input just wrote. Callers serialize access (the
//! store wraps each session in a mutex), so every evaluation pass reads a
//! consistent snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use super::cell::{CellName, Derivation, StateCell};
use crate::chart::{derive_chart, BinsControl, ChartKind, ChartSelection, Figure, DEFAULT_BINS};
use crate::ingest::{Table, UploadedPayload};
use crate::options::DataOptions;

/// Unique identifier for a session
pub type SessionId = String;

/// A user action
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// New file: raw `<content-type>,<base64>` string
    Upload { contents: String },
    SetChartType { chart_type: ChartKind },
    SetX { x: Option<String> },
    SetY { y: Vec<String> },
    SetColor { color: Option<String> },
    /// Only accepted while the bin-count control is visible; `None` clears it
    SetBins { bins: Option<i64> },
    /// Generate-chart button press
    Generate,
}

/// A recomputed output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output", content = "value", rename_all = "snake_case")]
pub enum SessionOutput {
    Options(DataOptions),
    BinsControl(BinsControl),
    Figure { clicks: u64, figure: Figure },
}

/// Errors from applying an input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Bin count was set while the chart type is not histogram
    #[error("Bin count control is not shown for {0} charts")]
    BinsHidden(ChartKind),
}

/// Read-only view of a session's state
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub has_data: bool,
    pub selection: ChartSelection,
    pub clicks: u64,
}

/// One dashboard session
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    last_active: Instant,
    contents: StateCell<Option<Arc<UploadedPayload>>>,
    x: StateCell<Option<String>>,
    y: StateCell<Vec<String>>,
    color: StateCell<Option<String>>,
    chart_type: StateCell<ChartKind>,
    bins: StateCell<Option<i64>>,
    clicks: StateCell<u64>,
}

impl Session {
    /// Create an idle session
    pub fn new(id: impl Into<SessionId>) -> Self {
        let chart_type = ChartKind::default();

        Self {
            id: id.into(),
            created_at: Utc::now(),
            last_active: Instant::now(),
            contents: StateCell::new(CellName::Contents, None),
            x: StateCell::new(CellName::X, None),
            y: StateCell::new(CellName::Y, Vec::new()),
            color: StateCell::new(CellName::Color, None),
            chart_type: StateCell::new(CellName::ChartType, chart_type),
            bins: StateCell::new(CellName::Bins, BinsControl::for_kind(chart_type).value()),
            clicks: StateCell::new(CellName::Clicks, 0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Time since the session was last used
    pub fn idle_for(&self) -> std::time::Duration {
        self.last_active.elapsed()
    }

    /// Mark the session as in use without changing any state
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Outputs as they stand on page load
    pub fn initial_outputs(&self) -> Vec<SessionOutput> {
        Derivation::ORDERED
            .into_iter()
            .map(|d| self.evaluate(d))
            .collect()
    }

    /// Apply an input and return every output it triggered
    pub fn dispatch(&mut self, input: SessionInput) -> Result<Vec<SessionOutput>, SessionError> {
        self.touch();
        let written = self.apply(input)?;

        let outputs: Vec<SessionOutput> = Derivation::triggered_by(&written)
            .into_iter()
            .map(|d| self.evaluate(d))
            .collect();

        tracing::debug!(
            session_id = %self.id,
            written = ?written,
            outputs = outputs.len(),
            "Session input applied"
        );

        Ok(outputs)
    }

    /// Write the cells an input touches
    fn apply(&mut self, input: SessionInput) -> Result<Vec<CellName>, SessionError> {
        let written = match input {
            SessionInput::Upload { contents } => self.upload(&contents),
            SessionInput::SetChartType { chart_type } => {
                let previous = *self.chart_type.get();
                let mut written = vec![self.chart_type.set(chart_type)];

                // The control is rebuilt from scratch whenever it reappears
                if chart_type != previous {
                    written.push(self.bins.set(BinsControl::for_kind(chart_type).value()));
                }
                written
            }
            SessionInput::SetX { x } => vec![self.x.set(x)],
            SessionInput::SetY { y } => vec![self.y.set(y)],
            SessionInput::SetColor { color } => vec![self.color.set(color)],
            SessionInput::SetBins { bins } => {
                self.ensure_bins_visible()?;
                vec![self.bins.set(bins)]
            }
            SessionInput::Generate => {
                let clicks = *self.clicks.get() + 1;
                vec![self.clicks.set(clicks)]
            }
        };

        Ok(written)
    }

    /// Store a new upload and drop selections it invalidates
    fn upload(&mut self, contents: &str) -> Vec<CellName> {
        let payload = match UploadedPayload::parse(contents) {
            Ok(payload) => Some(Arc::new(payload)),
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Rejected upload payload");
                None
            }
        };

        let table = payload
            .as_deref()
            .and_then(|p| match Table::from_payload(p) {
                Ok(table) => Some(table),
                Err(e) => {
                    tracing::warn!(session_id = %self.id, error = %e, "Upload is not readable CSV");
                    None
                }
            });

        // An unreadable file leaves the session without data
        let payload = payload.filter(|_| table.is_some());

        let columns: Vec<String> = table
            .map(|t| t.column_names().into_iter().map(String::from).collect())
            .unwrap_or_default();

        let mut written = vec![self.contents.set(payload)];

        if self.x.get().as_ref().is_some_and(|x| !columns.contains(x)) {
            written.push(self.x.set(None));
        }
        if self.y.get().iter().any(|y| !columns.contains(y)) {
            let kept: Vec<String> = self
                .y
                .get()
                .iter()
                .filter(|y| columns.contains(*y))
                .cloned()
                .collect();
            written.push(self.y.set(kept));
        }
        if self.color.get().as_ref().is_some_and(|c| !columns.contains(c)) {
            written.push(self.color.set(None));
        }

        written
    }

    /// Fail unless the bin-count control is currently shown
    pub fn ensure_bins_visible(&self) -> Result<(), SessionError> {
        let kind = *self.chart_type.get();
        if BinsControl::for_kind(kind).is_visible() {
            Ok(())
        } else {
            Err(SessionError::BinsHidden(kind))
        }
    }

    /// The bin-count control as the page shows it
    ///
    /// A cleared value displays as the default.
    pub fn bins_control(&self) -> BinsControl {
        if BinsControl::for_kind(*self.chart_type.get()).is_visible() {
            BinsControl::Visible {
                value: (*self.bins.get()).unwrap_or(DEFAULT_BINS),
            }
        } else {
            BinsControl::Hidden
        }
    }

    /// Current selection as one consistent snapshot
    pub fn selection(&self) -> ChartSelection {
        ChartSelection {
            x: self.x.get().clone(),
            y: self.y.get().clone(),
            color: self.color.get().clone(),
            kind: *self.chart_type.get(),
            bins: *self.bins.get(),
        }
    }

    /// Re-run one derivation against the current cells
    fn evaluate(&self, derivation: Derivation) -> SessionOutput {
        match derivation {
            Derivation::Options => {
                let table = self.contents.get().as_deref().and_then(|payload| {
                    Table::from_payload(payload)
                        .map_err(|e| {
                            tracing::warn!(session_id = %self.id, error = %e, "Upload is not readable CSV");
                        })
                        .ok()
                });
                SessionOutput::Options(DataOptions::derive(table.as_ref()))
            }
            Derivation::BinsControl => SessionOutput::BinsControl(self.bins_control()),
            Derivation::Figure => {
                tracing::debug!(
                    session_id = %self.id,
                    reads = ?derivation.reads(),
                    "Deriving figure"
                );
                let figure = derive_chart(self.contents.get().as_deref(), &self.selection());
                SessionOutput::Figure {
                    clicks: *self.clicks.get(),
                    figure,
                }
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            has_data: self.contents.get().is_some(),
            selection: self.selection(),
            clicks: *self.clicks.get(),
        }
    }
}
