//! Named state cells and the dependency table between them
//!
//! Every piece of dashboard state lives in a `StateCell`. A derivation is
//! re-evaluated when one of its trigger cells is written; the other cells
//! it reads are plain state and never trigger anything on their own.

use serde::Serialize;

/// Names of the session's state cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellName {
    Contents,
    X,
    Y,
    Color,
    ChartType,
    Bins,
    Clicks,
}

/// A value plus a version bumped on every write
#[derive(Debug, Clone)]
pub struct StateCell<T> {
    name: CellName,
    value: T,
    version: u64,
}

impl<T> StateCell<T> {
    pub fn new(name: CellName, value: T) -> Self {
        Self {
            name,
            value,
            version: 0,
        }
    }

    pub fn name(&self) -> CellName {
        self.name
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value and return the cell's name for change tracking
    pub fn set(&mut self, value: T) -> CellName {
        self.value = value;
        self.version += 1;
        self.name
    }
}

/// Outputs computed from cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// Preview, column options and caption
    Options,
    /// Bin-count control
    BinsControl,
    /// Chart figure
    Figure,
}

impl Derivation {
    /// All derivations in evaluation order
    pub const ORDERED: [Derivation; 3] = [
        Derivation::Options,
        Derivation::BinsControl,
        Derivation::Figure,
    ];

    /// Cells whose writes re-run this derivation
    pub fn triggers(&self) -> &'static [CellName] {
        match self {
            Derivation::Options => &[CellName::Contents],
            Derivation::BinsControl => &[CellName::ChartType],
            Derivation::Figure => &[CellName::Clicks],
        }
    }

    /// Cells read as plain state during evaluation
    pub fn reads(&self) -> &'static [CellName] {
        match self {
            Derivation::Options => &[],
            Derivation::BinsControl => &[],
            Derivation::Figure => &[
                CellName::Contents,
                CellName::X,
                CellName::Y,
                CellName::Color,
                CellName::ChartType,
                CellName::Bins,
            ],
        }
    }

    /// Derivations triggered by a set of written cells, in evaluation order
    pub fn triggered_by(written: &[CellName]) -> Vec<Derivation> {
        Self::ORDERED
            .into_iter()
            .filter(|d| d.triggers().iter().any(|c| written.contains(c)))
            .collect()
    }
}
