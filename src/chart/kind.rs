//! Chart types and user selections

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of histogram bins
pub const DEFAULT_BINS: i64 = 10;

/// Chart type tag
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Scatter,
    Line,
    Bar,
    Histogram,
    Box,
    Violin,
    Heatmap,
    Sunburst,
}

impl ChartKind {
    /// All chart types, in picker order
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Scatter,
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Histogram,
            ChartKind::Box,
            ChartKind::Violin,
            ChartKind::Heatmap,
            ChartKind::Sunburst,
        ]
    }

    /// Label shown in the chart type picker
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Box => "Box Plot",
            ChartKind::Violin => "Violin Plot",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Sunburst => "Sunburst",
        }
    }

    /// Lowercase tag used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
            ChartKind::Violin => "violin",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Sunburst => "sunburst",
        }
    }

    /// Whether at least one y-axis column is required
    pub fn needs_y(&self) -> bool {
        !matches!(self, ChartKind::Histogram)
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::all()
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown chart type: {}", s))
    }
}

/// The user's current choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSelection {
    /// X-axis column (required)
    #[serde(default)]
    pub x: Option<String>,
    /// Y-axis columns
    #[serde(default)]
    pub y: Vec<String>,
    /// Color column
    #[serde(default)]
    pub color: Option<String>,
    /// Chart type
    #[serde(default, rename = "chart_type")]
    pub kind: ChartKind,
    /// Histogram bin count
    #[serde(default)]
    pub bins: Option<i64>,
}

impl ChartSelection {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Builder method: set x-axis column
    pub fn x(mut self, column: impl Into<String>) -> Self {
        self.x = Some(column.into());
        self
    }

    /// Builder method: add a y-axis column
    pub fn y(mut self, column: impl Into<String>) -> Self {
        self.y.push(column.into());
        self
    }

    /// Builder method: set color column
    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    /// Builder method: set bin count
    pub fn bins(mut self, bins: i64) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Effective histogram bin count
    ///
    /// Unset or zero means the default; other values pass through unchecked.
    pub fn resolved_bins(&self) -> i64 {
        match self.bins {
            Some(b) if b != 0 => b,
            _ => DEFAULT_BINS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ChartKind::all() {
            assert_eq!(kind.as_str().parse::<ChartKind>().unwrap(), *kind);
        }
        assert_eq!(ChartKind::all().len(), 8);
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ChartKind::Histogram).unwrap();
        assert_eq!(json, r#""histogram""#);

        let kind: ChartKind = serde_json::from_str(r#""sunburst""#).unwrap();
        assert_eq!(kind, ChartKind::Sunburst);
    }

    #[test]
    fn test_resolved_bins() {
        let sel = ChartSelection::new(ChartKind::Histogram);
        assert_eq!(sel.resolved_bins(), 10);
        assert_eq!(sel.clone().bins(0).resolved_bins(), 10);
        assert_eq!(sel.clone().bins(25).resolved_bins(), 25);
        assert_eq!(sel.bins(-3).resolved_bins(), -3);
    }

    #[test]
    fn test_selection_defaults_from_json() {
        let sel: ChartSelection = serde_json::from_str(r#"{"x": "a"}"#).unwrap();
        assert_eq!(sel.x.as_deref(), Some("a"));
        assert!(sel.y.is_empty());
        assert_eq!(sel.kind, ChartKind::Scatter);
    }
}
