//! Chart specification
//!
//! A declarative figure in Plotly.js shape (`{data: [...], layout: {...}}`).
//! Rendering it is the page's job.

use serde::Serialize;

use crate::ingest::Scalar;

/// Plotly trace type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Scatter,
    Bar,
    Histogram,
    Box,
    Violin,
    Histogram2d,
    Sunburst,
}

/// One series of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbinsx: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branchvalues: Option<&'static str>,
}

impl Trace {
    /// Create an empty trace of the given type
    pub fn new(trace_type: TraceType) -> Self {
        Self {
            trace_type,
            name: None,
            mode: None,
            x: None,
            y: None,
            nbinsx: None,
            opacity: None,
            ids: None,
            labels: None,
            parents: None,
            values: None,
            branchvalues: None,
        }
    }

    /// Builder method: set series name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: set scatter drawing mode
    pub fn mode(mut self, mode: &'static str) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builder method: set x values
    pub fn x(mut self, values: Vec<Scalar>) -> Self {
        self.x = Some(values);
        self
    }

    /// Builder method: set y values
    pub fn y(mut self, values: Vec<Scalar>) -> Self {
        self.y = Some(values);
        self
    }

    /// Builder method: set histogram bin count
    pub fn nbinsx(mut self, bins: i64) -> Self {
        self.nbinsx = Some(bins);
        self
    }

    /// Builder method: set opacity
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// Text wrapper used by Plotly titles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    pub text: String,
}

/// Axis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title { text: text.into() },
        }
    }
}

/// Legend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub title: Title,
}

/// Figure layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violinmode: Option<&'static str>,
}

impl Layout {
    /// Builder method: set x-axis title
    pub fn x_title(mut self, text: impl Into<String>) -> Self {
        self.xaxis = Some(Axis::titled(text));
        self
    }

    /// Builder method: set y-axis title
    pub fn y_title(mut self, text: impl Into<String>) -> Self {
        self.yaxis = Some(Axis::titled(text));
        self
    }

    /// Builder method: set legend title
    pub fn legend_title(mut self, text: impl Into<String>) -> Self {
        self.legend = Some(Legend {
            title: Title { text: text.into() },
        });
        self
    }
}

/// A complete chart specification
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// The default empty chart
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_figure_json() {
        let json = serde_json::to_value(Figure::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"data": [], "layout": {}}));
    }

    #[test]
    fn test_trace_skips_unset_fields() {
        let trace = Trace::new(TraceType::Histogram)
            .x(vec![Scalar::Number(1.0)])
            .nbinsx(10);
        let json = serde_json::to_value(trace).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "histogram", "x": [1.0], "nbinsx": 10})
        );
    }
}
