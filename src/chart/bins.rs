//! Bin-count control visibility
//!
//! The bin-count input only exists while the chart type is histogram, and
//! comes back at the default value every time it reappears.

use serde::Serialize;

use super::kind::{ChartKind, DEFAULT_BINS};

/// Label shown next to the bin-count input
pub const BINS_LABEL: &str = "Number of Bins:";

/// State of the bin-count input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BinsControl {
    /// Control is absent
    Hidden,
    /// Numeric input holding `value`
    Visible { value: i64 },
}

impl BinsControl {
    /// Decide the control for a chart type
    pub fn for_kind(kind: ChartKind) -> Self {
        if kind == ChartKind::Histogram {
            BinsControl::Visible {
                value: DEFAULT_BINS,
            }
        } else {
            BinsControl::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, BinsControl::Visible { .. })
    }

    /// Current value, if the control is shown
    pub fn value(&self) -> Option<i64> {
        match self {
            BinsControl::Visible { value } => Some(*value),
            BinsControl::Hidden => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_shows_control() {
        let control = BinsControl::for_kind(ChartKind::Histogram);
        assert_eq!(control, BinsControl::Visible { value: 10 });
    }

    #[test]
    fn test_other_kinds_hide_control() {
        for kind in ChartKind::all().iter().filter(|k| **k != ChartKind::Histogram) {
            assert_eq!(BinsControl::for_kind(*kind), BinsControl::Hidden);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(BinsControl::for_kind(ChartKind::Histogram)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "visible", "value": 10}));

        let json = serde_json::to_value(BinsControl::Hidden).unwrap();
        assert_eq!(json, serde_json::json!({"state": "hidden"}));
    }
}
