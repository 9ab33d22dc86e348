//! Chart construction
//!
//! Dispatches on the chart type and turns table columns into traces.
//! `derive_chart` is the entry point the dashboard uses: it never fails and
//! falls back to the empty figure whenever inputs are missing or invalid.

use std::collections::HashMap;

use super::error::{ChartError, ChartResult};
use super::figure::{Figure, Layout, Trace, TraceType};
use super::kind::{ChartKind, ChartSelection};
use crate::ingest::{Column, Scalar, Table, UploadedPayload};

/// Derive a figure from the current payload and selection
///
/// No payload or no x-axis gives the empty figure. Every other failure is
/// logged and also gives the empty figure.
pub fn derive_chart(payload: Option<&UploadedPayload>, selection: &ChartSelection) -> Figure {
    let Some(payload) = payload else {
        return Figure::empty();
    };
    if selection.x.is_none() {
        return Figure::empty();
    }

    let result = Table::from_payload(payload)
        .map_err(ChartError::from)
        .and_then(|table| build_chart(&table, selection));

    match result {
        Ok(figure) => figure,
        Err(e) => {
            tracing::warn!(chart_type = %selection.kind, error = %e, "Falling back to empty chart");
            Figure::empty()
        }
    }
}

/// Build a figure for a selection over a table
pub fn build_chart(table: &Table, selection: &ChartSelection) -> ChartResult<Figure> {
    let kind = selection.kind;

    let x_name = selection
        .x
        .as_deref()
        .ok_or_else(|| ChartError::SelectionIncomplete {
            kind,
            missing: "x-axis column".to_string(),
        })?;
    let x = lookup(table, x_name)?;

    if kind.needs_y() && selection.y.is_empty() {
        return Err(ChartError::SelectionIncomplete {
            kind,
            missing: "at least one y-axis column".to_string(),
        });
    }

    let ys = selection
        .y
        .iter()
        .map(|name| lookup(table, name))
        .collect::<ChartResult<Vec<_>>>()?;

    let figure = match kind {
        ChartKind::Histogram => {
            let color = selection
                .color
                .as_deref()
                .map(|name| lookup(table, name))
                .transpose()?;
            histogram(x, color, selection.resolved_bins())
        }
        ChartKind::Scatter => series(x, &ys, |_| {
            Trace::new(TraceType::Scatter).mode("markers")
        }),
        ChartKind::Line => series(x, &ys, |_| Trace::new(TraceType::Scatter).mode("lines")),
        ChartKind::Bar => {
            let mut figure = series(x, &ys, |_| Trace::new(TraceType::Bar).opacity(1.0));
            figure.layout.barmode = Some("relative");
            figure
        }
        ChartKind::Box => {
            let mut figure = series(x, &ys, |_| Trace::new(TraceType::Box));
            figure.layout.boxmode = Some("group");
            figure
        }
        ChartKind::Violin => {
            let mut figure = series(x, &ys, |_| Trace::new(TraceType::Violin));
            figure.layout.violinmode = Some("group");
            figure
        }
        ChartKind::Heatmap => density_heatmap(x, &ys),
        // Only the first y column forms the second level
        ChartKind::Sunburst => sunburst(x, ys[0]),
    };

    tracing::debug!(
        chart_type = %kind,
        traces = figure.data.len(),
        "Built chart"
    );

    Ok(figure)
}

fn lookup<'a>(table: &'a Table, name: &str) -> ChartResult<&'a Column> {
    table
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

/// Y-axis title: the column itself, or "value" for several
fn value_title(ys: &[&Column]) -> String {
    match ys {
        [single] => single.name.clone(),
        _ => "value".to_string(),
    }
}

/// One trace per y column, sharing the x column
fn series(x: &Column, ys: &[&Column], make: impl Fn(&Column) -> Trace) -> Figure {
    let data = ys
        .iter()
        .map(|&y| {
            make(y)
                .name(y.name.clone())
                .x(x.values.clone())
                .y(y.values.clone())
        })
        .collect();

    let mut layout = Layout::default()
        .x_title(x.name.clone())
        .y_title(value_title(ys));
    if ys.len() > 1 {
        layout = layout.legend_title("variable");
    }

    Figure::new(data, layout)
}

/// Histogram of x, split into one trace per color value
fn histogram(x: &Column, color: Option<&Column>, bins: i64) -> Figure {
    let layout = Layout::default().x_title(x.name.clone()).y_title("count");

    let Some(color) = color else {
        let trace = Trace::new(TraceType::Histogram)
            .x(x.values.clone())
            .nbinsx(bins);
        return Figure::new(vec![trace], layout);
    };

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Scalar>> = HashMap::new();

    for (value, key) in x.values.iter().zip(&color.values) {
        let Some(label) = key.as_label() else {
            continue;
        };
        groups
            .entry(label.clone())
            .or_insert_with(|| {
                order.push(label);
                Vec::new()
            })
            .push(value.clone());
    }

    let data = order
        .into_iter()
        .map(|label| {
            let values = groups.remove(&label).unwrap_or_default();
            Trace::new(TraceType::Histogram)
                .name(label)
                .x(values)
                .nbinsx(bins)
        })
        .collect();

    Figure::new(data, layout.legend_title(color.name.clone()))
}

/// 2D density of x against the y columns melted into one series
fn density_heatmap(x: &Column, ys: &[&Column]) -> Figure {
    let mut xs = Vec::with_capacity(x.len() * ys.len());
    let mut values = Vec::with_capacity(x.len() * ys.len());

    for y in ys {
        xs.extend(x.values.iter().cloned());
        values.extend(y.values.iter().cloned());
    }

    let trace = Trace::new(TraceType::Histogram2d).x(xs).y(values);
    let layout = Layout::default()
        .x_title(x.name.clone())
        .y_title(value_title(ys));

    Figure::new(vec![trace], layout)
}

/// Two-level hierarchy counting rows per (outer, inner) path
fn sunburst(outer: &Column, inner: &Column) -> Figure {
    let mut parents_order: Vec<String> = Vec::new();
    let mut leaves: Vec<(String, String)> = Vec::new();
    let mut counts: HashMap<(String, String), f64> = HashMap::new();

    for (a, b) in outer.values.iter().zip(&inner.values) {
        let (Some(a), Some(b)) = (a.as_label(), b.as_label()) else {
            continue;
        };
        if !parents_order.contains(&a) {
            parents_order.push(a.clone());
        }
        let key = (a, b);
        if !counts.contains_key(&key) {
            leaves.push(key.clone());
        }
        *counts.entry(key).or_insert(0.0) += 1.0;
    }

    let mut trace = Trace::new(TraceType::Sunburst);
    let mut ids = Vec::new();
    let mut labels = Vec::new();
    let mut parents = Vec::new();
    let mut values = Vec::new();

    for (a, b) in &leaves {
        ids.push(format!("{}/{}", a, b));
        labels.push(b.clone());
        parents.push(a.clone());
        values.push(counts[&(a.clone(), b.clone())]);
    }

    for a in &parents_order {
        let total: f64 = leaves
            .iter()
            .filter(|(p, _)| p == a)
            .map(|k| counts[k])
            .sum();
        ids.push(a.clone());
        labels.push(a.clone());
        parents.push(String::new());
        values.push(total);
    }

    trace.ids = Some(ids);
    trace.labels = Some(labels);
    trace.parents = Some(parents);
    trace.values = Some(values);
    trace.branchvalues = Some("total");

    Figure::new(vec![trace], Layout::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "region,product,units,price\n\
                         north,apple,3,1.5\n\
                         north,pear,5,2.0\n\
                         south,apple,2,1.5\n\
                         north,apple,4,1.25\n";

    fn sales() -> Table {
        Table::from_csv_str(SALES).unwrap()
    }

    fn payload(csv: &str) -> UploadedPayload {
        UploadedPayload::new("data:text/csv;base64", csv.as_bytes().to_vec())
    }

    #[test]
    fn test_no_payload_is_empty_for_every_kind() {
        for kind in ChartKind::all() {
            let sel = ChartSelection::new(*kind).x("units").y("price").color("region");
            assert!(derive_chart(None, &sel).is_empty());
        }
    }

    #[test]
    fn test_missing_x_is_empty() {
        let sel = ChartSelection::new(ChartKind::Scatter).y("price");
        assert!(derive_chart(Some(&payload(SALES)), &sel).is_empty());
    }

    #[test]
    fn test_unparseable_payload_is_empty() {
        let sel = ChartSelection::new(ChartKind::Histogram).x("a");
        assert!(derive_chart(Some(&payload("a,b\n1\n")), &sel).is_empty());
    }

    #[test]
    fn test_scatter_one_trace_per_y() {
        let sel = ChartSelection::new(ChartKind::Scatter)
            .x("units")
            .y("price")
            .y("units");
        let fig = build_chart(&sales(), &sel).unwrap();

        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0].name.as_deref(), Some("price"));
        assert_eq!(fig.data[0].mode, Some("markers"));
        assert_eq!(fig.data[0].x.as_ref().unwrap().len(), 4);
        assert_eq!(fig.layout.yaxis.as_ref().unwrap().title.text, "value");
        assert_eq!(fig.layout.legend.as_ref().unwrap().title.text, "variable");
    }

    #[test]
    fn test_line_and_bar() {
        let line = build_chart(
            &sales(),
            &ChartSelection::new(ChartKind::Line).x("units").y("price"),
        )
        .unwrap();
        assert_eq!(line.data[0].mode, Some("lines"));
        assert_eq!(line.layout.yaxis.as_ref().unwrap().title.text, "price");

        let bar = build_chart(
            &sales(),
            &ChartSelection::new(ChartKind::Bar).x("region").y("units"),
        )
        .unwrap();
        assert_eq!(bar.data[0].trace_type, TraceType::Bar);
        assert_eq!(bar.data[0].opacity, Some(1.0));
    }

    #[test]
    fn test_kinds_needing_y_fail_without_it() {
        for kind in ChartKind::all().iter().filter(|k| k.needs_y()) {
            let sel = ChartSelection::new(*kind).x("units");
            let err = build_chart(&sales(), &sel).unwrap_err();
            assert!(matches!(err, ChartError::SelectionIncomplete { .. }));
            assert!(derive_chart(Some(&payload(SALES)), &sel).is_empty());
        }
    }

    #[test]
    fn test_histogram_default_bins() {
        let sel = ChartSelection::new(ChartKind::Histogram).x("units");
        let fig = derive_chart(Some(&payload(SALES)), &sel);

        assert_eq!(fig.data.len(), 1);
        assert_eq!(fig.data[0].nbinsx, Some(10));
        assert_eq!(fig.data[0].trace_type, TraceType::Histogram);
    }

    #[test]
    fn test_histogram_custom_and_negative_bins() {
        let sel = ChartSelection::new(ChartKind::Histogram).x("units").bins(4);
        assert_eq!(build_chart(&sales(), &sel).unwrap().data[0].nbinsx, Some(4));

        let sel = ChartSelection::new(ChartKind::Histogram).x("units").bins(-2);
        assert_eq!(build_chart(&sales(), &sel).unwrap().data[0].nbinsx, Some(-2));
    }

    #[test]
    fn test_histogram_split_by_color() {
        let sel = ChartSelection::new(ChartKind::Histogram)
            .x("units")
            .color("region");
        let fig = build_chart(&sales(), &sel).unwrap();

        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0].name.as_deref(), Some("north"));
        assert_eq!(fig.data[0].x.as_ref().unwrap().len(), 3);
        assert_eq!(fig.data[1].name.as_deref(), Some("south"));
        assert_eq!(fig.layout.legend.as_ref().unwrap().title.text, "region");
    }

    #[test]
    fn test_histogram_large_color_values_stay_separate() {
        let table = Table::from_csv_str("v,id\n1,1e20\n2,2e20\n3,1e20\n").unwrap();
        let sel = ChartSelection::new(ChartKind::Histogram).x("v").color("id");
        let fig = build_chart(&table, &sel).unwrap();

        assert_eq!(fig.data.len(), 2);
        assert_ne!(fig.data[0].name, fig.data[1].name);
    }

    #[test]
    fn test_heatmap_melts_y_columns() {
        let sel = ChartSelection::new(ChartKind::Heatmap)
            .x("units")
            .y("price")
            .y("units");
        let fig = build_chart(&sales(), &sel).unwrap();

        assert_eq!(fig.data.len(), 1);
        assert_eq!(fig.data[0].trace_type, TraceType::Histogram2d);
        assert_eq!(fig.data[0].x.as_ref().unwrap().len(), 8);
        assert_eq!(fig.data[0].y.as_ref().unwrap().len(), 8);
    }

    #[test]
    fn test_sunburst_uses_first_y_only() {
        let sel = ChartSelection::new(ChartKind::Sunburst)
            .x("region")
            .y("product")
            .y("units");
        let fig = build_chart(&sales(), &sel).unwrap();
        let trace = &fig.data[0];

        let ids = trace.ids.as_ref().unwrap();
        assert_eq!(
            ids,
            &vec!["north/apple", "north/pear", "south/apple", "north", "south"]
        );
        assert_eq!(trace.values.as_ref().unwrap(), &vec![2.0, 1.0, 1.0, 3.0, 1.0]);
        assert_eq!(trace.parents.as_ref().unwrap()[0], "north");
        assert_eq!(trace.parents.as_ref().unwrap()[3], "");
    }

    #[test]
    fn test_unknown_column() {
        let sel = ChartSelection::new(ChartKind::Scatter).x("nope").y("price");
        let err = build_chart(&sales(), &sel).unwrap_err();
        assert_eq!(err, ChartError::UnknownColumn("nope".to_string()));
    }

    #[test]
    fn test_box_and_violin_modes() {
        let sel = ChartSelection::new(ChartKind::Box).x("region").y("units");
        assert_eq!(build_chart(&sales(), &sel).unwrap().layout.boxmode, Some("group"));

        let sel = ChartSelection::new(ChartKind::Violin).x("region").y("units");
        let fig = build_chart(&sales(), &sel).unwrap();
        assert_eq!(fig.data[0].trace_type, TraceType::Violin);
        assert_eq!(fig.layout.violinmode, Some("group"));
    }
}
