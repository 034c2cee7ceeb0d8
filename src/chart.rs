//! Chart selection and SVG rendering for numeric columns.
//!
//! [`visualize`] is the whole visualization step: it resolves a [`ChartRequest`] against the
//! current table, renders the chart when the selection allows it, and always computes
//! [`describe`] statistics when the table has numeric columns.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use plotters::prelude::*;
use serde::Serialize;

use crate::error::{SweepError, SweepResult};
use crate::processing::{describe, ColumnStatistics};
use crate::types::DataSet;

/// Warning shown when the table has nothing to plot.
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns found in the dataset for visualization";

/// Warning shown when a scatter plot has fewer than two columns.
pub const SCATTER_NEEDS_TWO: &str = "Please select at least 2 columns for scatter plot";

const CHART_SIZE: (u32, u32) = (800, 480);

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bar => f.write_str("Bar Chart"),
            Self::Line => f.write_str("Line Chart"),
            Self::Scatter => f.write_str("Scatter Plot"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "scatter" => Ok(Self::Scatter),
            other => Err(format!("unknown chart kind '{other}' (expected bar, line or scatter)")),
        }
    }
}

/// The user's chart choice before it is checked against the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    /// Numeric columns to plot; `None` means the first two numeric columns.
    pub columns: Option<Vec<String>>,
}

/// A validated chart: kind plus numeric column names present in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub columns: Vec<String>,
}

/// Rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    #[serde(skip)]
    pub svg: String,
}

/// Outcome of the visualization step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Visualization {
    pub chart: Option<RenderedChart>,
    pub warnings: Vec<String>,
    pub statistics: Vec<ColumnStatistics>,
}

/// What a request resolves to against a particular table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartPlan {
    /// The table has no numeric columns.
    NoNumericColumns,
    /// The selection is empty; nothing to draw.
    Empty,
    /// Scatter with fewer than two columns.
    ScatterNeedsTwo,
    Draw(ChartSpec),
}

/// Resolve `request` against the numeric columns of `dataset`.
///
/// Names that are not numeric columns of the table are rejected with
/// [`SweepError::UnknownColumn`]. Scatter plots use only the first two columns.
pub fn plan_chart(dataset: &DataSet, request: &ChartRequest) -> SweepResult<ChartPlan> {
    let numeric: Vec<&str> = dataset
        .schema
        .numeric_indexes()
        .into_iter()
        .map(|i| dataset.schema.fields[i].name.as_str())
        .collect();
    if numeric.is_empty() {
        return Ok(ChartPlan::NoNumericColumns);
    }

    let mut columns: Vec<String> = match &request.columns {
        None => numeric.iter().take(2).map(|s| s.to_string()).collect(),
        Some(names) => {
            if let Some(bad) = names.iter().find(|n| !numeric.contains(&n.as_str())) {
                return Err(SweepError::UnknownColumn { column: bad.clone() });
            }
            names.clone()
        }
    };

    if columns.is_empty() {
        return Ok(ChartPlan::Empty);
    }
    if request.kind == ChartKind::Scatter {
        if columns.len() < 2 {
            return Ok(ChartPlan::ScatterNeedsTwo);
        }
        columns.truncate(2);
    }

    Ok(ChartPlan::Draw(ChartSpec {
        kind: request.kind,
        columns,
    }))
}

/// Run the visualization step on the current table. Never mutates `dataset`.
pub fn visualize(dataset: &DataSet, request: &ChartRequest) -> SweepResult<Visualization> {
    let mut out = Visualization::default();
    match plan_chart(dataset, request)? {
        ChartPlan::NoNumericColumns => {
            out.warnings.push(NO_NUMERIC_COLUMNS.to_string());
            return Ok(out);
        }
        ChartPlan::Empty => {}
        ChartPlan::ScatterNeedsTwo => out.warnings.push(SCATTER_NEEDS_TWO.to_string()),
        ChartPlan::Draw(spec) => {
            let svg = render_svg(dataset, &spec)?;
            out.chart = Some(RenderedChart { spec, svg });
        }
    }
    out.statistics = describe(dataset);
    Ok(out)
}

fn chart_err<E: fmt::Display>(e: E) -> SweepError {
    SweepError::Chart {
        message: e.to_string(),
    }
}

/// Per-column `(row index, value)` points, skipping missing cells.
fn series(dataset: &DataSet, spec: &ChartSpec) -> SweepResult<Vec<(String, Vec<(f64, f64)>)>> {
    spec.columns
        .iter()
        .map(|name| {
            let idx = dataset
                .schema
                .index_of(name)
                .ok_or_else(|| SweepError::UnknownColumn { column: name.clone() })?;
            let points = dataset
                .column(idx)
                .enumerate()
                .filter_map(|(i, v)| v.as_f64().map(|y| (i as f64, y)))
                .collect();
            Ok((name.clone(), points))
        })
        .collect()
}

fn padded_range(values: impl Iterator<Item = f64>, include_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        if v.is_finite() { (lo.min(v), hi.max(v)) } else { (lo, hi) }
    });
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Render `spec` as an SVG document.
///
/// Bar and line charts plot every selected column against the row index; scatter plots the
/// first column on x against the second on y.
pub fn render_svg(dataset: &DataSet, spec: &ChartSpec) -> SweepResult<String> {
    let series = series(dataset, spec)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        match spec.kind {
            ChartKind::Scatter => draw_scatter(&root, &series, dataset)?,
            ChartKind::Line => draw_indexed(&root, &series, dataset.row_count(), false)?,
            ChartKind::Bar => draw_indexed(&root, &series, dataset.row_count(), true)?,
        }

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn draw_indexed(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    series: &[(String, Vec<(f64, f64)>)],
    rows: usize,
    bars: bool,
) -> SweepResult<()> {
    let x_range = -0.5..(rows.max(1) as f64 - 0.5);
    let y_range = padded_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)), bars);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("row")
        .draw()
        .map_err(chart_err)?;

    let width = 0.8 / series.len().max(1) as f64;
    for (i, (name, points)) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let legend_color = color;
        if bars {
            let offset = -0.4 + width * i as f64;
            chart
                .draw_series(points.iter().map(|&(x, y)| {
                    Rectangle::new([(x + offset, 0.0), (x + offset + width, y)], color.filled())
                }))
                .map_err(chart_err)?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled()));
        } else {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(chart_err)?
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], legend_color.stroke_width(2)));
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

fn draw_scatter(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    series: &[(String, Vec<(f64, f64)>)],
    dataset: &DataSet,
) -> SweepResult<()> {
    let Some([(x_name, _), (y_name, _)]) = series.get(..2) else {
        return Err(chart_err("scatter plot needs two columns"));
    };
    let x_idx = dataset.schema.index_of(x_name);
    let y_idx = dataset.schema.index_of(y_name);
    let (Some(x_idx), Some(y_idx)) = (x_idx, y_idx) else {
        return Err(chart_err("scatter column vanished from table"));
    };

    let points: Vec<(f64, f64)> = dataset
        .rows
        .iter()
        .filter_map(|row| Some((row.get(x_idx)?.as_f64()?, row.get(y_idx)?.as_f64()?)))
        .collect();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.0), false),
            padded_range(points.iter().map(|p| p.1), false),
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc(x_name.as_str())
        .y_desc(y_name.as_str())
        .draw()
        .map_err(chart_err)?;

    let color = Palette99::pick(0).to_rgba();
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
        .map_err(chart_err)?;
    Ok(())
}
