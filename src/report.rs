//! File summaries and plain-text rendering of tables and statistics.

use std::fmt::Write as _;

use serde::Serialize;

use crate::ingestion::UploadedFile;
use crate::processing::ColumnStatistics;
use crate::types::{format_float, DataSet, DataType, Value};

/// Number of rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// What the user sees about a file right after it is parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub name: String,
    /// Size in kilobytes (`bytes / 1024`, unrounded).
    pub size_kb: f64,
    pub rows: usize,
    pub columns: usize,
    /// First [`PREVIEW_ROWS`] rows.
    pub preview: DataSet,
}

/// Summarize a parsed table and the upload it came from.
pub fn summarize(file: &UploadedFile, dataset: &DataSet) -> FileSummary {
    FileSummary {
        name: file.name.clone(),
        size_kb: file.size() as f64 / 1024.0,
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        preview: dataset.head(PREVIEW_ROWS),
    }
}

fn display_cell(value: &Value, data_type: DataType) -> String {
    match value {
        _ if value.is_missing() && data_type.is_numeric() => "NaN".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn write_grid(out: &mut String, header: &[String], body: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let _ = writeln!(out, "{}", line(header).trim_end());
    for row in body {
        let _ = writeln!(out, "{}", line(row).trim_end());
    }
}

/// Render a dataset as a right-aligned text grid with a leading row-index column.
pub fn render_table(dataset: &DataSet) -> String {
    let mut header = vec![String::new()];
    header.extend(dataset.schema.field_names().map(str::to_owned));

    let body: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![i.to_string()];
            cells.extend(
                row.iter()
                    .zip(&dataset.schema.fields)
                    .map(|(v, f)| display_cell(v, f.data_type)),
            );
            cells
        })
        .collect();

    let mut out = String::new();
    if dataset.column_count() == 0 {
        let _ = writeln!(out, "(no columns, {} rows)", dataset.row_count());
        return out;
    }
    write_grid(&mut out, &header, &body);
    out
}

/// Render statistics with one column per numeric column and one row per measure.
pub fn render_statistics(stats: &[ColumnStatistics]) -> String {
    let mut out = String::new();
    if stats.is_empty() {
        return out;
    }

    let mut header = vec![String::new()];
    header.extend(stats.iter().map(|s| s.column.clone()));

    let measure = |label: &str, pick: &dyn Fn(&ColumnStatistics) -> Option<f64>| -> Vec<String> {
        let mut row = vec![label.to_string()];
        row.extend(stats.iter().map(|s| pick(s).map(format_float).unwrap_or_else(|| "NaN".to_string())));
        row
    };

    let mut count_row = vec!["count".to_string()];
    count_row.extend(stats.iter().map(|s| format_float(s.count as f64)));

    let body = vec![
        count_row,
        measure("mean", &|s| s.mean),
        measure("std", &|s| s.std),
        measure("min", &|s| s.min),
        measure("25%", &|s| s.p25),
        measure("50%", &|s| s.p50),
        measure("75%", &|s| s.p75),
        measure("max", &|s| s.max),
    ];

    write_grid(&mut out, &header, &body);
    out
}
