//! Column kind inference shared by the CSV and spreadsheet readers.
//!
//! Readers hand over a header row plus raw cells; this module normalizes header names and
//! decides one [`DataType`] per column from the non-missing cells:
//!
//! - all integers: `Int64`, or `Float64` if the column has any missing cell
//! - all numbers: `Float64`
//! - all booleans: `Bool`
//! - anything else: `Utf8`
//!
//! A column with no non-missing cells is `Float64`.

use std::collections::HashSet;

use crate::types::{format_float, DataSet, DataType, Field, Schema, Value};

/// A cell as produced by a reader, before the column kind is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    Missing,
    /// Untyped text from a delimited file; parsed as a number or bool when possible.
    Token(String),
    /// A cell the source already typed as text; never re-parsed.
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Classified {
    Integral(i64),
    Number(f64),
    Bool(bool),
    Text,
}

fn classify(cell: &RawCell) -> Option<Classified> {
    match cell {
        RawCell::Missing => None,
        RawCell::Token(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Some(Classified::Integral(i))
            } else if let Ok(f) = trimmed.parse::<f64>() {
                Some(Classified::Number(f))
            } else if let Some(b) = parse_bool_token(trimmed) {
                Some(Classified::Bool(b))
            } else {
                Some(Classified::Text)
            }
        }
        RawCell::Text(_) => Some(Classified::Text),
        RawCell::Int(i) => Some(Classified::Integral(*i)),
        RawCell::Float(f) => Some(match integral_float(*f) {
            Some(i) => Classified::Integral(i),
            None => Classified::Number(*f),
        }),
        RawCell::Bool(b) => Some(Classified::Bool(*b)),
    }
}

fn parse_bool_token(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn integral_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 {
        Some(f as i64)
    } else {
        None
    }
}

fn infer_data_type(cells: &[RawCell]) -> DataType {
    let mut any_missing = false;
    let mut all_integral = true;
    let mut all_numeric = true;
    let mut all_bool = true;
    let mut seen = 0usize;

    for cell in cells {
        match classify(cell) {
            None => any_missing = true,
            Some(c) => {
                seen += 1;
                all_integral &= matches!(c, Classified::Integral(_));
                all_numeric &= matches!(c, Classified::Integral(_) | Classified::Number(_));
                all_bool &= matches!(c, Classified::Bool(_));
            }
        }
    }

    if seen == 0 {
        DataType::Float64
    } else if all_integral {
        if any_missing {
            DataType::Float64
        } else {
            DataType::Int64
        }
    } else if all_numeric {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

fn convert_cell(cell: RawCell, data_type: DataType) -> Value {
    if matches!(cell, RawCell::Missing) {
        return Value::Null;
    }
    let classified = classify(&cell);
    match (data_type, classified) {
        (DataType::Int64, Some(Classified::Integral(i))) => Value::Int64(i),
        (DataType::Float64, Some(Classified::Integral(i))) => Value::Float64(i as f64),
        (DataType::Float64, Some(Classified::Number(f))) => Value::Float64(f),
        (DataType::Bool, Some(Classified::Bool(b))) => Value::Bool(b),
        _ => Value::Utf8(cell_text(cell)),
    }
}

fn cell_text(cell: RawCell) -> String {
    match cell {
        RawCell::Missing => String::new(),
        RawCell::Token(s) | RawCell::Text(s) => s,
        RawCell::Int(i) => i.to_string(),
        RawCell::Float(f) => format_float(f),
        RawCell::Bool(true) => "True".to_string(),
        RawCell::Bool(false) => "False".to_string(),
    }
}

/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while used.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Build a typed [`DataSet`] from normalized headers and row-major raw cells.
///
/// Rows shorter than the header are padded with missing cells.
pub(crate) fn build_dataset(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> DataSet {
    let width = headers.len();
    let height = rows.len();

    let mut columns: Vec<Vec<RawCell>> = (0..width).map(|_| Vec::with_capacity(height)).collect();
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(RawCell::Missing));
        }
    }

    let mut fields = Vec::with_capacity(width);
    let mut typed_columns: Vec<std::vec::IntoIter<Value>> = Vec::with_capacity(width);
    for (name, cells) in headers.into_iter().zip(columns) {
        let data_type = infer_data_type(&cells);
        let values: Vec<Value> = cells.into_iter().map(|c| convert_cell(c, data_type)).collect();
        fields.push(Field::new(name, data_type));
        typed_columns.push(values.into_iter());
    }

    let mut out_rows = Vec::with_capacity(height);
    for _ in 0..height {
        out_rows.push(
            typed_columns
                .iter_mut()
                .map(|col| col.next().unwrap_or(Value::Null))
                .collect(),
        );
    }

    DataSet::new(Schema::new(fields), out_rows)
}
