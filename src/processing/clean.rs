//! Cleaning operations: duplicate-row removal and mean-filling of numeric columns.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{DataSet, DataType, Value};

/// What to write into a numeric column whose cells are all missing.
///
/// Such a column has no mean, so this decides the fill value explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EmptyColumnFill {
    /// Leave the cells missing.
    #[default]
    LeaveMissing,
    /// Write `0.0` into every cell.
    Zero,
}

/// Per-column outcome of [`fill_missing_with_mean`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    /// Column name.
    pub column: String,
    /// Number of cells written.
    pub filled: usize,
    /// Value written; `None` when the column had no non-missing cells and was left as is.
    pub value: Option<f64>,
}

/// Result of [`fill_missing_with_mean`]; only numeric columns with missing cells are listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillReport {
    pub columns: Vec<ColumnFill>,
}

impl FillReport {
    /// Total number of cells written across all columns.
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

fn cell_key(value: &Value) -> CellKey<'_> {
    match value {
        Value::Null => CellKey::Null,
        Value::Float64(v) if v.is_nan() => CellKey::Null,
        // -0.0 and 0.0 compare equal.
        Value::Float64(v) if *v == 0.0 => CellKey::Float(0.0f64.to_bits()),
        Value::Float64(v) => CellKey::Float(v.to_bits()),
        Value::Int64(v) => CellKey::Int(*v),
        Value::Bool(b) => CellKey::Bool(*b),
        Value::Utf8(s) => CellKey::Text(s.as_str()),
    }
}

/// Remove rows that repeat an earlier row across every column, keeping the first occurrence.
///
/// Missing cells compare equal to each other. Returns the number of rows removed.
pub fn remove_duplicates(dataset: &mut DataSet) -> usize {
    let before = dataset.row_count();

    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(before);
        dataset
            .rows
            .iter()
            .map(|row| seen.insert(row.iter().map(cell_key).collect()))
            .collect()
    };

    let mut flags = keep.into_iter();
    dataset.retain_rows(|_| flags.next().unwrap_or(true));
    before - dataset.row_count()
}

/// Replace missing cells in every numeric column with that column's mean.
///
/// Each mean is taken over the column's non-missing cells before anything is written.
/// Non-numeric columns are untouched. An `Int64` column that receives fills becomes
/// `Float64`. Columns without any non-missing cell follow `empty_column`.
pub fn fill_missing_with_mean(dataset: &mut DataSet, empty_column: EmptyColumnFill) -> FillReport {
    let mut report = FillReport::default();

    for idx in dataset.schema.numeric_indexes() {
        let mut sum = 0.0;
        let mut count = 0usize;
        let mut missing = 0usize;
        for value in dataset.column(idx) {
            match value.as_f64() {
                Some(v) => {
                    sum += v;
                    count += 1;
                }
                None => missing += 1,
            }
        }
        if missing == 0 {
            continue;
        }

        let fill = if count > 0 {
            Some(sum / count as f64)
        } else {
            match empty_column {
                EmptyColumnFill::LeaveMissing => None,
                EmptyColumnFill::Zero => Some(0.0),
            }
        };

        let column = dataset.schema.fields[idx].name.clone();
        let Some(fill) = fill else {
            report.columns.push(ColumnFill {
                column,
                filled: 0,
                value: None,
            });
            continue;
        };

        promote_to_float(dataset, idx);
        for row in dataset.rows.iter_mut() {
            if let Some(cell) = row.get_mut(idx) {
                if cell.is_missing() {
                    *cell = Value::Float64(fill);
                }
            }
        }
        report.columns.push(ColumnFill {
            column,
            filled: missing,
            value: Some(fill),
        });
    }

    report
}

fn promote_to_float(dataset: &mut DataSet, idx: usize) {
    if dataset.schema.fields[idx].data_type != DataType::Int64 {
        return;
    }
    dataset.schema.fields[idx].data_type = DataType::Float64;
    for row in dataset.rows.iter_mut() {
        if let Some(cell) = row.get_mut(idx) {
            if let Value::Int64(v) = *cell {
                *cell = Value::Float64(v as f64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    fn ab_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Float64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Float64(2.0)],
                vec![Value::Int64(1), Value::Float64(2.0)],
                vec![Value::Int64(3), Value::Null],
            ],
        )
    }

    #[test]
    fn remove_duplicates_keeps_first_occurrence() {
        let mut ds = ab_dataset();
        assert_eq!(remove_duplicates(&mut ds), 1);
        assert_eq!(
            ds.rows,
            vec![
                vec![Value::Int64(1), Value::Float64(2.0)],
                vec![Value::Int64(3), Value::Null],
            ]
        );
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let mut once = ab_dataset();
        remove_duplicates(&mut once);
        let mut twice = once.clone();
        assert_eq!(remove_duplicates(&mut twice), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_duplicates_treats_missing_as_equal() {
        let schema = Schema::new(vec![Field::new("x", DataType::Float64)]);
        let mut ds = DataSet::new(
            schema,
            vec![vec![Value::Null], vec![Value::Float64(f64::NAN)], vec![Value::Float64(-0.0)], vec![Value::Float64(0.0)]],
        );
        assert_eq!(remove_duplicates(&mut ds), 2);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn fill_uses_pre_fill_mean() {
        let mut ds = ab_dataset();
        remove_duplicates(&mut ds);
        let report = fill_missing_with_mean(&mut ds, EmptyColumnFill::default());
        assert_eq!(
            ds.rows,
            vec![
                vec![Value::Int64(1), Value::Float64(2.0)],
                vec![Value::Int64(3), Value::Float64(2.0)],
            ]
        );
        assert_eq!(report.total_filled(), 1);
        assert_eq!(report.columns[0].column, "b");
        assert_eq!(report.columns[0].value, Some(2.0));
    }

    #[test]
    fn each_column_is_filled_with_its_own_mean() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Float64),
            Field::new("b", DataType::Float64),
        ]);
        let mut ds = DataSet::new(
            schema,
            vec![
                vec![Value::Float64(1.0), Value::Null],
                vec![Value::Null, Value::Float64(10.0)],
                vec![Value::Float64(3.0), Value::Float64(20.0)],
            ],
        );

        let report = fill_missing_with_mean(&mut ds, EmptyColumnFill::LeaveMissing);
        assert_eq!(report.total_filled(), 2);
        assert_eq!(ds.rows[1][0], Value::Float64(2.0));
        assert_eq!(ds.rows[0][1], Value::Float64(15.0));
        assert_eq!(
            report.columns.iter().map(|c| (c.column.as_str(), c.value)).collect::<Vec<_>>(),
            vec![("a", Some(2.0)), ("b", Some(15.0))]
        );
    }

    #[test]
    fn fill_ignores_non_numeric_columns() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
        ]);
        let mut ds = DataSet::new(
            schema,
            vec![
                vec![Value::Null, Value::Float64(1.0)],
                vec![Value::Utf8("x".into()), Value::Null],
                vec![Value::Utf8("y".into()), Value::Float64(4.0)],
            ],
        );
        fill_missing_with_mean(&mut ds, EmptyColumnFill::LeaveMissing);
        assert_eq!(ds.rows[0][0], Value::Null);
        assert_eq!(ds.rows[1][1], Value::Float64(2.5));
    }

    #[test]
    fn fill_promotes_int_columns_with_missing() {
        let schema = Schema::new(vec![Field::new("n", DataType::Int64)]);
        let mut ds = DataSet::new(schema, vec![vec![Value::Int64(1)], vec![Value::Null], vec![Value::Int64(2)]]);
        fill_missing_with_mean(&mut ds, EmptyColumnFill::LeaveMissing);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(
            ds.rows,
            vec![vec![Value::Float64(1.0)], vec![Value::Float64(1.5)], vec![Value::Float64(2.0)]]
        );
    }

    #[test]
    fn all_missing_column_respects_policy() {
        let schema = Schema::new(vec![Field::new("e", DataType::Float64)]);
        let rows = vec![vec![Value::Null], vec![Value::Null]];

        let mut left = DataSet::new(schema.clone(), rows.clone());
        let report = fill_missing_with_mean(&mut left, EmptyColumnFill::LeaveMissing);
        assert!(left.column(0).all(Value::is_missing));
        assert_eq!(report.columns[0].value, None);
        assert_eq!(report.total_filled(), 0);

        let mut zeroed = DataSet::new(schema, rows);
        fill_missing_with_mean(&mut zeroed, EmptyColumnFill::Zero);
        assert!(zeroed.column(0).all(|v| *v == Value::Float64(0.0)));
    }
}
