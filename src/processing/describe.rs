//! Descriptive statistics for numeric columns.

use serde::Serialize;

use crate::types::DataSet;

/// Summary of one numeric column.
///
/// Missing cells are excluded everywhere except that they reduce `count`. All fields except
/// `count` are `None` when the column has no non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (`n - 1` denominator); NaN for a single value.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Compute [`ColumnStatistics`] for every numeric column, in schema order.
///
/// Returns an empty vector when the dataset has no numeric columns.
pub fn describe(dataset: &DataSet) -> Vec<ColumnStatistics> {
    dataset
        .schema
        .numeric_indexes()
        .into_iter()
        .map(|idx| {
            let values: Vec<f64> = dataset.column(idx).filter_map(|v| v.as_f64()).collect();
            describe_values(&dataset.schema.fields[idx].name, values)
        })
        .collect()
}

fn describe_values(column: &str, mut values: Vec<f64>) -> ColumnStatistics {
    let count = values.len();
    if count == 0 {
        return ColumnStatistics {
            column: column.to_string(),
            count,
            mean: None,
            std: None,
            min: None,
            p25: None,
            p50: None,
            p75: None,
            max: None,
        };
    }

    values.sort_by(f64::total_cmp);
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    };

    ColumnStatistics {
        column: column.to_string(),
        count,
        mean: Some(mean),
        std: Some(std),
        min: values.first().copied(),
        p25: Some(quantile(&values, 0.25)),
        p50: Some(quantile(&values, 0.50)),
        p75: Some(quantile(&values, 0.75)),
        max: values.last().copied(),
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_matches_reference_values() {
        let schema = Schema::new(vec![
            Field::new("label", DataType::Utf8),
            Field::new("x", DataType::Int64),
        ]);
        let rows = (1..=4).map(|i| vec![Value::Utf8(format!("r{i}")), Value::Int64(i)]).collect();
        let stats = describe(&DataSet::new(schema, rows));

        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.column, "x");
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.std, 1.290_994_448_735_805_6));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.p25, 1.75));
        assert!(approx(s.p50, 2.5));
        assert!(approx(s.p75, 3.25));
        assert!(approx(s.max, 4.0));
    }

    #[test]
    fn missing_values_are_excluded() {
        let schema = Schema::new(vec![Field::new("y", DataType::Float64)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Float64(3.0)], vec![Value::Null], vec![Value::Float64(1.0)]],
        );
        let s = &describe(&ds)[0];
        assert_eq!(s.count, 2);
        assert!(approx(s.mean, 2.0));
        assert!(approx(s.p50, 2.0));
    }

    #[test]
    fn single_value_has_nan_std() {
        let schema = Schema::new(vec![Field::new("y", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Float64(5.0)]]);
        let s = &describe(&ds)[0];
        assert!(s.std.is_some_and(f64::is_nan));
        assert!(approx(s.p75, 5.0));
    }

    #[test]
    fn all_missing_column_has_empty_stats() {
        let schema = Schema::new(vec![Field::new("e", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null]]);
        let s = &describe(&ds)[0];
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.max, None);
    }

    #[test]
    fn no_numeric_columns_yields_nothing() {
        let schema = Schema::new(vec![Field::new("t", DataType::Utf8), Field::new("b", DataType::Bool)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("a".into()), Value::Bool(true)]]);
        assert!(describe(&ds).is_empty());
    }
}
