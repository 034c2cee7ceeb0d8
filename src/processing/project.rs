//! Column projection for [`crate::types::DataSet`].

use serde::Serialize;

use crate::error::{SweepError, SweepResult};
use crate::types::{DataSet, Schema, Value};

/// The user's choice of columns to keep.
///
/// Defaults to every column of the current table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    columns: Option<Vec<String>>,
}

impl ColumnSelection {
    /// Keep all columns in their current order.
    pub fn all() -> Self {
        Self { columns: None }
    }

    /// Keep exactly `columns`, in the given order. Repeated names are kept once.
    pub fn of<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for c in columns {
            let c = c.into();
            if !out.contains(&c) {
                out.push(c);
            }
        }
        Self { columns: Some(out) }
    }

    /// Whether this is the all-columns default.
    pub fn is_all(&self) -> bool {
        self.columns.is_none()
    }

    /// Resolve the selection to column indexes of `schema`.
    pub fn resolve(&self, schema: &Schema) -> SweepResult<Vec<usize>> {
        match &self.columns {
            None => Ok((0..schema.fields.len()).collect()),
            Some(names) => names
                .iter()
                .map(|name| {
                    schema
                        .index_of(name)
                        .ok_or_else(|| SweepError::UnknownColumn { column: name.clone() })
                })
                .collect(),
        }
    }
}

/// Return a dataset restricted to the selected columns, in selection order.
///
/// An empty selection yields a zero-column table with the same number of rows.
pub fn project(dataset: &DataSet, selection: &ColumnSelection) -> SweepResult<DataSet> {
    let idxs = selection.resolve(&dataset.schema)?;

    let schema = Schema::new(idxs.iter().map(|&i| dataset.schema.fields[i].clone()).collect());
    let rows = dataset
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row.get(i).cloned().unwrap_or(Value::Null)).collect())
        .collect();

    Ok(DataSet::new(schema, rows))
}
