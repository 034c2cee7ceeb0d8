//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion:
//!
//! - [`remove_duplicates()`]: drop exact-duplicate rows, keeping the first occurrence
//! - [`fill_missing_with_mean()`]: fill missing numeric cells with the column mean
//! - [`project()`]: restrict a table to a chosen, ordered set of columns
//! - [`describe()`]: count/mean/std/min/quartiles/max for numeric columns
//!
//! ## Example: clean → project → describe
//!
//! ```rust
//! use data_sweeper::processing::{
//!     describe, fill_missing_with_mean, project, remove_duplicates, ColumnSelection, EmptyColumnFill,
//! };
//! use data_sweeper::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("a", DataType::Int64),
//!     Field::new("b", DataType::Float64),
//! ]);
//! let mut ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Float64(2.0)],
//!         vec![Value::Int64(1), Value::Float64(2.0)],
//!         vec![Value::Int64(3), Value::Null],
//!     ],
//! );
//!
//! assert_eq!(remove_duplicates(&mut ds), 1);
//! fill_missing_with_mean(&mut ds, EmptyColumnFill::LeaveMissing);
//! assert_eq!(ds.rows[1], vec![Value::Int64(3), Value::Float64(2.0)]);
//!
//! let only_b = project(&ds, &ColumnSelection::of(["b"])).unwrap();
//! let stats = describe(&only_b);
//! assert_eq!(stats[0].mean, Some(2.0));
//! ```

pub mod clean;
pub mod describe;
pub mod project;

pub use clean::{fill_missing_with_mean, remove_duplicates, ColumnFill, EmptyColumnFill, FillReport};
pub use describe::{describe, ColumnStatistics};
pub use project::{project, ColumnSelection};
