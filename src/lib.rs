//! `data-sweeper` turns uploaded CSV and Excel files into in-memory [`types::DataSet`]s, lets
//! a user clean, narrow and chart them, and converts them between the two formats.
//!
//! Each file goes through the same linear flow, independently of every other file:
//!
//! 1. **Ingest** ([`ingestion`]): pick the format from the extension (`.csv` / `.xlsx`),
//!    parse the bytes, infer one kind per column. Other extensions are reported as
//!    [`IngestionError::UnsupportedFormat`] and the file is skipped.
//! 2. **Summarize** ([`report`]): name, size in KB, first five rows.
//! 3. **Clean** ([`processing::clean`]): drop duplicate rows, fill missing numeric cells with
//!    the column mean.
//! 4. **Project** ([`processing::project`]): keep a chosen, ordered set of columns.
//! 5. **Visualize** ([`chart`]): bar/line/scatter chart of numeric columns rendered to SVG,
//!    plus descriptive statistics.
//! 6. **Export** ([`export`]): serialize to CSV or XLSX bytes with file name and media type.
//!
//! [`session::FileSession`] enforces that order for one file; [`pipeline::sweep`] runs a
//! batch of files with one set of [`pipeline::SweepOptions`].
//!
//! ## Quick example
//!
//! ```rust
//! use data_sweeper::export::ExportFormat;
//! use data_sweeper::ingestion::{IngestOptions, UploadedFile};
//! use data_sweeper::session::FileSession;
//! use data_sweeper::types::Value;
//!
//! # fn main() -> Result<(), data_sweeper::SweepError> {
//! let file = UploadedFile::new("data.csv", "a,b\n1,2\n1,2\n3,\n");
//! let mut session = FileSession::open(file, &IngestOptions::default())?;
//!
//! session.remove_duplicates()?;
//! session.fill_missing()?;
//! assert_eq!(session.table().rows[1], vec![Value::Int64(3), Value::Float64(2.0)]);
//!
//! let download = session.convert(ExportFormat::Excel)?;
//! assert_eq!(download.file_name, "data.xlsx");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection, CSV/XLSX readers, observers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: cleaning, projection, descriptive statistics
//! - [`chart`]: chart selection and rendering
//! - [`export`]: CSV/XLSX writers
//! - [`report`]: summaries and text rendering
//! - [`session`]: per-file state machine
//! - [`pipeline`]: multi-file batch driver
//! - [`error`]: error types

pub mod chart;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod session;
pub mod types;

pub use error::{ExportError, IngestionError, IngestionResult, SweepError, SweepResult};
