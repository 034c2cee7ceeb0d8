//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] (from [`unified`]) which:
//!
//! - picks the format from the file-name extension ([`FileFormat`])
//! - parses the uploaded bytes into an in-memory [`crate::types::DataSet`]
//! - infers one column kind per column
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`excel`]

pub mod csv;
pub mod excel;
mod infer;
pub mod observability;
pub mod unified;

pub use observability::{
    severity_for_error, CompositeObserver, FileContext, FileObserver, IngestionStats, LogObserver, Severity,
    SweepObserver,
};
pub use unified::{extension_of, ingest, FileFormat, IngestOptions, UploadedFile, DEFAULT_NA_VALUES};
