use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for per-file session and pipeline operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type returned while turning an uploaded file into a [`crate::types::DataSet`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The file name does not end in `.csv` or `.xlsx`.
    ///
    /// `extension` is the lowercased suffix including the leading dot (empty if none).
    #[error("unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet parse error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The workbook contains no worksheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// A data row has more fields than the header.
    #[error("expected {expected} fields in row {row}, saw {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Error type returned while serializing a table for download.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet writer error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Flushing the in-memory buffer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cell (or the table shape) cannot be represented in the target format.
    #[error("cannot encode row {row} column '{column}': {message}")]
    Unencodable {
        row: usize,
        column: String,
        message: String,
    },
}

/// Error type returned by [`crate::session::FileSession`] actions and the batch pipeline.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Ingestion failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Conversion failed.
    #[error("conversion failed: {0}")]
    Export(#[from] ExportError),

    /// A requested column is not part of the current table.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The action is not valid in the session's current stage.
    #[error("cannot {action} while {stage}")]
    InvalidTransition { stage: String, action: String },

    /// Chart rendering failed.
    #[error("chart error: {message}")]
    Chart { message: String },
}
