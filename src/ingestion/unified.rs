//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest`], which parses an [`UploadedFile`] into an in-memory
//! [`crate::types::DataSet`]. The format is chosen from the lowercased file-name suffix:
//!
//! - `.csv`: comma-delimited, first row is the header
//! - `.xlsx`: first worksheet, first non-empty row is the header
//! - anything else: [`IngestionError::UnsupportedFormat`]

use std::path::Path;

use serde::Serialize;

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::{csv, excel};

/// Missing-value tokens recognized in delimited files by default.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Input format, decided by file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    /// Comma-separated values (`.csv`).
    Csv,
    /// Office Open XML workbook (`.xlsx`).
    Spreadsheet,
    /// Anything else; carries the lowercased suffix including the dot.
    Unsupported(String),
}

impl FileFormat {
    /// Classify a file name by its lowercased extension.
    ///
    /// ```
    /// use data_sweeper::ingestion::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_name("Data.CSV"), FileFormat::Csv);
    /// assert_eq!(FileFormat::from_name("x.tsv"), FileFormat::Unsupported(".tsv".to_string()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let ext = extension_of(name);
        match ext.as_str() {
            ".csv" => Self::Csv,
            ".xlsx" => Self::Spreadsheet,
            _ => Self::Unsupported(ext),
        }
    }
}

/// Lowercased final extension of `name` including the leading dot, or `""` if it has none.
///
/// Dot-files such as `.csv` have no extension.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// One user-selected file: name (with extension) plus raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as uploaded, including extension.
    pub name: String,
    /// Raw byte content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file from a name and its content.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Format decided by the file name.
    pub fn format(&self) -> FileFormat {
        FileFormat::from_name(&self.name)
    }
}

/// Options controlling delimited-file parsing.
///
/// Use [`Default`] for the comma-delimited, standard missing-token behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter for `.csv` input.
    pub delimiter: u8,
    /// Exact field values treated as missing in `.csv` input.
    pub na_values: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IngestOptions {
    pub(crate) fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|na| na == raw)
    }
}

/// Parse an uploaded file into a [`DataSet`], dispatching on [`FileFormat`].
///
/// ```
/// use data_sweeper::ingestion::{ingest, IngestOptions, UploadedFile};
///
/// # fn main() -> Result<(), data_sweeper::IngestionError> {
/// let file = UploadedFile::new("people.csv", "id,name\n1,Ada\n");
/// let ds = ingest(&file, &IngestOptions::default())?;
/// assert_eq!(ds.row_count(), 1);
/// # Ok(())
/// # }
/// ```
pub fn ingest(file: &UploadedFile, options: &IngestOptions) -> IngestionResult<DataSet> {
    match file.format() {
        FileFormat::Csv => csv::ingest_csv_from_bytes(&file.bytes, options),
        FileFormat::Spreadsheet => excel::ingest_xlsx_from_bytes(&file.bytes),
        FileFormat::Unsupported(extension) => Err(IngestionError::UnsupportedFormat { extension }),
    }
}
