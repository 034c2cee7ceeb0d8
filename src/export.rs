//! Serialize a [`DataSet`] into a downloadable CSV or XLSX buffer.
//!
//! The exporter never writes to disk and never mutates the table; the caller decides how the
//! [`ExportBuffer`] is delivered.

use std::fmt;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::error::ExportError;
use crate::ingestion::extension_of;
use crate::types::{format_float, DataSet, Value};

/// Media type of CSV output.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// Media type of XLSX output.
pub const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Target format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    /// Extension of the produced file, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    /// Standard media type of the produced file.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MEDIA_TYPE,
            Self::Excel => XLSX_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("CSV"),
            Self::Excel => f.write_str("Excel"),
        }
    }
}

/// Serialized table plus download metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportBuffer {
    /// Output file name: original name with its extension replaced.
    pub file_name: String,
    /// Media type matching [`Self::format`].
    pub media_type: &'static str,
    pub format: ExportFormat,
    /// Label for the download action.
    pub label: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ExportBuffer {
    /// Size of the serialized content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the serialized content is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Replace the final extension of `name` with `new_ext`; append it if there is none.
///
/// ```
/// use data_sweeper::export::output_file_name;
///
/// assert_eq!(output_file_name("report.xlsx", ".csv"), "report.csv");
/// assert_eq!(output_file_name("DATA.CSV", ".xlsx"), "DATA.xlsx");
/// ```
pub fn output_file_name(name: &str, new_ext: &str) -> String {
    let ext_len = extension_of(name).len();
    format!("{}{}", &name[..name.len() - ext_len], new_ext)
}

/// Serialize `dataset` for download as `format`, naming the output after `original_name`.
pub fn export(dataset: &DataSet, original_name: &str, format: ExportFormat) -> Result<ExportBuffer, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv_bytes(dataset)?,
        ExportFormat::Excel => to_xlsx_bytes(dataset)?,
    };

    Ok(ExportBuffer {
        file_name: output_file_name(original_name, format.extension()),
        media_type: format.media_type(),
        format,
        label: format!("Download {original_name} as {format}"),
        bytes,
    })
}

/// Header row then one record per row; missing cells are empty fields. No index column.
pub fn to_csv_bytes(dataset: &DataSet) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    if dataset.column_count() > 0 {
        wtr.write_record(dataset.schema.field_names())?;
        for row in &dataset.rows {
            wtr.write_record(row.iter().map(csv_field))?;
        }
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn csv_field(value: &Value) -> String {
    if value.is_missing() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Single `Sheet1` worksheet with a bold header row. No index column.
pub fn to_xlsx_bytes(dataset: &DataSet) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col_idx, field) in dataset.schema.fields.iter().enumerate() {
        let col = sheet_col(col_idx, &field.name)?;
        worksheet.write_string_with_format(0, col, field.name.as_str(), &header_format)?;
    }

    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let sheet_row = u32::try_from(row_idx + 1).map_err(|_| ExportError::Unencodable {
            row: row_idx,
            column: String::new(),
            message: "too many rows for a worksheet".to_string(),
        })?;

        for (col_idx, (value, field)) in row.iter().zip(&dataset.schema.fields).enumerate() {
            let col = sheet_col(col_idx, &field.name)?;
            match value {
                Value::Null => {}
                Value::Float64(v) if v.is_nan() => {}
                Value::Float64(v) if v.is_infinite() => {
                    return Err(ExportError::Unencodable {
                        row: row_idx,
                        column: field.name.clone(),
                        message: format!("{} has no spreadsheet representation", format_float(*v)),
                    });
                }
                Value::Float64(v) => {
                    worksheet.write_number(sheet_row, col, *v)?;
                }
                Value::Int64(v) => {
                    worksheet.write_number(sheet_row, col, *v as f64)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(sheet_row, col, *b)?;
                }
                Value::Utf8(s) => {
                    worksheet.write_string(sheet_row, col, s.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn sheet_col(col_idx: usize, name: &str) -> Result<u16, ExportError> {
    u16::try_from(col_idx).map_err(|_| ExportError::Unencodable {
        row: 0,
        column: name.to_string(),
        message: "too many columns for a worksheet".to_string(),
    })
}
