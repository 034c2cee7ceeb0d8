//! Spreadsheet (`.xlsx`) ingestion implementation.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::infer::{build_dataset, normalize_headers, RawCell};

/// Ingest the first worksheet of an `.xlsx` workbook into an in-memory [`DataSet`].
///
/// Behavior:
/// - Uses the first sheet in workbook order
/// - Detects the first non-empty row as the header row
/// - Keeps native cell types; text cells are never re-parsed as numbers
/// - Error cells (`#N/A`, `#DIV/0!`, ...) are missing
pub fn ingest_xlsx_from_bytes(bytes: &[u8]) -> IngestionResult<DataSet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(calamine::Error::from)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(calamine::Error::from)?,
        None => return Err(IngestionError::EmptyWorkbook),
    };

    Ok(ingest_sheet_range(&range))
}

fn ingest_sheet_range(range: &calamine::Range<Data>) -> DataSet {
    let mut rows = range.rows().skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_header_string).collect(),
        None => return build_dataset(Vec::new(), Vec::new()),
    };

    let body: Vec<Vec<RawCell>> = rows
        .map(|row| row.iter().take(headers.len()).map(convert_cell).collect())
        .collect();

    build_dataset(normalize_headers(headers), body)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> RawCell {
    match c {
        Data::Empty | Data::Error(_) => RawCell::Missing,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => RawCell::Text(c.to_string()),
    }
}
