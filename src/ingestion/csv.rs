//! CSV ingestion implementation.

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::infer::{build_dataset, normalize_headers, RawCell};
use super::unified::IngestOptions;

/// Ingest CSV bytes into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Fields matching one of `options.na_values` are missing.
/// - Rows shorter than the header are padded with missing cells; longer rows are an error.
/// - Column kinds are inferred from the remaining tokens.
pub fn ingest_csv_from_bytes(bytes: &[u8], options: &IngestOptions) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr, options)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader must be configured with `has_headers(true)`.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &IngestOptions,
) -> IngestionResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let width = headers.len();

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based row number for users; +1 again because the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        if record.len() > width {
            return Err(IngestionError::RaggedRow {
                row: user_row,
                expected: width,
                found: record.len(),
            });
        }

        let row = record
            .iter()
            .map(|raw| {
                if options.is_na(raw) {
                    RawCell::Missing
                } else {
                    RawCell::Token(raw.to_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(build_dataset(normalize_headers(headers), rows))
}
