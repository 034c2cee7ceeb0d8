use data_sweeper::ingestion::csv::{ingest_csv_from_bytes, ingest_csv_from_reader};
use data_sweeper::ingestion::{ingest, IngestOptions, UploadedFile};
use data_sweeper::types::{DataType, Field, Schema, Value};
use data_sweeper::IngestionError;

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ])
}

fn people_upload() -> UploadedFile {
    let bytes = std::fs::read("tests/fixtures/people.csv").unwrap();
    UploadedFile::new("people.csv", bytes)
}

#[test]
fn ingest_fixture_infers_column_kinds() {
    let ds = ingest(&people_upload(), &IngestOptions::default()).unwrap();

    assert_eq!(ds.schema, people_schema());
    assert_eq!(ds.row_count(), 4);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
    assert_eq!(ds.rows[1][2], Value::Null);
}

#[test]
fn ingest_csv_with_custom_delimiter() {
    let options = IngestOptions {
        delimiter: b';',
        ..Default::default()
    };
    let ds = ingest_csv_from_bytes(b"a;b\n1;x\n", &options).unwrap();
    assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Utf8("x".to_string())]);
}

#[test]
fn ingest_csv_from_reader_uses_na_tokens() {
    let input = "n,label\nNA,n/a\n2,ok\n";
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr, &IngestOptions::default()).unwrap();
    assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
    assert_eq!(ds.rows[0], vec![Value::Null, Value::Null]);
    assert_eq!(ds.rows[1], vec![Value::Float64(2.0), Value::Utf8("ok".to_string())]);
}

#[test]
fn ingest_csv_custom_na_values_replace_defaults() {
    let options = IngestOptions {
        na_values: vec!["-".to_string()],
        ..Default::default()
    };
    let ds = ingest_csv_from_bytes(b"a\n-\nNA\n", &options).unwrap();
    assert_eq!(ds.schema.fields[0].data_type, DataType::Utf8);
    assert_eq!(ds.rows[0][0], Value::Null);
    assert_eq!(ds.rows[1][0], Value::Utf8("NA".to_string()));
}

#[test]
fn ingest_csv_pads_short_rows() {
    let ds = ingest_csv_from_bytes(b"a,b,c\n1,2\n", &IngestOptions::default()).unwrap();
    assert_eq!(ds.rows[0].len(), 3);
    assert_eq!(ds.rows[0][2], Value::Null);
}

#[test]
fn ingest_csv_errors_on_long_row() {
    let err = ingest_csv_from_bytes(b"a,b\n1,2\n1,2,3\n", &IngestOptions::default()).unwrap_err();
    match err {
        IngestionError::RaggedRow { row, expected, found } => {
            assert_eq!((row, expected, found), (3, 2, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ingest_header_only_csv_is_empty_table() {
    let ds = ingest(&UploadedFile::new("e.csv", "a,b\n"), &IngestOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 0);
    assert_eq!(ds.column_count(), 2);
}

#[test]
fn uppercase_extension_is_accepted() {
    let ds = ingest(&UploadedFile::new("DATA.CSV", "a\n1\n"), &IngestOptions::default()).unwrap();
    assert_eq!(ds.rows, vec![vec![Value::Int64(1)]]);
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = ingest(&UploadedFile::new("x.tsv", "a\tb\n"), &IngestOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "unsupported file type: .tsv");
}
