use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use data_sweeper::ingestion::{ingest, IngestOptions, UploadedFile};
use data_sweeper::processing::{describe, fill_missing_with_mean, remove_duplicates, EmptyColumnFill};
use data_sweeper::types::{DataSet, DataType, Field, Schema, Value};

fn synthetic(rows: usize) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("group", DataType::Utf8),
        Field::new("score", DataType::Float64),
    ]);
    let rows = (0..rows)
        .map(|i| {
            vec![
                Value::Int64((i % (rows / 2).max(1)) as i64),
                Value::Utf8(format!("g{}", i % 7)),
                if i % 5 == 0 { Value::Null } else { Value::Float64((i % 100) as f64 * 0.5) },
            ]
        })
        .collect();
    DataSet::new(schema, rows)
}

fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from("id,group,score\n");
    for i in 0..rows {
        if i % 5 == 0 {
            out.push_str(&format!("{i},g{},\n", i % 7));
        } else {
            out.push_str(&format!("{i},g{},{}\n", i % 7, (i % 100) as f64 * 0.5));
        }
    }
    out
}

fn bench_cleaning(c: &mut Criterion) {
    let base = synthetic(50_000);

    c.bench_function("remove_duplicates_50k", |b| {
        b.iter_batched(
            || base.clone(),
            |mut ds| black_box(remove_duplicates(&mut ds)),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("fill_missing_with_mean_50k", |b| {
        b.iter_batched(
            || base.clone(),
            |mut ds| black_box(fill_missing_with_mean(&mut ds, EmptyColumnFill::LeaveMissing)),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("describe_50k", |b| b.iter(|| black_box(describe(&base))));
}

fn bench_ingest(c: &mut Criterion) {
    let file = UploadedFile::new("bench.csv", synthetic_csv(50_000));
    let options = IngestOptions::default();

    c.bench_function("ingest_csv_50k", |b| b.iter(|| black_box(ingest(&file, &options).unwrap())));
}

criterion_group!(benches, bench_cleaning, bench_ingest);
criterion_main!(benches);
