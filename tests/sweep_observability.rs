use std::sync::{Arc, Mutex};

use data_sweeper::export::ExportFormat;
use data_sweeper::ingestion::{
    CompositeObserver, FileContext, FileObserver, IngestionStats, Severity, SweepObserver, UploadedFile,
};
use data_sweeper::pipeline::{sweep, CleaningOptions, SweepOptions};
use data_sweeper::SweepError;

#[derive(Default)]
struct RecordingObserver {
    ingested: Mutex<Vec<(String, usize)>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl SweepObserver for RecordingObserver {
    fn on_ingested(&self, ctx: &FileContext, stats: IngestionStats) {
        self.ingested.lock().unwrap().push((ctx.name.clone(), stats.rows));
    }

    fn on_failure(&self, _ctx: &FileContext, severity: Severity, _error: &SweepError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &FileContext, severity: Severity, _error: &SweepError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

#[test]
fn alert_fires_only_at_or_above_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SweepOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: Severity::Error,
        ..Default::default()
    };

    // Unsupported -> Warning; corrupt workbook -> Error.
    let _ = sweep(
        vec![
            UploadedFile::new("notes.txt", "hello"),
            UploadedFile::new("broken.xlsx", "not a workbook"),
            UploadedFile::new("ok.csv", "a\n1\n2\n"),
        ],
        &opts,
    );

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Warning, Severity::Error]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Error]);
    assert_eq!(*obs.ingested.lock().unwrap(), vec![("ok.csv".to_string(), 2)]);
}

#[test]
fn default_threshold_does_not_alert_on_parse_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = SweepOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let _ = sweep(vec![UploadedFile::new("ragged.csv", "a\n1,2\n")], &opts);

    assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn file_observer_appends_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("events.log");
    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![recorder.clone(), Arc::new(FileObserver::new(&log_path))]);

    let opts = SweepOptions {
        cleaning: Some(CleaningOptions {
            remove_duplicates: false,
            fill_missing: true,
        }),
        convert: Some(ExportFormat::Excel),
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };
    let _ = sweep(
        vec![
            UploadedFile::new("x.tsv", "a\tb\n"),
            UploadedFile::new("gaps.csv", "a,b\n1,\n2,\n"),
        ],
        &opts,
    );

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4, "{log}");
    assert!(lines[0].contains("file=x.tsv"));
    assert!(lines[0].contains("unsupported file type: .tsv"));
    assert!(lines[1].contains("ok format=Csv file=gaps.csv rows=2 columns=2"));
    assert!(lines[2].contains("warn file=gaps.csv column 'b' has no values to average"));
    assert!(lines[3].contains("convert file=gaps.csv output=gaps.xlsx"));

    assert_eq!(recorder.ingested.lock().unwrap().len(), 1);
}
