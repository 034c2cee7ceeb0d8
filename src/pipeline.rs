//! Multi-file batch driver.
//!
//! [`sweep`] runs every uploaded file through its own [`FileSession`], top to bottom, using
//! the widget state captured in [`SweepOptions`]. Files never share state; a failure on one
//! file is recorded in its [`FileOutcome`] and the batch moves on.
//!
//! When an observer is configured, this reports:
//!
//! - `on_ingested` after each successful parse
//! - `on_warning` for user-visible warnings (empty chart selections, skipped fills)
//! - `on_converted` after each produced download buffer
//! - `on_failure` on failure, with a computed severity
//! - `on_alert` on failure when the severity is >= `options.alert_at_or_above`

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::chart::{ChartRequest, Visualization};
use crate::error::SweepError;
use crate::export::{ExportBuffer, ExportFormat};
use crate::ingestion::{
    severity_for_error, FileContext, IngestOptions, IngestionStats, Severity, SweepObserver, UploadedFile,
};
use crate::processing::{describe, ColumnSelection, EmptyColumnFill, FillReport};
use crate::report::FileSummary;
use crate::session::FileSession;

/// Message shown once every file has been handled.
pub const COMPLETION_MESSAGE: &str = "All files processed";

/// Which cleaning actions to run once cleaning is enabled for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing: bool,
}

/// Widget state applied to every file in a batch.
///
/// Use [`Default`] for common cases: no cleaning, all columns, no chart, no conversion.
#[derive(Clone)]
pub struct SweepOptions {
    /// Parsing options for delimited input.
    pub ingest: IngestOptions,
    /// `None` leaves the cleaning section disabled.
    pub cleaning: Option<CleaningOptions>,
    /// Fill behavior for numeric columns with no values.
    pub empty_column_fill: EmptyColumnFill,
    /// Columns to keep.
    pub columns: ColumnSelection,
    /// `None` leaves the visualization section disabled.
    pub visualization: Option<ChartRequest>,
    /// `None` skips conversion.
    pub convert: Option<ExportFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SweepObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default(),
            cleaning: None,
            empty_column_fill: EmptyColumnFill::default(),
            columns: ColumnSelection::all(),
            visualization: None,
            convert: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl fmt::Debug for SweepOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweepOptions")
            .field("ingest", &self.ingest)
            .field("cleaning", &self.cleaning)
            .field("empty_column_fill", &self.empty_column_fill)
            .field("columns", &self.columns)
            .field("visualization", &self.visualization)
            .field("convert", &self.convert)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Outcome of a conversion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Conversion {
    Converted(ExportBuffer),
    Failed { error: String },
}

/// Everything produced for one successfully parsed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Summary taken right after parsing, before cleaning.
    pub summary: FileSummary,
    /// Rows removed by duplicate removal, if it ran.
    pub duplicates_removed: Option<usize>,
    /// Fill report, if missing-value filling ran.
    pub fill: Option<FillReport>,
    /// Columns of the projected table.
    pub columns: Vec<String>,
    pub visualization: Option<Visualization>,
    pub conversion: Option<Conversion>,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Processed(FileReport),
    Failed {
        name: String,
        severity: Severity,
        error: String,
    },
}

impl FileOutcome {
    /// Uploaded file name.
    pub fn name(&self) -> &str {
        match self {
            Self::Processed(report) => &report.summary.name,
            Self::Failed { name, .. } => name,
        }
    }
}

/// Result of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    pub message: &'static str,
}

/// Process `files` in order, each independently.
pub fn sweep(files: Vec<UploadedFile>, options: &SweepOptions) -> BatchReport {
    let files = files
        .into_iter()
        .map(|file| {
            let ctx = FileContext {
                name: file.name.clone(),
                format: file.format(),
            };
            match process_file(file, options, &ctx) {
                Ok(report) => FileOutcome::Processed(report),
                Err(err) => {
                    let severity = severity_for_error(&err);
                    report_failure(options, &ctx, severity, &err);
                    FileOutcome::Failed {
                        name: ctx.name,
                        severity,
                        error: err.to_string(),
                    }
                }
            }
        })
        .collect();

    BatchReport {
        files,
        message: COMPLETION_MESSAGE,
    }
}

fn report_failure(options: &SweepOptions, ctx: &FileContext, severity: Severity, err: &SweepError) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_failure(ctx, severity, err);
        if severity >= options.alert_at_or_above {
            obs.on_alert(ctx, severity, err);
        }
    }
}

fn warn(options: &SweepOptions, ctx: &FileContext, message: &str) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_warning(ctx, message);
    }
}

fn process_file(file: UploadedFile, options: &SweepOptions, ctx: &FileContext) -> Result<FileReport, SweepError> {
    let mut session = FileSession::open(file, &options.ingest)?.with_empty_column_fill(options.empty_column_fill);
    let summary = session.summary();

    if let Some(obs) = options.observer.as_ref() {
        obs.on_ingested(
            ctx,
            IngestionStats {
                rows: summary.rows,
                columns: summary.columns,
            },
        );
    }

    let mut duplicates_removed = None;
    let mut fill = None;
    if let Some(cleaning) = options.cleaning {
        if cleaning.remove_duplicates {
            duplicates_removed = Some(session.remove_duplicates()?);
        }
        if cleaning.fill_missing {
            let report = session.fill_missing()?;
            for skipped in report.columns.iter().filter(|c| c.value.is_none()) {
                warn(
                    options,
                    ctx,
                    &format!("column '{}' has no values to average; left missing", skipped.column),
                );
            }
            fill = Some(report);
        }
    }

    session.project(options.columns.clone())?;
    let columns = session.table().schema.field_names().map(str::to_owned).collect();

    // A bad chart request only costs the chart; statistics and conversion still run.
    let visualization = options.visualization.as_ref().map(|request| {
        let viz = match session.visualize(request.clone()) {
            Ok(viz) => viz,
            Err(err) => {
                report_failure(options, ctx, severity_for_error(&err), &err);
                Visualization {
                    chart: None,
                    warnings: vec![format!("chart skipped: {err}")],
                    statistics: describe(session.table()),
                }
            }
        };
        for w in &viz.warnings {
            warn(options, ctx, w);
        }
        viz
    });

    let conversion = options.convert.map(|format| match session.convert(format) {
        Ok(buffer) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_converted(ctx, &buffer.file_name, buffer.len());
            }
            Conversion::Converted(buffer)
        }
        Err(err) => {
            report_failure(options, ctx, severity_for_error(&err), &err);
            Conversion::Failed { error: err.to_string() }
        }
    });

    Ok(FileReport {
        summary,
        duplicates_removed,
        fill,
        columns,
        visualization,
        conversion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SweepObserver for Recorder {
        fn on_ingested(&self, ctx: &FileContext, stats: IngestionStats) {
            self.events.lock().unwrap().push(format!("ok {} {}", ctx.name, stats.rows));
        }

        fn on_warning(&self, ctx: &FileContext, message: &str) {
            self.events.lock().unwrap().push(format!("warn {} {message}", ctx.name));
        }

        fn on_failure(&self, ctx: &FileContext, severity: Severity, _error: &SweepError) {
            self.events.lock().unwrap().push(format!("fail {} {severity:?}", ctx.name));
        }

        fn on_alert(&self, ctx: &FileContext, _severity: Severity, _error: &SweepError) {
            self.events.lock().unwrap().push(format!("alert {}", ctx.name));
        }
    }

    #[test]
    fn unsupported_file_does_not_block_others() {
        let recorder = Arc::new(Recorder::default());
        let options = SweepOptions {
            observer: Some(recorder.clone()),
            alert_at_or_above: Severity::Error,
            ..Default::default()
        };
        let report = sweep(
            vec![
                UploadedFile::new("x.tsv", "a\tb\n"),
                UploadedFile::new("ok.csv", "a\n1\n"),
            ],
            &options,
        );

        assert_eq!(report.message, COMPLETION_MESSAGE);
        assert!(matches!(
            &report.files[0],
            FileOutcome::Failed { severity: Severity::Warning, error, .. } if error == "unsupported file type: .tsv"
        ));
        assert!(matches!(&report.files[1], FileOutcome::Processed(_)));
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["fail x.tsv Warning".to_string(), "ok ok.csv 1".to_string()]
        );
    }

    #[test]
    fn cleaning_is_ignored_unless_enabled() {
        let options = SweepOptions::default();
        let report = sweep(vec![UploadedFile::new("d.csv", "a\n1\n1\n")], &options);
        let FileOutcome::Processed(r) = &report.files[0] else {
            panic!("expected processed file");
        };
        assert_eq!(r.duplicates_removed, None);
        assert!(r.conversion.is_none());
        assert!(r.visualization.is_none());
    }

    #[test]
    fn bad_column_selection_fails_only_that_file() {
        let options = SweepOptions {
            columns: ColumnSelection::of(["a"]),
            ..Default::default()
        };
        let report = sweep(
            vec![UploadedFile::new("one.csv", "b\n1\n"), UploadedFile::new("two.csv", "a\n1\n")],
            &options,
        );
        assert!(matches!(&report.files[0], FileOutcome::Failed { severity: Severity::Error, .. }));
        assert!(matches!(&report.files[1], FileOutcome::Processed(r) if r.columns == vec!["a".to_string()]));
    }

    #[test]
    fn bad_chart_column_keeps_statistics_and_conversion() {
        let recorder = Arc::new(Recorder::default());
        let options = SweepOptions {
            visualization: Some(ChartRequest {
                kind: crate::chart::ChartKind::Line,
                columns: Some(vec!["score".to_string()]),
            }),
            convert: Some(ExportFormat::Csv),
            observer: Some(recorder.clone()),
            ..Default::default()
        };
        let report = sweep(
            vec![
                UploadedFile::new("a.csv", "score\n1\n"),
                UploadedFile::new("b.csv", "score,n\nhigh,1\n"),
            ],
            &options,
        );

        for outcome in &report.files {
            let FileOutcome::Processed(r) = outcome else {
                panic!("{} should still be processed", outcome.name());
            };
            assert!(matches!(r.conversion, Some(Conversion::Converted(_))));
        }

        let FileOutcome::Processed(b) = &report.files[1] else {
            unreachable!()
        };
        let viz = b.visualization.as_ref().unwrap();
        assert!(viz.chart.is_none());
        assert_eq!(viz.warnings, vec!["chart skipped: unknown column 'score'".to_string()]);
        assert_eq!(viz.statistics.len(), 1);
        assert_eq!(viz.statistics[0].column, "n");

        let events = recorder.events.lock().unwrap();
        assert!(events.contains(&"fail b.csv Error".to_string()));
        assert!(events.contains(&"warn b.csv chart skipped: unknown column 'score'".to_string()));
    }

    #[test]
    fn visualization_warnings_reach_observer() {
        let recorder = Arc::new(Recorder::default());
        let options = SweepOptions {
            visualization: Some(ChartRequest::default()),
            observer: Some(recorder.clone()),
            ..Default::default()
        };
        sweep(vec![UploadedFile::new("t.csv", "name\nAda\n")], &options);
        let events = recorder.events.lock().unwrap();
        assert!(events.iter().any(|e| e.starts_with("warn t.csv No numeric columns")));
    }
}
