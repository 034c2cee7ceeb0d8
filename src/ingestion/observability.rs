use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::{IngestionError, SweepError};

use super::unified::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a skipped file or an empty chart selection).
    Warning,
    /// Error-level event (a per-file action failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// Classify a per-file failure.
///
/// Unsupported formats only skip the file, so they are warnings; I/O problems are critical.
pub fn severity_for_error(e: &SweepError) -> Severity {
    match e {
        SweepError::Ingestion(IngestionError::UnsupportedFormat { .. }) => Severity::Warning,
        SweepError::Ingestion(IngestionError::Io(_)) => Severity::Critical,
        SweepError::Ingestion(IngestionError::Csv(err)) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        SweepError::Export(crate::error::ExportError::Io(_)) => Severity::Critical,
        _ => Severity::Error,
    }
}

/// Context about the file being processed.
#[derive(Debug, Clone)]
pub struct FileContext {
    /// Uploaded file name.
    pub name: String,
    /// Format decided from the name.
    pub format: FileFormat,
}

/// Minimal stats reported after a successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of parsed rows.
    pub rows: usize,
    /// Number of parsed columns.
    pub columns: usize,
}

/// Observer interface for per-file pipeline events.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait SweepObserver: Send + Sync {
    /// Called when a file has been parsed.
    fn on_ingested(&self, _ctx: &FileContext, _stats: IngestionStats) {}

    /// Called for user-visible, non-fatal warnings.
    fn on_warning(&self, _ctx: &FileContext, _message: &str) {}

    /// Called when a conversion produced a download buffer.
    fn on_converted(&self, _ctx: &FileContext, _file_name: &str, _bytes: usize) {}

    /// Called when processing of a file (or one of its actions) fails.
    fn on_failure(&self, _ctx: &FileContext, _severity: Severity, _error: &SweepError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SweepObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn SweepObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SweepObserver for CompositeObserver {
    fn on_ingested(&self, ctx: &FileContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_ingested(ctx, stats);
        }
    }

    fn on_warning(&self, ctx: &FileContext, message: &str) {
        for o in &self.observers {
            o.on_warning(ctx, message);
        }
    }

    fn on_converted(&self, ctx: &FileContext, file_name: &str, bytes: usize) {
        for o in &self.observers {
            o.on_converted(ctx, file_name, bytes);
        }
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards events to the [`log`] facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn on_ingested(&self, ctx: &FileContext, stats: IngestionStats) {
        log::info!(
            "[sweep][ok] format={:?} file={} rows={} columns={}",
            ctx.format,
            ctx.name,
            stats.rows,
            stats.columns
        );
    }

    fn on_warning(&self, ctx: &FileContext, message: &str) {
        log::warn!("[sweep][warn] file={} {}", ctx.name, message);
    }

    fn on_converted(&self, ctx: &FileContext, file_name: &str, bytes: usize) {
        log::info!("[sweep][convert] file={} output={} bytes={}", ctx.name, file_name, bytes);
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        match severity {
            Severity::Info => log::info!("[sweep][{severity:?}] file={} err={}", ctx.name, error),
            Severity::Warning => log::warn!("[sweep][{severity:?}] file={} err={}", ctx.name, error),
            Severity::Error | Severity::Critical => {
                log::error!("[sweep][{severity:?}] file={} err={}", ctx.name, error)
            }
        }
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        log::error!(
            "[ALERT][sweep][{:?}] format={:?} file={} err={}",
            severity,
            ctx.format,
            ctx.name,
            error
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl SweepObserver for FileObserver {
    fn on_ingested(&self, ctx: &FileContext, stats: IngestionStats) {
        self.append_line(&format!(
            "{} ok format={:?} file={} rows={} columns={}",
            unix_ts(),
            ctx.format,
            ctx.name,
            stats.rows,
            stats.columns
        ));
    }

    fn on_warning(&self, ctx: &FileContext, message: &str) {
        self.append_line(&format!("{} warn file={} {}", unix_ts(), ctx.name, message));
    }

    fn on_converted(&self, ctx: &FileContext, file_name: &str, bytes: usize) {
        self.append_line(&format!(
            "{} convert file={} output={} bytes={}",
            unix_ts(),
            ctx.name,
            file_name,
            bytes
        ));
    }

    fn on_failure(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.name,
            error
        ));
    }

    fn on_alert(&self, ctx: &FileContext, severity: Severity, error: &SweepError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} file={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.name,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
