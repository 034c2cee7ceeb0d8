use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use data_sweeper::chart::{ChartKind, ChartRequest};
use data_sweeper::export::ExportFormat;
use data_sweeper::ingestion::{CompositeObserver, FileObserver, LogObserver, SweepObserver, UploadedFile};
use data_sweeper::pipeline::{sweep, BatchReport, CleaningOptions, Conversion, FileOutcome, FileReport, SweepOptions};
use data_sweeper::processing::{ColumnSelection, EmptyColumnFill};
use data_sweeper::report::{render_statistics, render_table};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartArg {
    Bar,
    Line,
    Scatter,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Line => ChartKind::Line,
            ChartArg::Scatter => ChartKind::Scatter,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConvertArg {
    Csv,
    Excel,
}

impl From<ConvertArg> for ExportFormat {
    fn from(arg: ConvertArg) -> Self {
        match arg {
            ConvertArg::Csv => ExportFormat::Csv,
            ConvertArg::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "data-sweeper")]
#[command(about = "Preview, clean, chart and convert CSV/XLSX files")]
#[command(version)]
struct Cli {
    /// Files to process (.csv or .xlsx)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Enable the cleaning actions below
    #[arg(long)]
    clean: bool,

    /// Drop exact duplicate rows (with --clean)
    #[arg(long)]
    remove_duplicates: bool,

    /// Fill missing numeric values with the column mean (with --clean)
    #[arg(long)]
    fill_missing: bool,

    /// Fill numeric columns that have no values at all with 0 instead of leaving them empty
    #[arg(long)]
    fill_empty_with_zero: bool,

    /// Columns to keep, in order (default: all)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Chart numeric columns and print descriptive statistics
    #[arg(long)]
    visualize: bool,

    /// Chart type
    #[arg(long, value_enum, default_value = "bar")]
    chart: ChartArg,

    /// Numeric columns to chart (default: first two numeric columns)
    #[arg(long, value_delimiter = ',')]
    chart_columns: Vec<String>,

    /// Convert each file to this format
    #[arg(long, value_enum)]
    convert: Option<ConvertArg>,

    /// Directory for converted files and charts
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,

    /// Also append processing events to this file
    #[arg(long)]
    event_log: Option<PathBuf>,
}

impl Cli {
    fn sweep_options(&self) -> SweepOptions {
        let log: Arc<dyn SweepObserver> = Arc::new(LogObserver);
        let observer: Arc<dyn SweepObserver> = match &self.event_log {
            Some(path) => Arc::new(CompositeObserver::new(vec![log, Arc::new(FileObserver::new(path))])),
            None => log,
        };

        SweepOptions {
            cleaning: self.clean.then_some(CleaningOptions {
                remove_duplicates: self.remove_duplicates,
                fill_missing: self.fill_missing,
            }),
            empty_column_fill: if self.fill_empty_with_zero {
                EmptyColumnFill::Zero
            } else {
                EmptyColumnFill::LeaveMissing
            },
            columns: if self.columns.is_empty() {
                ColumnSelection::all()
            } else {
                ColumnSelection::of(self.columns.iter().cloned())
            },
            visualization: self.visualize.then(|| ChartRequest {
                kind: self.chart.into(),
                columns: (!self.chart_columns.is_empty()).then(|| self.chart_columns.clone()),
            }),
            convert: self.convert.map(Into::into),
            observer: Some(observer),
            ..Default::default()
        }
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes))
}

/// Absolute form of `path`; the parent must exist, the file itself need not.
fn resolved(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Hands out output paths that never hit an input file or an earlier output of this run.
#[derive(Debug, Default)]
struct OutputPaths {
    taken: HashSet<PathBuf>,
}

impl OutputPaths {
    fn protecting(inputs: &[PathBuf]) -> Self {
        Self {
            taken: inputs.iter().map(|p| resolved(p)).collect(),
        }
    }

    /// `dir/file_name`, or `dir/<stem>-<n><ext>` when that path is taken.
    fn claim(&mut self, dir: &Path, file_name: &str) -> PathBuf {
        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let ext = name
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut candidate = dir.join(file_name);
        let mut n = 1;
        while self.taken.contains(&resolved(&candidate)) {
            candidate = dir.join(format!("{stem}-{n}{ext}"));
            n += 1;
        }
        self.taken.insert(resolved(&candidate));
        candidate
    }
}

fn write_outputs(report: &FileReport, out_dir: &Path, paths: &mut OutputPaths) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(chart) = report.visualization.as_ref().and_then(|v| v.chart.as_ref()) {
        let stem = Path::new(&report.summary.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.summary.name.clone());
        let kind = format!("{:?}", chart.spec.kind).to_ascii_lowercase();
        let path = paths.claim(out_dir, &format!("{stem}.{kind}.svg"));
        fs::write(&path, &chart.svg).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    if let Some(Conversion::Converted(buffer)) = &report.conversion {
        let path = paths.claim(out_dir, &buffer.file_name);
        fs::write(&path, &buffer.bytes).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn size_line(size_kb: f64) -> String {
    format!("File size: {size_kb} KB")
}

fn print_report(report: &FileReport) {
    let s = &report.summary;
    println!("== {} ==", s.name);
    println!("File name: {}", s.name);
    println!("{}", size_line(s.size_kb));
    println!("Rows: {}  Columns: {}", s.rows, s.columns);
    println!("Preview of the first rows:");
    print!("{}", render_table(&s.preview));

    if let Some(removed) = report.duplicates_removed {
        println!("Duplicates removed: {removed}");
    }
    if let Some(fill) = &report.fill {
        println!("Missing values filled: {}", fill.total_filled());
    }
    println!("Columns: {}", report.columns.join(", "));

    if let Some(viz) = &report.visualization {
        for w in &viz.warnings {
            println!("warning: {w}");
        }
        if let Some(chart) = &viz.chart {
            println!("{}: {}", chart.spec.kind, chart.spec.columns.join(", "));
        }
        if !viz.statistics.is_empty() {
            println!("Descriptive statistics:");
            print!("{}", render_statistics(&viz.statistics));
        }
    }

    match &report.conversion {
        Some(Conversion::Converted(buffer)) => println!("{} ({}, {} bytes)", buffer.label, buffer.media_type, buffer.len()),
        Some(Conversion::Failed { error }) => println!("Error during conversion: {error}"),
        None => {}
    }
}

fn print_batch(batch: &BatchReport) {
    for outcome in &batch.files {
        match outcome {
            FileOutcome::Processed(report) => print_report(report),
            FileOutcome::Failed { name, error, .. } => {
                println!("== {name} ==");
                println!("Error: {error}");
            }
        }
        println!();
    }
    println!("{}", batch.message);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut uploads = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match read_upload(path) {
            Ok(file) => uploads.push(file),
            Err(err) => log::error!("skipping {}: {err:#}", path.display()),
        }
    }

    let batch = sweep(uploads, &cli.sweep_options());

    fs::create_dir_all(&cli.out_dir).with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let mut paths = OutputPaths::protecting(&cli.files);
    for outcome in &batch.files {
        if let FileOutcome::Processed(report) = outcome {
            match write_outputs(report, &cli.out_dir, &mut paths) {
                Ok(paths) => {
                    for p in paths {
                        log::info!("wrote {}", p.display());
                    }
                }
                Err(err) => log::error!("{}: {err:#}", report.summary.name),
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_batch(&batch);
    }
    Ok(())
}
