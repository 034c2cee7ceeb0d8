//! Per-file processing session.
//!
//! A [`FileSession`] owns one parsed table and moves through a fixed order of [`Stage`]s,
//! driven by discrete [`Action`]s:
//!
//! ```text
//! Uploaded ──clean──▶ Cleaned ──project──▶ Projected ──visualize──▶ Visualized
//!     │                  │                     │                        │
//!     └──────project─────┘                     └────────convert─────────┴──▶ Converted
//! ```
//!
//! - Cleaning is only possible before projection.
//! - Visualizing or converting without an explicit projection applies the default
//!   (all-columns) projection first.
//! - Visualization and conversion may be repeated; neither changes the table.

use std::fmt;

use serde::Serialize;

use crate::chart::{visualize, ChartRequest, Visualization};
use crate::error::{IngestionResult, SweepError, SweepResult};
use crate::export::{export, ExportBuffer, ExportFormat};
use crate::ingestion::{ingest, FileFormat, IngestOptions, UploadedFile};
use crate::processing::{
    fill_missing_with_mean, project, remove_duplicates, ColumnSelection, EmptyColumnFill, FillReport,
};
use crate::report::{summarize, FileSummary};
use crate::types::DataSet;

/// Position of a file in the processing flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Uploaded,
    Cleaned,
    Projected,
    Visualized,
    Converted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uploaded => "uploaded",
            Self::Cleaned => "cleaned",
            Self::Projected => "projected",
            Self::Visualized => "visualized",
            Self::Converted => "converted",
        };
        f.write_str(s)
    }
}

/// A user action on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RemoveDuplicates,
    FillMissing,
    Project(ColumnSelection),
    Visualize(ChartRequest),
    Convert(ExportFormat),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "remove duplicates",
            Self::FillMissing => "fill missing values",
            Self::Project(_) => "select columns",
            Self::Visualize(_) => "visualize",
            Self::Convert(_) => "convert",
        }
    }
}

/// Result of one [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    DuplicatesRemoved { removed: usize },
    MissingFilled(FillReport),
    Projected { columns: Vec<String> },
    Visualized(Visualization),
    Converted(ExportBuffer),
}

/// One uploaded file and its current table.
#[derive(Debug, Clone)]
pub struct FileSession {
    file: UploadedFile,
    format: FileFormat,
    table: DataSet,
    stage: Stage,
    empty_column_fill: EmptyColumnFill,
}

impl FileSession {
    /// Parse `file` and start a session in [`Stage::Uploaded`].
    pub fn open(file: UploadedFile, options: &IngestOptions) -> IngestionResult<Self> {
        let table = ingest(&file, options)?;
        Ok(Self::from_parts(file, table))
    }

    /// Start a session from an already-parsed table.
    pub fn from_parts(file: UploadedFile, table: DataSet) -> Self {
        Self {
            format: file.format(),
            file,
            table,
            stage: Stage::Uploaded,
            empty_column_fill: EmptyColumnFill::default(),
        }
    }

    /// Choose how [`Action::FillMissing`] treats numeric columns with no values at all.
    pub fn with_empty_column_fill(mut self, policy: EmptyColumnFill) -> Self {
        self.empty_column_fill = policy;
        self
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }

    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The current (possibly cleaned and projected) table.
    pub fn table(&self) -> &DataSet {
        &self.table
    }

    /// Name, size and preview of the current table.
    pub fn summary(&self) -> FileSummary {
        summarize(&self.file, &self.table)
    }

    /// Apply one action, enforcing the stage order.
    pub fn apply(&mut self, action: Action) -> SweepResult<ActionOutcome> {
        match action {
            Action::RemoveDuplicates => {
                self.require_before_projection(&Action::RemoveDuplicates)?;
                let removed = remove_duplicates(&mut self.table);
                self.stage = Stage::Cleaned;
                Ok(ActionOutcome::DuplicatesRemoved { removed })
            }
            Action::FillMissing => {
                self.require_before_projection(&Action::FillMissing)?;
                let report = fill_missing_with_mean(&mut self.table, self.empty_column_fill);
                self.stage = Stage::Cleaned;
                Ok(ActionOutcome::MissingFilled(report))
            }
            Action::Project(selection) => {
                if self.stage > Stage::Projected {
                    return Err(self.invalid(&Action::Project(selection)));
                }
                self.table = project(&self.table, &selection)?;
                self.stage = Stage::Projected;
                Ok(ActionOutcome::Projected {
                    columns: self.table.schema.field_names().map(str::to_owned).collect(),
                })
            }
            Action::Visualize(request) => {
                self.ensure_projected();
                let viz = visualize(&self.table, &request)?;
                self.stage = self.stage.max(Stage::Visualized);
                Ok(ActionOutcome::Visualized(viz))
            }
            Action::Convert(format) => {
                self.ensure_projected();
                let buffer = export(&self.table, &self.file.name, format)?;
                self.stage = Stage::Converted;
                Ok(ActionOutcome::Converted(buffer))
            }
        }
    }

    /// Shorthand for [`Action::RemoveDuplicates`]; returns the number of rows removed.
    pub fn remove_duplicates(&mut self) -> SweepResult<usize> {
        match self.apply(Action::RemoveDuplicates)? {
            ActionOutcome::DuplicatesRemoved { removed } => Ok(removed),
            _ => unreachable!("remove duplicates yields DuplicatesRemoved"),
        }
    }

    /// Shorthand for [`Action::FillMissing`].
    pub fn fill_missing(&mut self) -> SweepResult<FillReport> {
        match self.apply(Action::FillMissing)? {
            ActionOutcome::MissingFilled(report) => Ok(report),
            _ => unreachable!("fill missing yields MissingFilled"),
        }
    }

    /// Shorthand for [`Action::Project`].
    pub fn project(&mut self, selection: ColumnSelection) -> SweepResult<()> {
        self.apply(Action::Project(selection)).map(|_| ())
    }

    /// Shorthand for [`Action::Visualize`].
    pub fn visualize(&mut self, request: ChartRequest) -> SweepResult<Visualization> {
        match self.apply(Action::Visualize(request))? {
            ActionOutcome::Visualized(viz) => Ok(viz),
            _ => unreachable!("visualize yields Visualized"),
        }
    }

    /// Shorthand for [`Action::Convert`].
    pub fn convert(&mut self, format: ExportFormat) -> SweepResult<ExportBuffer> {
        match self.apply(Action::Convert(format))? {
            ActionOutcome::Converted(buffer) => Ok(buffer),
            _ => unreachable!("convert yields Converted"),
        }
    }

    fn ensure_projected(&mut self) {
        if self.stage < Stage::Projected {
            self.stage = Stage::Projected;
        }
    }

    fn require_before_projection(&self, action: &Action) -> SweepResult<()> {
        if self.stage >= Stage::Projected {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn invalid(&self, action: &Action) -> SweepError {
        SweepError::InvalidTransition {
            stage: self.stage.to_string(),
            action: action.name().to_string(),
        }
    }
}
