//! Load outcome reporting.
//!
//! Loading is silent unless [`super::unified::LoadOptions::observer`] is set. An observer hears
//! about every load exactly once: [`LoadObserver::on_success`] with the row counts, or
//! [`LoadObserver::on_failure`] with a [`LoadSeverity`] (followed by [`LoadObserver::on_alert`]
//! when the severity meets the configured threshold).
//!
//! Two line-oriented observers are provided: [`StdErrObserver`] and [`FileObserver`]. Both
//! render the same line format:
//!
//! ```text
//! loaded format=csv path=people.csv shape=object header=true rows=3 header_cols=2 records=2
//! failed[critical] format=text path=missing.txt shape=array header=false kind=NotFound err=...
//! ```

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ErrorKind, LoadError};
use crate::types::OutputShape;

use super::unified::{SheetSelector, TabularFormat};

/// How serious a failed load is.
///
/// Ordered, so it doubles as the alert threshold in `LoadOptions::alert_at_or_above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// The source was reachable but its content or the call was invalid.
    Error,
    /// The source could not be opened or read at all.
    Critical,
}

impl LoadSeverity {
    /// Severity assigned to a failed load.
    pub fn for_error(error: &LoadError) -> Self {
        match error.kind() {
            ErrorKind::NotFound | ErrorKind::Io => LoadSeverity::Critical,
            ErrorKind::Parse | ErrorKind::InvalidArgument => LoadSeverity::Error,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LoadSeverity::Error => "error",
            LoadSeverity::Critical => "critical",
        }
    }
}

/// What was asked of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    /// The input path after escaped-space normalization.
    pub path: PathBuf,
    pub format: TabularFormat,
    pub shape: OutputShape,
    pub has_header: bool,
    /// The sheet selector; `None` for non-workbook formats.
    pub sheet: Option<SheetSelector>,
}

impl fmt::Display for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = match self.format {
            TabularFormat::Text => "text",
            TabularFormat::Csv => "csv",
            TabularFormat::Excel => "excel",
        };
        let shape = match self.shape {
            OutputShape::Array => "array",
            OutputShape::Object => "object",
        };
        write!(
            f,
            "format={format} path={} shape={shape} header={}",
            self.path.display(),
            self.has_header
        )?;
        match &self.sheet {
            None => Ok(()),
            Some(SheetSelector::First) => write!(f, " sheet=<first>"),
            Some(SheetSelector::Name(name)) => write!(f, " sheet={name:?}"),
            Some(SheetSelector::Index(idx)) => write!(f, " sheet=#{idx}"),
        }
    }
}

/// Row counts for a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows produced by the backend, header included.
    pub physical_rows: usize,
    /// Width of the header row, when one was consumed.
    pub header_columns: Option<usize>,
    /// Rows or records returned to the caller.
    pub records: usize,
}

/// Receives load outcomes.
pub trait LoadObserver: Send + Sync {
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called after [`Self::on_failure`] when the severity meets the alert threshold.
    ///
    /// Forwards to [`Self::on_failure`] unless overridden.
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

enum Outcome<'a> {
    Loaded(LoadStats),
    Failed(LoadSeverity, &'a LoadError),
    Alert(LoadSeverity, &'a LoadError),
}

fn render(ctx: &LoadContext, outcome: Outcome<'_>) -> String {
    match outcome {
        Outcome::Loaded(stats) => {
            let header_cols = stats
                .header_columns
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            format!(
                "loaded {ctx} rows={} header_cols={header_cols} records={}",
                stats.physical_rows, stats.records
            )
        }
        Outcome::Failed(severity, error) => format!(
            "failed[{}] {ctx} kind={:?} err={error}",
            severity.label(),
            error.kind()
        ),
        Outcome::Alert(severity, error) => format!(
            "ALERT[{}] {ctx} kind={:?} err={error}",
            severity.label(),
            error.kind()
        ),
    }
}

/// Writes one line per event to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!("[tabular-loader] {}", render(ctx, Outcome::Loaded(stats)));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!("[tabular-loader] {}", render(ctx, Outcome::Failed(severity, error)));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!("[tabular-loader] {}", render(ctx, Outcome::Alert(severity, error)));
    }
}

/// Appends one timestamped line per event to a log file.
///
/// Writes are best-effort: a log file that cannot be opened or written never fails a load.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, ctx: &LoadContext, outcome: Outcome<'_>) {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let line = format!(
            "{}.{:03} {}",
            since_epoch.as_secs(),
            since_epoch.subsec_millis(),
            render(ctx, outcome)
        );

        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append(ctx, Outcome::Loaded(stats));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append(ctx, Outcome::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append(ctx, Outcome::Alert(severity, error));
    }
}
