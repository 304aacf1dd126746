//! Unified loading entrypoint.
//!
//! Most callers should use [`load`], which reads a file with the backend selected by
//! [`TabularFormat`] and shapes the rows into a [`RecordSet`].
//!
//! - Paths have escaped spaces (`\ `) unescaped before opening.
//! - The whole source is read before shaping; any backend failure aborts the load.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it. Without one, nothing is logged.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::shaping::shape;
use crate::types::{OutputShape, RecordSet, Row};

use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::{csv, text};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// Line-oriented text, optionally split by a separator.
    Text,
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl TabularFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" | "tsv" | "tab" | "dat" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl FromStr for TabularFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" | "workbook" => Ok(Self::Excel),
            _ => Err(LoadError::invalid_argument(format!(
                "unknown format '{s}' (expected 'text', 'csv' or 'excel')"
            ))),
        }
    }
}

/// How to choose the sheet when loading a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelector {
    /// The first sheet in workbook order (default).
    #[default]
    First,
    /// A sheet by exact name.
    Name(String),
    /// A sheet by 0-based position in workbook order.
    Index(usize),
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Options controlling a load.
///
/// Use [`Default`] for common cases: no header, array shape, first sheet, no separator.
#[derive(Clone)]
pub struct LoadOptions {
    /// Treat the first produced row as the header.
    pub has_header: bool,
    /// Output shape. [`OutputShape::Object`] only applies when `has_header` is set.
    pub shape: OutputShape,
    /// Text-only: split each line at every occurrence of this separator.
    pub separator: Option<String>,
    /// Workbook-only: which sheet to read.
    pub sheet: SheetSelector,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("has_header", &self.has_header)
            .field("shape", &self.shape)
            .field("separator", &self.separator)
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            shape: OutputShape::Array,
            separator: None,
            sheet: SheetSelector::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a tabular file into a [`RecordSet`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row, header and record counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use tabular_loader::ingestion::{load, LoadOptions, TabularFormat};
/// use tabular_loader::types::OutputShape;
///
/// # fn main() -> Result<(), tabular_loader::LoadError> {
/// let opts = LoadOptions {
///     has_header: true,
///     shape: OutputShape::Object,
///     ..Default::default()
/// };
/// let people = load(TabularFormat::Csv, "people.csv", &opts)?;
/// println!("records={}", people.len());
/// # Ok(())
/// # }
/// ```
pub fn load(format: TabularFormat, path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<RecordSet> {
    let path = normalize_path(path.as_ref());

    let result = read_rows(format, &path, options).map(|rows| {
        let physical_rows = rows.len();
        let header_columns = if options.has_header { rows.first().map(Vec::len) } else { None };
        let records = shape(rows, options.has_header, options.shape);
        let stats = LoadStats {
            physical_rows,
            header_columns,
            records: records.len(),
        };
        (records, stats)
    });

    let Some(obs) = options.observer.as_ref() else {
        return result.map(|(records, _)| records);
    };

    let ctx = LoadContext {
        path,
        format,
        shape: options.shape,
        has_header: options.has_header,
        sheet: (format == TabularFormat::Excel).then(|| options.sheet.clone()),
    };
    match result {
        Ok((records, stats)) => {
            obs.on_success(&ctx, stats);
            Ok(records)
        }
        Err(e) => {
            let sev = LoadSeverity::for_error(&e);
            obs.on_failure(&ctx, sev, &e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(&ctx, sev, &e);
            }
            Err(e)
        }
    }
}

/// Like [`load`], inferring the format from the file extension.
pub fn load_auto(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<RecordSet> {
    let path = path.as_ref();
    let format = infer_format_from_path(path)?;
    load(format, path, options)
}

/// Run [`load`] on tokio's blocking pool.
///
/// The returned future resolves exactly once with the load result. Dropping the future does not
/// stop a read already in progress; its result is discarded.
///
/// Must be awaited inside a tokio runtime.
pub async fn load_async(
    format: TabularFormat,
    path: impl Into<PathBuf>,
    options: LoadOptions,
) -> LoadResult<RecordSet> {
    let path = path.into();
    match tokio::task::spawn_blocking(move || load(format, &path, &options)).await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(LoadError::Io(io::Error::other(err))),
    }
}

/// Load a delimited-text file.
///
/// `return_type` is `"array"` or `"object"`.
pub fn list_from_text(
    path: impl AsRef<Path>,
    separator: Option<&str>,
    has_header: bool,
    return_type: &str,
) -> LoadResult<RecordSet> {
    let options = LoadOptions {
        has_header,
        shape: return_type.parse()?,
        separator: separator.map(str::to_owned),
        ..Default::default()
    };
    load(TabularFormat::Text, path, &options)
}

/// Load a CSV file.
///
/// `return_type` is `"array"` or `"object"`.
pub fn list_from_csv(path: impl AsRef<Path>, has_header: bool, return_type: &str) -> LoadResult<RecordSet> {
    let options = LoadOptions {
        has_header,
        shape: return_type.parse()?,
        ..Default::default()
    };
    load(TabularFormat::Csv, path, &options)
}

/// Load one sheet of a workbook.
///
/// `return_type` is `"array"` or `"object"`.
pub fn list_from_excel(
    path: impl AsRef<Path>,
    sheet: impl Into<SheetSelector>,
    has_header: bool,
    return_type: &str,
) -> LoadResult<RecordSet> {
    let options = LoadOptions {
        has_header,
        shape: return_type.parse()?,
        sheet: sheet.into(),
        ..Default::default()
    };
    load(TabularFormat::Excel, path, &options)
}

/// Read the raw rows of a source with the backend for `format`, before any shaping.
pub fn read_rows(format: TabularFormat, path: &Path, options: &LoadOptions) -> LoadResult<Vec<Row>> {
    match format {
        TabularFormat::Text => text::read_text_rows_to_end(path, options.separator.as_deref()),
        TabularFormat::Csv => csv::read_csv_rows(path),
        TabularFormat::Excel => read_excel_dispatch(path, &options.sheet),
    }
}

fn read_excel_dispatch(path: &Path, sheet: &SheetSelector) -> LoadResult<Vec<Row>> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, sheet);

    #[cfg(feature = "excel")]
    {
        super::excel::read_sheet_rows(path, sheet)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(LoadError::invalid_argument(
            "excel loading not enabled (enable cargo feature 'excel')",
        ))
    }
}

/// Unescape shell-style escaped spaces (`\ `) in a path.
pub fn normalize_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if s.contains("\\ ") => PathBuf::from(s.replace("\\ ", " ")),
        _ => path.to_path_buf(),
    }
}

fn infer_format_from_path(path: &Path) -> LoadResult<TabularFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            LoadError::invalid_argument(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;

    TabularFormat::from_extension(ext).ok_or_else(|| {
        LoadError::invalid_argument(format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ))
    })
}

/// Owned load request, for callers that queue loads in a job system.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub format: TabularFormat,
    pub path: PathBuf,
    pub options: LoadOptions,
}

impl LoadRequest {
    pub fn new(format: TabularFormat, path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            format,
            path: path.into(),
            options,
        }
    }

    /// Execute the request by calling [`load`].
    pub fn run(&self) -> LoadResult<RecordSet> {
        load(self.format, &self.path, &self.options)
    }

    /// Execute the request on tokio's blocking pool, see [`load_async`].
    pub async fn run_async(self) -> LoadResult<RecordSet> {
        load_async(self.format, self.path, self.options).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{TabularFormat, infer_format_from_path, normalize_path};
    use crate::error::ErrorKind;

    #[test]
    fn escaped_spaces_are_unescaped() {
        assert_eq!(
            normalize_path(Path::new("/data/my\\ files/a\\ b.csv")),
            PathBuf::from("/data/my files/a b.csv")
        );
        assert_eq!(normalize_path(Path::new("/data/plain.csv")), PathBuf::from("/data/plain.csv"));
    }

    #[test]
    fn format_names_parse_and_unknown_names_fail() {
        assert_eq!("csv".parse::<TabularFormat>().unwrap(), TabularFormat::Csv);
        assert_eq!("Text".parse::<TabularFormat>().unwrap(), TabularFormat::Text);
        assert_eq!("excel".parse::<TabularFormat>().unwrap(), TabularFormat::Excel);
        let err = "parquet".parse::<TabularFormat>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn format_inference_uses_extension() {
        assert_eq!(infer_format_from_path(Path::new("a.CSV")).unwrap(), TabularFormat::Csv);
        assert_eq!(infer_format_from_path(Path::new("a.xlsx")).unwrap(), TabularFormat::Excel);
        assert_eq!(infer_format_from_path(Path::new("a.txt")).unwrap(), TabularFormat::Text);
        assert_eq!(
            infer_format_from_path(Path::new("noext")).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            infer_format_from_path(Path::new("a.parquet")).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }
}
