//! Loading entrypoints and backends.
//!
//! Most callers should use [`load`] (from [`unified`]) which:
//!
//! - dispatches to a backend by [`TabularFormat`] (or infers it from the extension via [`load_auto`])
//! - reads the whole source and shapes it into a [`crate::types::RecordSet`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Backend functions returning raw rows are also available under:
//! - [`text`]
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod text;
pub mod unified;

pub use observability::{FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, StdErrObserver};
pub use unified::{
    LoadOptions, LoadRequest, SheetSelector, TabularFormat, list_from_csv, list_from_excel, list_from_text, load,
    load_async, load_auto, normalize_path, read_rows,
};
