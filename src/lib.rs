//! `tabular-loader` reads tabular files into a uniform in-memory [`types::RecordSet`], ready to
//! hand to a template context.
//!
//! The primary entrypoint is [`ingestion::load`], which picks a backend by
//! [`ingestion::TabularFormat`], reads the whole file, and shapes the rows according to
//! [`ingestion::LoadOptions`].
//!
//! ## Formats
//!
//! - **Delimited text**: one row per line, split at every occurrence of an optional separator
//! - **CSV**: parsed with the `csv` crate; cells stay strings
//! - **Workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
//!   `.ods`; one sheet per load, cells keep their type (string/number/bool/date)
//!
//! ## Output shapes
//!
//! With `has_header`, the first row of the source is the header and is removed from the data.
//! [`types::OutputShape::Object`] then keys every data row by header position:
//!
//! - short rows map the missing keys to [`types::Value::Null`]
//! - extra cells past the header are dropped
//! - a repeated header name keeps its first position and takes the last value
//!
//! Without a header the output is always [`types::RecordSet::Rows`].
//!
//! ```no_run
//! use tabular_loader::ingestion::{load, LoadOptions, TabularFormat};
//! use tabular_loader::types::OutputShape;
//!
//! # fn main() -> Result<(), tabular_loader::LoadError> {
//! let opts = LoadOptions {
//!     has_header: true,
//!     shape: OutputShape::Object,
//!     separator: Some("|".to_string()),
//!     ..Default::default()
//! };
//! let records = load(TabularFormat::Text, "samples.txt", &opts)?;
//! let context = records.to_json();
//! println!("{context}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the load facade and the per-format backends
//! - [`shaping`]: header handling and output shapes
//! - [`types`]: cell, row and record-set types
//! - [`error`]: the error type shared by every backend

pub mod error;
pub mod ingestion;
pub mod shaping;
pub mod types;

pub use error::{ErrorKind, LoadError, LoadResult};
