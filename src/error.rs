use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Convenience result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned by every loader entry point.
///
/// This is a single error enum shared by the text, CSV and (optional) workbook backends.
/// Use [`LoadError::kind`] to branch on the coarse failure class.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O error (file not found, permission denied, path is a directory).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Workbook error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The requested sheet does not exist in the workbook.
    #[error("sheet not found: {sheet} (available: {available:?})")]
    SheetNotFound { sheet: String, available: Vec<String> },

    /// Unknown format / output-shape string, or a format this build cannot load.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path or the selected sheet does not exist.
    NotFound,
    /// The file could not be read at the byte level.
    Io,
    /// The file was readable but its CSV/workbook structure is malformed.
    Parse,
    /// The caller passed an unknown format or output shape.
    InvalidArgument,
}

impl LoadError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io(err) => io_kind(err),
            LoadError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(io_err) => io_kind(io_err),
                _ => ErrorKind::Parse,
            },
            #[cfg(feature = "excel")]
            LoadError::Excel(err) => find_io_in_chain(err).map_or(ErrorKind::Parse, io_kind),
            LoadError::SheetNotFound { .. } => ErrorKind::NotFound,
            LoadError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }
}

fn io_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        _ => ErrorKind::Io,
    }
}

// Workbook errors wrap io errors a few layers deep (calamine -> zip -> io).
#[cfg_attr(not(feature = "excel"), allow(dead_code))]
fn find_io_in_chain<'a>(e: &'a (dyn StdError + 'static)) -> Option<&'a io::Error> {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err);
        }
        cur = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{ErrorKind, LoadError};

    #[test]
    fn io_not_found_is_classified_as_not_found() {
        let err = LoadError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_io_errors_are_classified_as_io() {
        let err = LoadError::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert_eq!(err.kind(), ErrorKind::Io);
        let err = LoadError::from(io::Error::new(io::ErrorKind::InvalidData, "truncated"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn workbook_errors_wrapping_io_take_the_io_kind() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = LoadError::from(calamine::Error::Io(denied));
        assert_eq!(err.kind(), ErrorKind::Io);

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = LoadError::from(calamine::Error::Io(missing));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = LoadError::from(calamine::Error::Msg("not a workbook"));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn sheet_and_argument_errors_have_fixed_kinds() {
        let err = LoadError::SheetNotFound {
            sheet: "Missing".to_string(),
            available: vec!["Sheet1".to_string()],
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("Missing"));

        let err = LoadError::invalid_argument("unknown output shape 'table'");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("invalid argument"));
    }
}
