//! Core data model types for loading.
//!
//! Backends produce [`Row`]s of [`Value`]s; the shaper turns them into a [`RecordSet`].

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::LoadError;

/// A single cell value.
///
/// Text and CSV sources only ever produce [`Value::Utf8`]; workbook cells keep their native type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty cell, or a header position the data row does not reach.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Workbook date/time.
    DateTime(DateTimeValue),
}

/// A workbook date/time cell.
///
/// Binary formats store a serial day number; ODS stores an ISO-8601 string. Whichever the
/// workbook had is kept, without conversion to a calendar type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DateTimeValue {
    /// Serial day number (days since the workbook epoch, fractional part is time of day).
    Serial(f64),
    /// ISO-8601 date/time text.
    Iso(String),
}

impl Value {
    /// Convenience constructor for string cells.
    pub fn utf8(s: impl Into<String>) -> Self {
        Value::Utf8(s.into())
    }

    /// Returns the string slice if this is a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Renders the value the way it is used as a record key.
    ///
    /// Whole floats drop their fractional part (`1.0` → `1`) so numeric header cells read
    /// naturally; null renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float64(v) => {
                // `i64::MAX as f64` rounds up to 2^63, so the half-open range is exact.
                if v.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(v) {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::Utf8(s) => f.write_str(s),
            Value::DateTime(DateTimeValue::Serial(v)) => write!(f, "{v}"),
            Value::DateTime(DateTimeValue::Iso(s)) => f.write_str(s),
        }
    }
}

/// One ordered tuple of cells from a tabular source.
pub type Row = Vec<Value>;

/// One data row keyed by header name, in header order.
pub type Record = IndexMap<String, Value>;

/// Output shape requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {
    /// Rows as arrays of cells.
    #[default]
    Array,
    /// Rows as header-keyed records. Only honoured when a header row is declared.
    Object,
}

impl FromStr for OutputShape {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(LoadError::invalid_argument(format!(
                "unknown output shape '{other}' (expected 'array' or 'object')"
            ))),
        }
    }
}

/// The loader's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordSet {
    /// Array shape.
    Rows(Vec<Row>),
    /// Object shape.
    Records(Vec<Record>),
}

impl RecordSet {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        match self {
            RecordSet::Rows(rows) => rows.len(),
            RecordSet::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The rows, if this is array shaped.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            RecordSet::Rows(rows) => Some(rows),
            RecordSet::Records(_) => None,
        }
    }

    /// The records, if this is object shaped.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            RecordSet::Rows(_) => None,
            RecordSet::Records(records) => Some(records),
        }
    }

    /// Convert into a JSON value for handing to a template context.
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing these types cannot fail: every map key is a String and every float is
        // emitted as a number (non-finite floats become null).
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
