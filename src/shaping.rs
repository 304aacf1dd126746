//! Turning backend rows into the caller's [`RecordSet`].
//!
//! Shaping is pure and format-agnostic: every backend hands over its complete, 0-based rows and
//! this module decides what the header is and how data rows are presented.

use crate::types::{OutputShape, Record, RecordSet, Row, Value};

/// Shape `rows` into a [`RecordSet`].
///
/// - With `has_header`, the first row is taken as the header and removed from the data rows.
/// - [`OutputShape::Object`] with a header yields one [`Record`] per data row, keyed positionally
///   by header cell. Short rows map missing keys to [`Value::Null`]; cells past the end of the
///   header are dropped. Repeated header names keep the first key position and the last value.
///   Blank header cells (null or empty string) name no key; the cells under them are skipped.
/// - Everything else yields the data rows unchanged.
///
/// An empty input always produces an empty record set, with or without a header.
pub fn shape(rows: Vec<Row>, has_header: bool, output: OutputShape) -> RecordSet {
    let mut rows = rows.into_iter();
    let header = if has_header { rows.next() } else { None };

    match (header, output) {
        (Some(header), OutputShape::Object) => {
            let keys: Vec<Option<String>> = header.iter().map(header_key).collect();
            RecordSet::Records(rows.map(|row| to_record(&keys, row)).collect())
        }
        (None, OutputShape::Object) if has_header => RecordSet::Records(Vec::new()),
        _ => RecordSet::Rows(rows.collect()),
    }
}

fn header_key(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::Utf8(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn to_record(keys: &[Option<String>], row: Row) -> Record {
    let mut cells = row.into_iter();
    let mut record = Record::with_capacity(keys.len());
    for key in keys {
        // Advance even for blank header positions so later cells stay aligned.
        let value = cells.next().unwrap_or(Value::Null);
        if let Some(key) = key {
            record.insert(key.clone(), value);
        }
    }
    record
}
