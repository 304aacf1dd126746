//! CSV backend.

use std::fs::File;
use std::path::Path;

use crate::error::LoadResult;
use crate::types::{Row, Value};

/// Read a CSV file into rows of string cells.
///
/// Rules:
///
/// - The first record is an ordinary row; header handling belongs to the shaper.
/// - Records may have differing lengths.
/// - Cells are kept verbatim (no trimming, no numeric coercion).
/// - A malformed record anywhere aborts the read; no partial rows are returned.
pub fn read_csv_rows(path: impl AsRef<Path>) -> LoadResult<Vec<Row>> {
    // Opening through `File` keeps a missing path a plain io error.
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    read_csv_rows_from_reader(&mut rdr)
}

/// Read rows from an existing CSV reader.
///
/// The reader's own header setting is respected: if it was built with `has_headers(true)`, its
/// header record is not part of the returned rows.
pub fn read_csv_rows_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> LoadResult<Vec<Row>> {
    let mut rows: Vec<Row> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(Value::utf8).collect());
    }
    Ok(rows)
}
