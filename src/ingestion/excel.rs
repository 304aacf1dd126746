#![cfg(feature = "excel")]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{LoadError, LoadResult};
use crate::types::{DateTimeValue, Row, Value};

use super::unified::SheetSelector;

/// Read one sheet of a workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) into rows.
///
/// Behavior:
/// - Rows start at the first used row and follow sheet order; blank rows inside the used range
///   are kept (as empty rows)
/// - Column positions are absolute: if the used range starts at column C, each row begins with
///   two `Null` cells
/// - Trailing empty cells are not emitted, so a row is only as long as its last filled cell
/// - Cells keep their workbook type (string, integer, float, boolean, date/time)
pub fn read_sheet_rows(path: impl AsRef<Path>, sheet: &SheetSelector) -> LoadResult<Vec<Row>> {
    let path = path.as_ref();
    ensure_readable(path)?;
    let mut workbook = open_workbook_auto(path)?;

    let names = workbook.sheet_names();
    let name = resolve_sheet(&names, sheet)?;
    let range = workbook.worksheet_range(&name)?;
    Ok(range_to_rows(&range))
}

/// List the sheet names of a workbook, in workbook order.
pub fn list_sheet_names(path: impl AsRef<Path>) -> LoadResult<Vec<String>> {
    let path = path.as_ref();
    ensure_readable(path)?;
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

// Surface a missing or unreadable path (including a directory) as a plain io error rather
// than a format-specific one.
fn ensure_readable(path: &Path) -> LoadResult<()> {
    let mut first_byte = [0u8; 1];
    File::open(path)?.read(&mut first_byte)?;
    Ok(())
}

fn resolve_sheet(names: &[String], sheet: &SheetSelector) -> LoadResult<String> {
    let found = match sheet {
        SheetSelector::First => names.first(),
        SheetSelector::Name(name) => names.iter().find(|n| *n == name),
        SheetSelector::Index(idx) => names.get(*idx),
    };

    found.cloned().ok_or_else(|| LoadError::SheetNotFound {
        sheet: match sheet {
            SheetSelector::First => "<first>".to_string(),
            SheetSelector::Name(name) => name.clone(),
            SheetSelector::Index(idx) => format!("#{idx}"),
        },
        available: names.to_vec(),
    })
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|cells| {
            let mut row: Row = Vec::with_capacity(leading_cols + cells.len());
            row.resize(leading_cols, Value::Null);
            row.extend(cells.iter().map(convert_cell));
            while row.last().is_some_and(Value::is_null) {
                row.pop();
            }
            row
        })
        .collect()
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::DateTime(DateTimeValue::Serial(dt.as_f64())),
        Data::DateTimeIso(s) => Value::DateTime(DateTimeValue::Iso(s.clone())),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(e) => Value::Utf8(e.to_string()),
    }
}
