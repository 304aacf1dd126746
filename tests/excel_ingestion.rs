#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tabular_loader::ErrorKind;
use tabular_loader::ingestion::excel::{list_sheet_names, read_sheet_rows};
use tabular_loader::ingestion::{SheetSelector, list_from_excel};
use tabular_loader::types::{DateTimeValue, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-loader-{name}-{nanos}.xlsx"))
}

fn write_people_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();

    let ws = wb.add_worksheet();
    ws.set_name("People").unwrap();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "active").unwrap();
    ws.write_string(0, 3, "joined").unwrap();

    let date_fmt = Format::new().set_num_format("yyyy-mm-dd");
    let joined = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();

    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    ws.write_boolean(1, 2, true).unwrap();
    ws.write_datetime_with_format(1, 3, &joined, &date_fmt).unwrap();

    // row 2 left blank on purpose
    ws.write_number(3, 0, 2).unwrap();
    ws.write_string(3, 1, "Grace").unwrap();
    ws.write_boolean(3, 2, false).unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Offset").unwrap();
    ws2.write_string(2, 2, "k").unwrap();
    ws2.write_string(2, 3, "v").unwrap();
    ws2.write_string(3, 2, "x").unwrap();
    ws2.write_number(3, 3, 2.5).unwrap();

    wb.save(path).unwrap();
}

#[test]
fn read_first_sheet_keeps_cell_types() {
    let path = tmp_file("people");
    write_people_xlsx(&path);

    let rows = read_sheet_rows(&path, &SheetSelector::First).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][1], Value::utf8("name"));
    assert_eq!(rows[1][0], Value::Float64(1.0));
    assert_eq!(rows[1][1], Value::utf8("Ada"));
    assert_eq!(rows[1][2], Value::Bool(true));
    assert!(matches!(
        rows[1][3],
        Value::DateTime(DateTimeValue::Serial(v)) if (v - 45306.0).abs() < 1e-9
    ));
    assert_eq!(rows[3][2], Value::Bool(false));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn blank_rows_inside_the_sheet_are_preserved() {
    let path = tmp_file("blank-row");
    write_people_xlsx(&path);

    let rows = read_sheet_rows(&path, &SheetSelector::Name("People".to_string())).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows[2].iter().all(Value::is_null));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn columns_are_absolute_and_leading_blank_rows_skipped() {
    let path = tmp_file("offset");
    write_people_xlsx(&path);

    let rows = read_sheet_rows(&path, &SheetSelector::Index(1)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        vec![Value::Null, Value::Null, Value::utf8("k"), Value::utf8("v")]
    );
    assert_eq!(rows[1][3], Value::Float64(2.5));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn unknown_sheet_is_not_found() {
    let path = tmp_file("missing-sheet");
    write_people_xlsx(&path);

    let err = read_sheet_rows(&path, &SheetSelector::Name("Nope".to_string())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("People"));

    let err = read_sheet_rows(&path, &SheetSelector::Index(5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn sheet_names_in_workbook_order() {
    let path = tmp_file("names");
    write_people_xlsx(&path);

    assert_eq!(list_sheet_names(&path).unwrap(), vec!["People", "Offset"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn corrupt_workbook_is_a_parse_error() {
    let path = tmp_file("corrupt");
    std::fs::write(&path, b"definitely not a zip archive").unwrap();

    let err = read_sheet_rows(&path, &SheetSelector::First).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_workbook_is_not_found() {
    let err = read_sheet_rows("tests/fixtures/does_not_exist.xlsx", &SheetSelector::First).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn rows_stop_at_their_last_filled_cell() {
    let path = tmp_file("ragged");
    write_people_xlsx(&path);

    let rows = read_sheet_rows(&path, &SheetSelector::First).unwrap();
    assert_eq!(rows[1].len(), 4);
    assert!(rows[2].is_empty());
    assert_eq!(
        rows[3],
        vec![Value::Float64(2.0), Value::utf8("Grace"), Value::Bool(false)]
    );

    // object shape still pads the missing column back in
    let out = list_from_excel(&path, "People", true, "object").unwrap();
    let grace = &out.records().unwrap()[2];
    assert_eq!(grace["joined"], Value::Null);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn offset_sheet_header_skips_leading_blank_columns() {
    let path = tmp_file("offset-objects");
    write_people_xlsx(&path);

    let out = list_from_excel(&path, "Offset", true, "object").unwrap();
    assert_eq!(out.to_json(), serde_json::json!([{ "k": "x", "v": 2.5 }]));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn directory_with_workbook_extension_is_an_io_error() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tabular-loader-dir-{nanos}"));
    let path = dir.join("x.xlsx");
    std::fs::create_dir_all(&path).unwrap();

    let err = read_sheet_rows(&path, &SheetSelector::First).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let err = list_from_excel(&path, SheetSelector::First, false, "array").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let _ = std::fs::remove_dir_all(&dir);
}
