//! calamine-backed conversion of a workbook into one text matrix per sheet.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use models::ParserSettings;
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::report::required_sheet_names;
use crate::RowMatrix;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// A sheet name together with its cell text.
pub type NamedSheet = (String, RowMatrix);

pub fn ensure_excel_extension<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(ParseError::UnsupportedFileType(path.display().to_string()))
    }
}

/// Reads the report sheets of the workbook at `path`, in workbook order.
pub fn read_workbook<P: AsRef<Path>>(
    path: P,
    settings: &ParserSettings,
) -> Result<Vec<NamedSheet>> {
    ensure_excel_extension(&path)?;
    let mut workbook = open_workbook_auto(&path)?;
    read_sheets(&mut workbook, settings)
}

/// Same as [`read_workbook`] for an in-memory upload.
pub fn read_workbook_bytes(
    bytes: Vec<u8>,
    settings: &ParserSettings,
) -> Result<Vec<NamedSheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheets(&mut workbook, settings)
}

/// Only the sheets the report needs are decoded, an unreadable extra sheet never matters.
fn read_sheets<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    settings: &ParserSettings,
) -> Result<Vec<NamedSheet>> {
    let sheet_names = workbook.sheet_names().to_vec();
    let required = required_sheet_names(&sheet_names, settings);
    debug!(sheets = sheet_names.len(), used = required.len(), "workbook sheets");

    let mut out = Vec::with_capacity(required.len());

    for sheet_name in required {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| ParseError::Sheet {
                sheet: sheet_name.clone(),
                source,
            })?;
        let matrix = range_to_matrix(&range);
        debug!(sheet = %sheet_name, rows = matrix.len(), "read sheet");
        out.push((sheet_name, matrix));
    }

    Ok(out)
}

/// Converts a calamine range to text rows in sheet coordinates.
///
/// calamine trims the range to the used area, so leading blank rows and columns are
/// re-inserted: cell (r, c) of the sheet is `matrix[r][c]`. Every row has the same width.
pub fn range_to_matrix(range: &Range<Data>) -> RowMatrix {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (_, width) = range.get_size();
    let full_width = start_col as usize + width;

    let mut matrix: RowMatrix = (0..start_row).map(|_| vec![String::new(); full_width]).collect();

    for row in range.rows() {
        let mut cells = Vec::with_capacity(full_width);
        cells.resize(start_col as usize, String::new());
        cells.extend(row.iter().map(cell_text));
        matrix.push(cells);
    }

    matrix
}

/// Display text of a cell. Empty and error cells are "".
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) if dt.is_duration() => dt.as_f64().to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Empty and error cells
        _ => String::new(),
    }
}

/// Excel serial date conversion using 1899-12-30 base (common convention).
fn excel_serial_to_date(v: f64) -> Option<NaiveDate> {
    if !v.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::try_days(v.floor() as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("TCS".to_string())), "TCS");
        assert_eq!(cell_text(&Data::Float(1200.0)), "1200");
        assert_eq!(cell_text(&Data::Float(-200.25)), "-200.25");
        assert_eq!(cell_text(&Data::Int(13)), "13");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2023-04-03T00:00:00".to_string())),
            "2023-04-03T00:00:00"
        );
    }

    #[test]
    fn test_cell_text_excel_dates() {
        let date = ExcelDateTime::new(45019.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(date)), "2023-04-03");

        // Time of day is dropped
        let date = ExcelDateTime::new(45019.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(date)), "2023-04-03");

        let duration = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_text(&Data::DateTime(duration)), "1.5");
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(45019.0),
            NaiveDate::from_ymd_opt(2023, 4, 3)
        );
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_range_to_matrix_keeps_sheet_coordinates() {
        // Used area B2:D3, as calamine reports a sheet whose first row and column are blank.
        let mut range = Range::new((1, 1), (2, 3));
        range.set_value((1, 1), Data::String("Client Name".to_string()));
        range.set_value((1, 2), Data::String("Jane Doe".to_string()));
        range.set_value((2, 1), Data::String("short term profit".to_string()));
        range.set_value((2, 2), Data::Float(1500.5));

        let m = range_to_matrix(&range);
        assert_eq!(m.len(), 3);
        assert!(m.iter().all(|r| r.len() == 4));
        assert!(m[0].iter().all(|c| c.is_empty()));
        assert_eq!(m[1][1], "Client Name");
        assert_eq!(m[1][2], "Jane Doe");
        assert_eq!(m[2][2], "1500.5");
        assert_eq!(m[2][3], "");
    }

    #[test]
    fn test_range_to_matrix_empty() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_matrix(&range).is_empty());
    }

    #[test]
    fn test_ensure_excel_extension() {
        assert!(ensure_excel_extension("Tax_PnL_FY2023.xlsx").is_ok());
        assert!(ensure_excel_extension("report.XLS").is_ok());
        assert!(matches!(
            ensure_excel_extension("report.csv"),
            Err(ParseError::UnsupportedFileType(_))
        ));
        assert!(ensure_excel_extension("no_extension").is_err());
    }

    #[test]
    fn test_read_workbook_rejects_other_extensions() {
        assert!(matches!(
            read_workbook("pnl.pdf", &ParserSettings::default()),
            Err(ParseError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_read_workbook_bytes_rejects_garbage() {
        assert!(matches!(
            read_workbook_bytes(b"not a workbook".to_vec(), &ParserSettings::default()),
            Err(ParseError::Workbook(_))
        ));
    }
}
