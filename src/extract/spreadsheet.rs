//! Spreadsheet (xls/xlsx/ods) loading

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate, Timelike};
use log::debug;

use crate::config::TabularFileConfig;
use crate::error::{BillAggError, BillAggResult};

use super::tabular::LoadedRows;
use super::ExtractNotice;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Read the first sheet of a workbook into raw rows
pub fn load_rows(path: &Path, config: &TabularFileConfig) -> BillAggResult<LoadedRows> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BillAggError::Spreadsheet("workbook has no sheets".to_string()))??;

    let rows = rows_from_origin(&range);
    debug!("read {} rows from {}", rows.len(), path.display());

    slice_rows(rows, config.skip_rows(), config.skip_footers())
}

/// Render a sheet range as rows counted from cell A1
///
/// The range only covers the used cells, so blank leading rows and columns
/// are put back as empty cells.
pub fn rows_from_origin(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };
    let width = start_col + range.width();

    let mut rows = vec![vec![String::new(); width]; start_row];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![String::new(); start_col];
        cells.extend(row.iter().map(cell_to_string));
        cells
    }));
    rows
}

/// Drop the configured leading and trailing rows
///
/// At least one row must remain.
pub fn slice_rows(
    rows: Vec<Vec<String>>,
    skiprows: usize,
    skipfooters: usize,
) -> BillAggResult<LoadedRows> {
    let total_skip = skiprows + skipfooters;
    if total_skip >= rows.len() {
        return Err(BillAggError::Config(format!(
            "need to skip {} rows, only {} rows found",
            total_skip,
            rows.len()
        )));
    }

    let end = rows.len() - skipfooters;
    let rows: Vec<Vec<String>> = rows.into_iter().take(end).skip(skiprows).collect();
    let column_count = rows.first().map(Vec::len).unwrap_or(0);

    let mut loaded = LoadedRows::new(rows, column_count);
    if total_skip > 0 {
        loaded
            .notices
            .push(ExtractNotice::RowsSkipped { count: total_skip });
    }
    Ok(loaded)
}

/// Convert a cell to text
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_string(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Format an Excel serial date (days since 1899-12-30) as ISO text
///
/// The time is only written when it is not midnight.
pub fn excel_serial_to_string(serial: f64) -> String {
    let Some(base) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return serial.to_string();
    };
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    let datetime = base + Duration::milliseconds(millis);

    if datetime.num_seconds_from_midnight() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
