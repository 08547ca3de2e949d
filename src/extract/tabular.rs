//! Format-agnostic extraction pipeline
//!
//! Loaded rows go through these stages, in order:
//!
//! 1. separate the header row
//! 2. trim every field
//! 3. resolve configured columns against the header and width
//! 4. parse each row's date/time
//! 5. put rows in chronological order
//! 6. resolve name, memo, amount and extra fields into records
//!
//! Timestamps are kept in a list parallel to the rows; the raw rows are
//! never widened with results.

use chrono::NaiveDateTime;
use log::debug;

use crate::config::TabularFileConfig;
use crate::error::{BillAggError, BillAggResult};

use super::assemble::assemble_record;
use super::columns::{ColumnResolver, ResolvedFields};
use super::datetime::DateTimeColumns;
use super::dateparse::DateHints;
use super::ordering::sort_chronologically;
use super::{ExtractNotice, Extraction};

/// Raw rows loaded by a format adapter
#[derive(Debug, Clone, Default)]
pub struct LoadedRows {
    /// All rows, header included, all of width `column_count`
    pub rows: Vec<Vec<String>>,
    pub column_count: usize,
    /// Notices raised while loading
    pub notices: Vec<ExtractNotice>,
}

impl LoadedRows {
    pub fn new(rows: Vec<Vec<String>>, column_count: usize) -> Self {
        Self {
            rows,
            column_count,
            notices: Vec::new(),
        }
    }
}

/// A data row with its parsed timestamp
struct DatedRow {
    timestamp: NaiveDateTime,
    cells: Vec<String>,
}

/// Run the extraction pipeline over loaded rows
pub fn extract_rows(loaded: LoadedRows, config: &TabularFileConfig) -> BillAggResult<Extraction> {
    let LoadedRows {
        mut rows,
        column_count,
        mut notices,
    } = loaded;

    let header = if config.has_header {
        if rows.is_empty() {
            return Err(BillAggError::Config(
                "Cannot find header: no valid rows".to_string(),
            ));
        }
        Some(trim_row(rows.remove(0)))
    } else {
        None
    };
    let rows: Vec<Vec<String>> = rows.into_iter().map(trim_row).collect();
    debug!("{} data rows, {} columns", rows.len(), column_count);

    let resolver = ColumnResolver::new(header.as_deref(), column_count);
    let fields = ResolvedFields::resolve(config, &resolver)?;

    if rows.is_empty() {
        return Ok(Extraction {
            records: Vec::new(),
            notices,
        });
    }

    let date_field = &config.fields.date;
    let dates = DateTimeColumns {
        date: &fields.date,
        time: fields.time,
        hints: DateHints::new(date_field.dayfirst, date_field.yearfirst),
    };
    let timestamps = dates.annotate(&rows)?;
    let mut dated: Vec<DatedRow> = timestamps
        .into_iter()
        .zip(rows)
        .map(|(timestamp, cells)| DatedRow { timestamp, cells })
        .collect();

    if sort_chronologically(&mut dated, |row| row.timestamp) {
        notices.push(ExtractNotice::Resorted);
    }

    let records = dated
        .iter()
        .map(|row| assemble_record(&row.cells, row.timestamp, &fields))
        .collect::<BillAggResult<Vec<_>>>()?;
    debug!("extracted {} records", records.len());

    Ok(Extraction { records, notices })
}

fn trim_row(row: Vec<String>) -> Vec<String> {
    row.into_iter().map(|cell| cell.trim().to_string()).collect()
}
