//! CSV Export functionality
//!
//! Writes an aggregation as a CSV file with a header line.

use std::io::Write;

use crate::error::{BillAggError, BillAggResult};

use super::ExportTable;

/// Write an export table as CSV
pub fn write_csv<W: Write>(table: &ExportTable, writer: &mut W) -> BillAggResult<()> {
    write_line(writer, &table.headers)?;
    for row in &table.rows {
        write_line(writer, row)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, cells: &[String]) -> BillAggResult<()> {
    let line = cells
        .iter()
        .map(|c| escape_csv(c))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line).map_err(|e| BillAggError::Export(e.to_string()))
}

/// Escape a string for CSV output
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
