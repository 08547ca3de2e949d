//! JSON Export functionality

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{BillAggError, BillAggResult};

use super::{ExportRecord, ExportTable};

/// Document written for one aggregation
#[derive(Serialize)]
pub struct AggregationExport<'a> {
    pub aggregation: &'a str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub record_count: usize,
    pub columns: &'a [String],
    pub records: Vec<ExportRecord<'a>>,
}

impl<'a> AggregationExport<'a> {
    pub fn new(table: &'a ExportTable) -> Self {
        Self {
            aggregation: &table.name,
            exported_at: table.generated_at,
            app_version: env!("CARGO_PKG_VERSION"),
            record_count: table.rows.len(),
            columns: &table.headers,
            records: table.records(),
        }
    }
}

/// Write an export table as pretty-printed JSON
pub fn write_json<W: Write>(table: &ExportTable, writer: &mut W) -> BillAggResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &AggregationExport::new(table))
        .map_err(|e| BillAggError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BillAggError::Export(e.to_string()))?;
    Ok(())
}
