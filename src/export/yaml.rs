//! YAML Export functionality

use std::io::Write;

use crate::error::{BillAggError, BillAggResult};

use super::json::AggregationExport;
use super::ExportTable;

/// Write an export table as YAML, preceded by a comment header
pub fn write_yaml<W: Write>(table: &ExportTable, writer: &mut W) -> BillAggResult<()> {
    let export = AggregationExport::new(table);

    writeln!(writer, "# Aggregated bills: {}", export.aggregation)
        .map_err(|e| BillAggError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| BillAggError::Export(e.to_string()))?;
    writeln!(writer, "# Records: {}", export.record_count)
        .map_err(|e| BillAggError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BillAggError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BillAggError::Export(e.to_string()))?;

    Ok(())
}
