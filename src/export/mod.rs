//! Export module for the bill aggregator
//!
//! Writes each aggregation to `{aggregation}.{ext}` in the bills directory:
//! - CSV: spreadsheet-compatible, one line per record
//! - JSON: machine-readable, records as objects keyed by column header
//! - YAML: human-readable, same layout as JSON with a comment header
//! - XLSX: an Excel table styled from `export_config`
//!
//! The columns come from `export_config`, or a default set.

pub mod csv;
pub mod json;
pub mod xlsx;
pub mod yaml;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::info;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::{AppConfig, ColumnData, ExportColumn, ExportConfig, ExportType, WorkPaths};
use crate::error::{BillAggError, BillAggResult};
use crate::models::AggregatedRecord;
use crate::services::Aggregation;

pub use self::csv::write_csv;
pub use self::json::write_json;
pub use self::xlsx::{write_xlsx, XlsxLayout};
pub use self::yaml::write_yaml;

/// An aggregation laid out as export columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub generated_at: DateTime<Utc>,
}

impl ExportTable {
    /// Lay out an aggregation with the given columns
    pub fn build(aggregation: &Aggregation, columns: &[ExportColumn]) -> Self {
        Self {
            name: aggregation.name.clone(),
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            rows: aggregation
                .records
                .iter()
                .map(|record| columns.iter().map(|c| cell_value(record, &c.data)).collect())
                .collect(),
            generated_at: Utc::now(),
        }
    }

    /// Rows paired with their headers, for keyed formats
    pub fn records(&self) -> Vec<ExportRecord<'_>> {
        self.rows
            .iter()
            .map(|values| ExportRecord {
                headers: &self.headers,
                values,
            })
            .collect()
    }
}

/// One exported row, serialized as a map in column order
pub struct ExportRecord<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl Serialize for ExportRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, value) in self.headers.iter().zip(self.values) {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

fn cell_value(record: &AggregatedRecord, data: &ColumnData) -> String {
    match data {
        ColumnData::ExtractedField { field } => record.field(field).unwrap_or_default(),
        ColumnData::Empty => String::new(),
        ColumnData::Custom { value } => value.clone(),
    }
}

/// Write an export table in the given format
pub fn write_table<W: Write>(
    table: &ExportTable,
    export_type: ExportType,
    export_config: &ExportConfig,
    writer: &mut W,
) -> BillAggResult<()> {
    match export_type {
        ExportType::Csv => write_csv(table, writer),
        ExportType::Json => write_json(table, writer),
        ExportType::Yaml => write_yaml(table, writer),
        ExportType::Xlsx => {
            let layout = XlsxLayout::from_config(export_config)?;
            write_xlsx(table, &layout, writer)
        }
    }
}

/// Export every aggregation to its file, returning the written paths
pub fn export_aggregations(
    aggregations: &[Aggregation],
    config: &AppConfig,
    paths: &WorkPaths,
) -> BillAggResult<Vec<PathBuf>> {
    let columns = config.export_config.effective_columns();
    let mut written = Vec::new();

    for aggregation in aggregations {
        let path = paths.output_file(&aggregation.name, config.export_to.extension());
        let file = File::create(&path).map_err(|e| {
            BillAggError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);

        let table = ExportTable::build(aggregation, &columns);
        write_table(&table, config.export_to, &config.export_config, &mut writer)?;
        writer
            .flush()
            .map_err(|e| BillAggError::Export(e.to_string()))?;

        info!(
            "Exported {} records to {}",
            table.rows.len(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_aggregation;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_default_columns() {
        let columns = crate::config::ExportConfig::default().effective_columns();
        let table = ExportTable::build(&sample_aggregation(), &columns);
        assert_eq!(
            table.headers,
            vec!["Date", "Time", "Account", "Name", "Memo", "Amount", "Type"]
        );
        assert_eq!(
            table.rows[1],
            vec![
                "2020-01-02",
                "00:00:00",
                "Visa",
                "Shop, Inc.",
                "said \"hi\"",
                "-10.00",
                "out"
            ]
        );
    }

    #[test]
    fn test_build_custom_columns() {
        let columns = vec![
            ExportColumn::field("When", "date"),
            ExportColumn {
                header: "Note".into(),
                data: ColumnData::Empty,
                style: None,
            },
            ExportColumn {
                header: "Source".into(),
                data: ColumnData::Custom {
                    value: "bank".into(),
                },
                style: None,
            },
            ExportColumn::field("Currency", "currency"),
        ];
        let table = ExportTable::build(&sample_aggregation(), &columns);
        assert_eq!(table.rows[0], vec!["2020-01-01", "", "bank", "USD"]);
    }

    #[test]
    fn test_export_aggregations_writes_files() {
        let dir = TempDir::new().unwrap();
        let paths = WorkPaths::with_paths(dir.path().join("config.yaml"), dir.path().to_path_buf());
        let mut config = AppConfig::from_yaml("bill_groups: []\nexport_to: json\n").unwrap();

        let written = export_aggregations(&[sample_aggregation()], &config, &paths).unwrap();
        assert_eq!(written, vec![dir.path().join("result.json")]);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(json["records"][1]["Amount"], "-10.00");

        config.export_to = ExportType::Csv;
        let written = export_aggregations(&[sample_aggregation()], &config, &paths).unwrap();
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.starts_with("Date,Time,Account,Name,Memo,Amount,Type\n"));
    }
}
