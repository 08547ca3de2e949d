//! Export settings
//!
//! Describes the output columns of the aggregated bill files.

use serde::{Deserialize, Serialize};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    #[default]
    Csv,
    Json,
    Yaml,
    Xlsx,
}

impl ExportType {
    /// File extension for the output file
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Where the value of an export column comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ColumnData {
    /// A field of the aggregated record (core or extra field)
    ExtractedField { field: String },
    /// Always empty, left for manual notes
    Empty,
    /// The same literal text on every row
    Custom { value: String },
}

/// Presentation of one column in spreadsheet exports
///
/// Plain-text formats ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

/// One output column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportColumn {
    pub header: String,
    pub data: ColumnData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ColumnStyle>,
}

impl ExportColumn {
    /// A column holding an extracted field
    pub fn field(header: &str, field: &str) -> Self {
        Self {
            header: header.to_string(),
            data: ColumnData::ExtractedField {
                field: field.to_string(),
            },
            style: None,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Font size of every cell in spreadsheet exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    /// Height of every row in spreadsheet exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_height: Option<f64>,

    /// Excel table style name, e.g. "Table Style Light 2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_style: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ExportColumn>,
}

impl ExportConfig {
    /// Configured columns, or the default column set
    pub fn effective_columns(&self) -> Vec<ExportColumn> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        vec![
            ExportColumn::field("Date", "date"),
            ExportColumn::field("Time", "time"),
            ExportColumn::field("Account", "account"),
            ExportColumn::field("Name", "name"),
            ExportColumn::field("Memo", "final_memo"),
            ExportColumn::field("Amount", "amount"),
            ExportColumn::field("Type", "amount_type"),
        ]
    }
}
