//! Aggregation settings loaded from the YAML config file
//!
//! One config file describes any number of bill groups (accounts), how
//! their statement files are laid out, and how the aggregated result is
//! exported.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::export_config::{ColumnData, ExportConfig, ExportType};
use super::file_config::{AmountFieldConfig, ColumnRef, TabularFileConfig};
use crate::error::{BillAggError, BillAggResult};
use crate::models::record::{CORE_FIELDS, GROUP_FIELDS};

/// Default name of the config file
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default aggregation (output file stem)
pub const DEFAULT_AGGREGATION: &str = "result";

/// Kind of statement file a bill group consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Delimited text
    Csv,
    /// Spreadsheet workbook
    Xls,
}

impl FileType {
    /// Lower-case file extensions accepted for this file type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Csv => &["csv"],
            Self::Xls => &["xls", "xlsx", "ods"],
        }
    }

    /// Check if a path has an extension of this file type
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions().iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Csv => write!(f, "csv"),
            FileType::Xls => write!(f, "xls"),
        }
    }
}

/// One account and the statement files that belong to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillGroupConfig {
    /// Account name, also the default file name prefix
    pub account: String,

    /// Currency of the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Name of the aggregated output this group contributes to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,

    /// Glob pattern selecting the group's files inside the bills directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,

    pub file_type: FileType,

    pub file_config: TabularFileConfig,

    /// Fields joined into the final memo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_memo: Option<Vec<String>>,
}

impl BillGroupConfig {
    /// Aggregation name, or the default one
    pub fn aggregation(&self) -> &str {
        self.aggregation.as_deref().unwrap_or(DEFAULT_AGGREGATION)
    }

    /// File pattern, defaulting to every file starting with the account name
    pub fn file_pattern(&self) -> String {
        self.file_pattern
            .clone()
            .unwrap_or_else(|| format!("{}*", self.account))
    }

    /// Validate the group's settings
    pub fn validate(&self) -> BillAggResult<()> {
        if self.account.trim().is_empty() {
            return Err(BillAggError::Config("account must not be empty".into()));
        }

        let file_conf = &self.file_config;
        match self.file_type {
            FileType::Csv => {
                if file_conf.skiprows.is_some() || file_conf.skipfooters.is_some() {
                    return Err(BillAggError::Config(format!(
                        "[{}] skiprows/skipfooters are only valid for xls files",
                        self.account
                    )));
                }
                file_conf.delimiter_byte()?;
                if let Some(label) = &file_conf.encoding {
                    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                        return Err(BillAggError::Config(format!(
                            "[{}] unknown encoding: {}",
                            self.account, label
                        )));
                    }
                }
            }
            FileType::Xls => {
                if file_conf.encoding.is_some() || file_conf.delimiter.is_some() {
                    return Err(BillAggError::Config(format!(
                        "[{}] encoding/delimiter are only valid for csv files",
                        self.account
                    )));
                }
            }
        }

        let fields = &file_conf.fields;
        let single_columns = [
            ("name", Some(&fields.name.column)),
            ("time", fields.time.as_ref().map(|f| &f.column)),
            ("memo", fields.memo.as_ref().map(|f| &f.column)),
        ];
        for (field, column) in single_columns {
            if column.map(ColumnRef::is_list).unwrap_or(false) {
                return Err(BillAggError::Config(format!(
                    "[{}] a list of columns is only allowed for the date field, not {}",
                    self.account, field
                )));
            }
        }
        if fields.amount.column_refs().into_iter().any(ColumnRef::is_list) {
            return Err(BillAggError::Config(format!(
                "[{}] a list of columns is only allowed for the date field, not amount",
                self.account
            )));
        }
        if let AmountFieldConfig::IndicatorColumns { indicators, .. } = &fields.amount {
            if indicators.is_empty() {
                return Err(BillAggError::Config(format!(
                    "[{}] at least one indicator is required for {}",
                    self.account,
                    fields.amount.format_name()
                )));
            }
        }

        for (name, field) in &file_conf.extra_fields {
            if CORE_FIELDS.contains(&name.as_str()) || GROUP_FIELDS.contains(&name.as_str()) {
                return Err(BillAggError::Config(format!(
                    "[{}] extra field \"{}\" shadows a core field",
                    self.account, name
                )));
            }
            if field.column.is_list() {
                return Err(BillAggError::Config(format!(
                    "[{}] a list of columns is only allowed for the date field, not {}",
                    self.account, name
                )));
            }
        }

        if let Some(memo_fields) = &self.final_memo {
            for name in memo_fields {
                let known = CORE_FIELDS.contains(&name.as_str())
                    || file_conf.extra_fields.contains_key(name);
                if !known {
                    return Err(BillAggError::Config(format!(
                        "[{}] unknown final_memo field: {}",
                        self.account, name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub bill_groups: Vec<BillGroupConfig>,

    /// Split every aggregation by the groups' currency
    #[serde(default)]
    pub separate_by_currency: bool,

    pub export_to: ExportType,

    #[serde(default)]
    pub export_config: ExportConfig,
}

impl AppConfig {
    /// Parse a config from YAML text
    pub fn from_yaml(yaml: &str) -> BillAggResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| BillAggError::Config(e.to_string()))
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> BillAggResult<Self> {
        debug!("loading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BillAggError::Io(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Find a bill group by account name
    pub fn find_group(&self, account: &str) -> Option<&BillGroupConfig> {
        self.bill_groups.iter().find(|g| g.account == account)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> BillAggResult<()> {
        if self.bill_groups.is_empty() {
            return Err(BillAggError::Config("no bill_groups configured".into()));
        }
        for group in &self.bill_groups {
            group.validate()?;
        }

        if self.export_to == ExportType::Xlsx {
            crate::export::xlsx::validate_layout(&self.export_config)?;
        }

        for column in &self.export_config.columns {
            if let ColumnData::ExtractedField { field } = &column.data {
                let known = CORE_FIELDS.contains(&field.as_str())
                    || GROUP_FIELDS.contains(&field.as_str())
                    || self
                        .bill_groups
                        .iter()
                        .any(|g| g.file_config.extra_fields.contains_key(field));
                if !known {
                    return Err(BillAggError::Config(format!(
                        "export column \"{}\" refers to unknown field: {}",
                        column.header, field
                    )));
                }
            }
        }

        Ok(())
    }
}
