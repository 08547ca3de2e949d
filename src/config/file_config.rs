//! Per-file extraction settings
//!
//! Describes how the columns of one bill group's statement files map onto
//! the fields of a canonical record, and how the amount columns encode the
//! direction of a transaction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BillAggError, BillAggResult};

/// A configured column reference: zero-based index, header name, or a list
/// of either (only meaningful for the date field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// Zero-based column index
    Index(i64),
    /// Header name, must occur exactly once in the header row
    Name(String),
    /// Fallback columns, in order of preference
    List(Vec<ColumnRef>),
}

impl ColumnRef {
    /// Whether this reference is a list of columns
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{}", idx),
            Self::Name(name) => write!(f, "\"{}\"", name),
            Self::List(refs) => {
                let parts: Vec<String> = refs.iter().map(|r| r.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<i64> for ColumnRef {
    fn from(idx: i64) -> Self {
        Self::Index(idx)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A field that lives in a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnField {
    pub column: ColumnRef,
}

impl ColumnField {
    pub fn new(column: impl Into<ColumnRef>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// The date field, with optional ambiguity hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateField {
    pub column: ColumnRef,

    /// Read `03/04/2020` as 3 April rather than 4 March
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dayfirst: Option<bool>,

    /// Read `10/11/12` as 2010-11-12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearfirst: Option<bool>,
}

impl DateField {
    pub fn new(column: impl Into<ColumnRef>) -> Self {
        Self {
            column: column.into(),
            dayfirst: None,
            yearfirst: None,
        }
    }
}

/// An indicator column and the literals that mark a transaction's direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorConfig {
    pub column: ColumnRef,
    pub inbound_value: String,
    pub outbound_value: String,
}

/// How the amount and its direction are encoded in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", deny_unknown_fields)]
pub enum AmountFieldConfig {
    /// One unsigned amount column, direction given by indicator columns
    #[serde(rename = "OneColumnWithIndicators", alias = "IndicatorColumns")]
    IndicatorColumns {
        column: ColumnRef,
        indicators: Vec<IndicatorConfig>,
    },

    /// One signed amount column
    #[serde(rename = "OneColumnWithSign", alias = "SignedColumn")]
    SignedColumn {
        column: ColumnRef,
        /// Some card statements list purchases as positive amounts
        #[serde(default)]
        is_outbound_positive: bool,
    },

    /// Separate inbound and outbound columns
    #[serde(rename = "TwoColumns")]
    TwoColumns {
        inbound: ColumnField,
        outbound: ColumnField,
    },
}

impl AmountFieldConfig {
    /// The configuration tag, as written in YAML
    pub fn format_name(&self) -> &'static str {
        match self {
            Self::IndicatorColumns { .. } => "OneColumnWithIndicators",
            Self::SignedColumn { .. } => "OneColumnWithSign",
            Self::TwoColumns { .. } => "TwoColumns",
        }
    }

    /// Every column reference used by this amount format
    pub fn column_refs(&self) -> Vec<&ColumnRef> {
        match self {
            Self::IndicatorColumns { column, indicators } => std::iter::once(column)
                .chain(indicators.iter().map(|i| &i.column))
                .collect(),
            Self::SignedColumn { column, .. } => vec![column],
            Self::TwoColumns { inbound, outbound } => vec![&inbound.column, &outbound.column],
        }
    }
}

/// Field to column mapping of a tabular file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldsConfig {
    pub date: DateField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ColumnField>,
    pub name: ColumnField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<ColumnField>,
    pub amount: AmountFieldConfig,
}

/// Settings for reading one tabular bill file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabularFileConfig {
    /// Whether the first (non-skipped) row holds column names
    pub has_header: bool,

    /// Text encoding label for delimited files; detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Field delimiter for delimited files (default `,`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    /// Leading rows to skip in spreadsheets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skiprows: Option<usize>,

    /// Trailing rows to skip in spreadsheets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipfooters: Option<usize>,

    pub fields: FieldsConfig,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_fields: BTreeMap<String, ColumnField>,
}

impl TabularFileConfig {
    /// Create a config with the required fields only
    pub fn new(has_header: bool, fields: FieldsConfig) -> Self {
        Self {
            has_header,
            encoding: None,
            delimiter: None,
            skiprows: None,
            skipfooters: None,
            fields,
            extra_fields: BTreeMap::new(),
        }
    }

    /// The delimiter as a single byte
    pub fn delimiter_byte(&self) -> BillAggResult<u8> {
        let Some(delimiter) = self.delimiter.as_deref() else {
            return Ok(b',');
        };
        match delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(BillAggError::Config(format!(
                "delimiter must be a single ASCII character, got \"{}\"",
                delimiter
            ))),
        }
    }

    /// Number of leading spreadsheet rows to skip
    pub fn skip_rows(&self) -> usize {
        self.skiprows.unwrap_or(0)
    }

    /// Number of trailing spreadsheet rows to skip
    pub fn skip_footers(&self) -> usize {
        self.skipfooters.unwrap_or(0)
    }
}
