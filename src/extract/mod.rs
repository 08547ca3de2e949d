//! Statement file extraction
//!
//! Turns one bill file into an ordered list of [`CanonicalRecord`]s:
//!
//! - `delimited` / `spreadsheet` load raw rows from CSV or workbook files
//! - `tabular` runs the format-agnostic pipeline over the loaded rows
//!   (header, column resolution, dates, ordering, amounts, records)
//!
//! Advisory diagnostics are returned alongside the records as
//! [`ExtractNotice`]s rather than printed.

pub mod amounts;
pub mod assemble;
pub mod columns;
pub mod dateparse;
pub mod datetime;
pub mod delimited;
pub mod ordering;
pub mod spreadsheet;
pub mod tabular;

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{FileType, TabularFileConfig};
use crate::error::BillAggResult;
use crate::models::record::CanonicalRecord;

pub use columns::{ColumnResolver, ResolvedColumn, ResolvedFields};
pub use dateparse::{parse_datetime, DateHints};
pub use tabular::{extract_rows, LoadedRows};

/// Rows dropped for inconsistent width, at or above which the drop is a warning
pub const WARN_TRIM_ROW_COUNT: usize = 10;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// An advisory diagnostic raised while extracting a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractNotice {
    /// No encoding was configured and one was detected
    EncodingDetected { encoding: String },
    /// Rows whose width differs from the file's were dropped
    RowsDropped { count: usize },
    /// Leading and trailing rows were skipped as configured
    RowsSkipped { count: usize },
    /// Rows were not in chronological order
    Resorted,
}

impl ExtractNotice {
    /// Severity of the notice
    pub fn level(&self) -> LogLevel {
        match self {
            ExtractNotice::RowsDropped { count } if *count >= WARN_TRIM_ROW_COUNT => {
                LogLevel::Warn
            }
            _ => LogLevel::Info,
        }
    }

    /// Emit the notice through the `log` facade
    pub fn log(&self) {
        match self.level() {
            LogLevel::Info => log::info!("{}", self),
            LogLevel::Warn => log::warn!("{}", self),
            LogLevel::Error => log::error!("{}", self),
        }
    }
}

impl fmt::Display for ExtractNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractNotice::EncodingDetected { encoding } => {
                write!(f, "Detected encoding: {}", encoding)
            }
            ExtractNotice::RowsDropped { count } => write!(f, "Trimmed {} rows", count),
            ExtractNotice::RowsSkipped { count } => write!(f, "Skipped {} rows", count),
            ExtractNotice::Resorted => write!(f, "Re-sorted by transaction date"),
        }
    }
}

/// Records extracted from one file, in chronological order
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<CanonicalRecord>,
    pub notices: Vec<ExtractNotice>,
}

impl Extraction {
    /// Highest severity among the notices, if any
    pub fn level(&self) -> Option<LogLevel> {
        self.notices.iter().map(ExtractNotice::level).max()
    }
}

/// Extract all records of a bill file
pub fn extract_file(
    path: &Path,
    file_type: FileType,
    config: &TabularFileConfig,
) -> BillAggResult<Extraction> {
    debug!("extracting {} as {}", path.display(), file_type);
    let loaded = match file_type {
        FileType::Csv => delimited::load_rows(path, config)?,
        FileType::Xls => spreadsheet::load_rows(path, config)?,
    };
    extract_rows(loaded, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_levels() {
        assert_eq!(ExtractNotice::RowsDropped { count: 9 }.level(), LogLevel::Info);
        assert_eq!(ExtractNotice::RowsDropped { count: 10 }.level(), LogLevel::Warn);
        assert_eq!(ExtractNotice::Resorted.level(), LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(
            ExtractNotice::Resorted.to_string(),
            "Re-sorted by transaction date"
        );
        assert_eq!(
            ExtractNotice::EncodingDetected {
                encoding: "UTF-8".into()
            }
            .to_string(),
            "Detected encoding: UTF-8"
        );
    }

    #[test]
    fn test_extraction_level() {
        let mut extraction = Extraction::default();
        assert_eq!(extraction.level(), None);
        extraction.notices.push(ExtractNotice::Resorted);
        extraction.notices.push(ExtractNotice::RowsDropped { count: 12 });
        assert_eq!(extraction.level(), Some(LogLevel::Warn));
    }
}
