//! Custom error types for the bill aggregator
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for bill aggregator operations
#[derive(Error, Debug)]
pub enum BillAggError {
    /// Configuration-related errors (schema, amount format, skip counts)
    #[error("Config Error, {0}")]
    Config(String),

    /// A configured column does not exist in the file
    #[error("Config Error, no such column: {0}")]
    Column(String),

    /// A configured header name occurs more than once in the header row
    #[error("Config Error, multiple columns \"{0}\" exist")]
    AmbiguousColumn(String),

    /// An amount cell could not be converted to a decimal
    #[error("Cannot parse amount '{text}': {reason}")]
    AmountParse { text: String, reason: String },

    /// A date/time cell could not be parsed
    #[error("Cannot parse date '{text}': {reason}")]
    DateParse { text: String, reason: String },

    /// None of the fallback date columns has a value for a row
    #[error("No valid date for row: {0}")]
    NoValidDate(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// YAML configuration errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Delimited text reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Spreadsheet reading errors
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// An error raised while extracting one bill file
    #[error("[{account}] {file}: {source}")]
    InFile {
        account: String,
        file: String,
        #[source]
        source: Box<BillAggError>,
    },
}

impl BillAggError {
    /// Create an amount parse error
    pub fn amount_parse(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AmountParse {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a date parse error
    pub fn date_parse(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DateParse {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Attach bill group and file context to an error
    pub fn in_file(self, account: impl Into<String>, file: impl Into<String>) -> Self {
        match self {
            // Already attributed
            Self::InFile { .. } => self,
            other => Self::InFile {
                account: account.into(),
                file: file.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without file context
    pub fn root(&self) -> &BillAggError {
        match self {
            Self::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// Message of the underlying error, without file context
    pub fn message(&self) -> String {
        self.root().to_string()
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self.root(),
            Self::Config(_) | Self::Column(_) | Self::AmbiguousColumn(_)
        )
    }

    /// Check if this is a parse error for a cell value
    pub fn is_parse(&self) -> bool {
        matches!(
            self.root(),
            Self::AmountParse { .. } | Self::DateParse { .. } | Self::NoValidDate(_)
        )
    }

    /// Check if the extraction of a single file should be abandoned
    /// without aborting the rest of the run
    pub fn is_file_scoped(&self) -> bool {
        self.is_config()
            || self.is_parse()
            || matches!(
                self.root(),
                Self::Csv(_) | Self::Spreadsheet(_) | Self::Io(_)
            )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BillAggError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for BillAggError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for BillAggError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BillAggError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<calamine::Error> for BillAggError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for BillAggError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for bill aggregator operations
pub type BillAggResult<T> = Result<T, BillAggError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BillAggError::Config("invalid amount format: Foo".into());
        assert_eq!(err.to_string(), "Config Error, invalid amount format: Foo");
    }

    #[test]
    fn test_column_errors_are_distinct() {
        let missing = BillAggError::Column("\"Date\"".into());
        let ambiguous = BillAggError::AmbiguousColumn("Date".into());
        assert_ne!(missing.to_string(), ambiguous.to_string());
        assert!(missing.is_config());
        assert!(ambiguous.is_config());
    }

    #[test]
    fn test_in_file_context() {
        let err = BillAggError::amount_parse("1.2.3", "ambiguous decimal separator")
            .in_file("Visa", "Visa-2020.csv");
        assert_eq!(
            err.to_string(),
            "[Visa] Visa-2020.csv: Cannot parse amount '1.2.3': ambiguous decimal separator"
        );
        assert!(err.is_parse());
        assert!(!err.is_config());
        assert_eq!(
            err.message(),
            "Cannot parse amount '1.2.3': ambiguous decimal separator"
        );
    }

    #[test]
    fn test_in_file_is_not_nested() {
        let err = BillAggError::Config("x".into())
            .in_file("A", "a.csv")
            .in_file("B", "b.csv");
        match err {
            BillAggError::InFile { account, file, .. } => {
                assert_eq!(account, "A");
                assert_eq!(file, "a.csv");
            }
            _ => panic!("expected file context"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BillAggError = io_err.into();
        assert!(matches!(err, BillAggError::Io(_)));
        assert!(err.is_file_scoped());
    }
}
