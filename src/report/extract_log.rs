//! Extraction run log
//!
//! Records what happened to every bill group and file during a run:
//! how many records each file produced, the notices it raised and any
//! error that made it fail. The log decides the severity of each entry
//! and counts warnings and errors for the final summary line.

use serde::{Deserialize, Serialize};

use crate::error::BillAggError;
use crate::extract::{Extraction, LogLevel};

/// A single message with its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub text: String,
}

impl LogMessage {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Outcome of one bill file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name
    pub file: String,
    /// Number of records extracted, `None` when extraction failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LogMessage>,
}

impl FileEntry {
    /// Entry of a successfully extracted file
    pub fn extracted(file: impl Into<String>, extraction: &Extraction) -> Self {
        Self {
            file: file.into(),
            records: Some(extraction.records.len()),
            messages: extraction
                .notices
                .iter()
                .map(|n| LogMessage::new(n.level(), n.to_string()))
                .collect(),
        }
    }

    /// Entry of a file whose extraction failed
    pub fn failed(file: impl Into<String>, error: &BillAggError) -> Self {
        Self {
            file: file.into(),
            records: None,
            messages: vec![LogMessage::new(LogLevel::Error, error.message())],
        }
    }

    /// Highest severity of the file's messages
    pub fn level(&self) -> LogLevel {
        self.messages
            .iter()
            .map(|m| m.level)
            .max()
            .unwrap_or(LogLevel::Info)
    }
}

/// Outcome of one bill group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub account: String,
    pub aggregation: String,
    /// Messages about the group itself rather than one of its files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LogMessage>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl GroupEntry {
    pub fn new(account: impl Into<String>, aggregation: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            aggregation: aggregation.into(),
            messages: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Add a group-level message
    pub fn message(&mut self, level: LogLevel, text: impl Into<String>) {
        self.messages.push(LogMessage::new(level, text));
    }

    /// Highest severity of the group and all its files
    pub fn level(&self) -> LogLevel {
        self.messages
            .iter()
            .map(|m| m.level)
            .chain(self.files.iter().map(FileEntry::level))
            .max()
            .unwrap_or(LogLevel::Info)
    }

    /// Whether the group counts as an entry of its own in the totals
    ///
    /// Only groups carrying their own messages, or without any file, do;
    /// otherwise the group is represented by its files.
    pub fn counts_separately(&self) -> bool {
        !self.messages.is_empty() || self.files.is_empty()
    }

    /// Total records extracted from the group's files
    pub fn record_count(&self) -> usize {
        self.files.iter().filter_map(|f| f.records).sum()
    }
}

/// Warning and error totals of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub warnings: usize,
    pub errors: usize,
}

impl LogCounts {
    fn add(&mut self, level: LogLevel) {
        match level {
            LogLevel::Warn => self.warnings += 1,
            LogLevel::Error => self.errors += 1,
            LogLevel::Info => {}
        }
    }

    /// Closing line of a run, e.g. `Extracting completed. (1 warning, 2 errors)`
    pub fn completion_message(&self) -> String {
        let warnings = plural(self.warnings, "warning");
        let errors = plural(self.errors, "error");
        match (self.warnings, self.errors) {
            (0, 0) => "Extracting completed.".to_string(),
            (_, 0) => format!("Extracting completed. ({})", warnings),
            (0, _) => format!("Extracting completed. ({})", errors),
            _ => format!("Extracting completed. ({}, {})", warnings, errors),
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Log of a whole run, in processing order
#[derive(Debug, Clone, Default)]
pub struct ExtractLog {
    groups: Vec<GroupEntry>,
}

impl ExtractLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished group
    pub fn push(&mut self, group: GroupEntry) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[GroupEntry] {
        &self.groups
    }

    /// Count warnings and errors
    ///
    /// Each file counts once at its highest severity. A group counts once
    /// more when it carries its own messages or has no files.
    pub fn counts(&self) -> LogCounts {
        let mut counts = LogCounts::default();
        for group in &self.groups {
            for file in &group.files {
                counts.add(file.level());
            }
            if group.counts_separately() {
                counts.add(group.level());
            }
        }
        counts
    }
}
