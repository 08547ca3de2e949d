//! Run log file writer
//!
//! Appends each bill group entry of a run to a log file as one JSON line.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BillAggError, BillAggResult};

use super::extract_log::GroupEntry;

/// One line of the log file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub group: GroupEntry,
}

/// Writes group entries to a line-delimited JSON file
pub struct LogWriter {
    log_path: PathBuf,
}

impl LogWriter {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one group entry, flushed immediately
    pub fn write(&self, group: &GroupEntry) -> BillAggResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BillAggError::Io(format!("Failed to open log file: {}", e)))?;

        let record = LogRecord {
            timestamp: Utc::now(),
            group: group.clone(),
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| BillAggError::Json(format!("Failed to serialize log entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| BillAggError::Io(format!("Failed to write log entry: {}", e)))?;
        file.flush()
            .map_err(|e| BillAggError::Io(format!("Failed to flush log file: {}", e)))?;

        Ok(())
    }

    /// Read back every entry of the log file, oldest first
    pub fn read_all(&self) -> BillAggResult<Vec<LogRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BillAggError::Io(format!("Failed to open log file: {}", e)))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                BillAggError::Io(format!("Failed to read log line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord = serde_json::from_str(&line).map_err(|e| {
                BillAggError::Json(format!(
                    "Failed to parse log entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LogLevel;
    use crate::report::extract_log::{FileEntry, LogMessage};
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let writer = LogWriter::new(dir.path().join("run.log"));
        assert!(writer.read_all().unwrap().is_empty());

        let mut group = GroupEntry::new("Visa", "result");
        group.files.push(FileEntry {
            file: "Visa-2020.csv".into(),
            records: Some(3),
            messages: vec![LogMessage::new(LogLevel::Info, "Re-sorted by transaction date")],
        });
        writer.write(&group).unwrap();
        writer.write(&GroupEntry::new("Savings", "result")).unwrap();

        let records = writer.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].group, group);
        assert_eq!(records[1].group.account, "Savings");
    }

    #[test]
    fn test_lines_are_json_objects() {
        let dir = TempDir::new().unwrap();
        let writer = LogWriter::new(dir.path().join("run.log"));
        writer.write(&GroupEntry::new("Visa", "cards")).unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["account"], "Visa");
        assert_eq!(value["aggregation"], "cards");
        assert!(value["timestamp"].is_string());
    }
}
