//! Run reporting
//!
//! The [`ExtractLog`] collects per-group and per-file outcomes of a run;
//! the [`LogWriter`] optionally persists them as JSON lines.

pub mod extract_log;
pub mod writer;

pub use extract_log::{ExtractLog, FileEntry, GroupEntry, LogCounts, LogMessage};
pub use writer::{LogRecord, LogWriter};
