//! Display formatting for terminal output
//!
//! Provides utilities for formatting run summaries and extracted records
//! for terminal display.

pub mod record;
pub mod summary;

pub use record::{format_record_register, format_record_row};
pub use summary::{format_aggregation_totals, format_extract_summary};
