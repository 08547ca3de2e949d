//! Service layer for the bill aggregator
//!
//! The service layer selects each bill group's files, runs their
//! extraction and merges the records into aggregations.

pub mod aggregator;
pub mod selection;

pub use aggregator::{Aggregation, AggregationRun, AggregationTotals, AggregatorService};
pub use selection::select_files;
