//! Core data models for the bill aggregator
//!
//! This module contains the data structures produced by extraction:
//! parsed amounts with their direction, and canonical transaction records.

pub mod amount;
pub mod record;

pub use amount::{parse_amount, AmountType};
pub use record::{AggregatedRecord, CanonicalRecord};
