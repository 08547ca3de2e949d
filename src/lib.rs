//! bill-aggregator - statement file aggregation
//!
//! This library extracts transactions from bank and credit card statement
//! files (CSV and spreadsheets) whose layout is described by a YAML config,
//! normalizes them into canonical records with exact decimal amounts and
//! explicit directions, and merges them into aggregated outputs.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration file schema and path resolution
//! - `error`: Custom error types
//! - `models`: Amounts and canonical records
//! - `extract`: Per-file extraction pipeline and format adapters
//! - `services`: File selection and aggregation
//! - `report`: Run log and log file writer
//! - `display`: Terminal output
//! - `export`: CSV, JSON and YAML writers
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use bill_aggregator::config::{AppConfig, TabularFileConfig, FileType};
//! use bill_aggregator::extract::extract_file;
//!
//! let config = AppConfig::load(Path::new("config.yaml"))?;
//! let group = &config.bill_groups[0];
//! let extraction = extract_file(Path::new("Visa-2020.csv"), group.file_type, &group.file_config)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod report;
pub mod services;

pub use error::{BillAggError, BillAggResult};
