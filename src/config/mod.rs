//! Configuration module for the bill aggregator
//!
//! This module provides configuration management including:
//! - Config file and bills directory resolution
//! - YAML settings for bill groups and their file layouts
//! - Export settings

pub mod export_config;
pub mod file_config;
pub mod paths;
pub mod settings;

pub use export_config::{ColumnData, ColumnStyle, ExportColumn, ExportConfig, ExportType};
pub use file_config::{
    AmountFieldConfig, ColumnField, ColumnRef, DateField, FieldsConfig, IndicatorConfig,
    TabularFileConfig,
};
pub use paths::WorkPaths;
pub use settings::{AppConfig, BillGroupConfig, FileType};
