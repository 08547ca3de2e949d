//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod check;
pub mod extract;
pub mod run;

use log::debug;

use crate::config::{AppConfig, WorkPaths};
use crate::error::BillAggResult;

pub use check::handle_check;
pub use extract::handle_extract;
pub use run::{handle_run, RunOptions};

/// Load and validate the config file
pub fn load_config(paths: &WorkPaths) -> BillAggResult<AppConfig> {
    let config = AppConfig::load(paths.config_file())?;
    config.validate()?;
    debug!(
        "{} bill groups, bills directory {}",
        config.bill_groups.len(),
        paths.workdir().display()
    );
    Ok(config)
}
