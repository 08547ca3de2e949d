//! `check` command

use crate::config::WorkPaths;
use crate::error::BillAggResult;

use super::load_config;

/// Validate the config file and describe its bill groups
pub fn handle_check(paths: &WorkPaths) -> BillAggResult<()> {
    let config = load_config(paths)?;

    println!("Config file:     {}", paths.config_file().display());
    println!("Bills directory: {}", paths.workdir().display());
    println!();
    for group in &config.bill_groups {
        println!(
            "  {:20} {:4} {:24} -> {}",
            group.account,
            group.file_type.to_string(),
            group.file_pattern(),
            group.aggregation()
        );
    }
    println!();
    println!("Configuration is valid.");
    Ok(())
}
