//! `extract` command

use std::path::Path;

use crate::config::WorkPaths;
use crate::display::format_record_register;
use crate::error::BillAggResult;
use crate::services::AggregatorService;

use super::load_config;

/// Extract a single file with a bill group's settings and print its records
pub fn handle_extract(
    paths: &WorkPaths,
    file: &Path,
    account: &str,
    limit: Option<usize>,
) -> BillAggResult<()> {
    let config = load_config(paths)?;
    let service = AggregatorService::new(&config, paths.workdir());
    let extraction = service.extract_for_account(account, file)?;

    for notice in &extraction.notices {
        println!("[{}] {}", notice.level(), notice);
    }
    print!("{}", format_record_register(&extraction.records, limit));
    println!("{} records extracted.", extraction.records.len());
    Ok(())
}
