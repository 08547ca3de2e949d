//! `run` command

use std::path::PathBuf;

use crate::config::WorkPaths;
use crate::display::{format_aggregation_totals, format_extract_summary};
use crate::error::BillAggResult;
use crate::export::export_aggregations;
use crate::report::LogWriter;
use crate::services::AggregatorService;

use super::load_config;

/// Options of a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip writing the output files
    pub dry_run: bool,
    /// Append group entries to this JSON lines file
    pub log_file: Option<PathBuf>,
}

/// Extract every bill group, print the summary and export the aggregations
pub fn handle_run(paths: &WorkPaths, options: &RunOptions) -> BillAggResult<()> {
    let config = load_config(paths)?;
    let writer = options.log_file.clone().map(LogWriter::new);

    let mut service = AggregatorService::new(&config, paths.workdir());
    if let Some(writer) = &writer {
        service = service.with_log_writer(writer);
    }
    let run = service.run()?;

    print!("{}", format_extract_summary(&run.log));
    println!();
    print!("{}", format_aggregation_totals(&run.aggregations));

    if options.dry_run {
        println!("Dry run, nothing exported.");
        return Ok(());
    }

    for path in export_aggregations(&run.aggregations, &config, paths)? {
        println!("Exported to: {}", path.display());
    }
    Ok(())
}
