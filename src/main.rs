use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bill_aggregator::cli::{handle_check, handle_extract, handle_run, RunOptions};
use bill_aggregator::config::WorkPaths;

#[derive(Parser)]
#[command(
    name = "bill-agg",
    version,
    about = "Aggregate bank and credit card statements into one ledger",
    long_about = "bill-agg reads statement files (CSV and spreadsheets) exported by \
                  banks and card issuers, normalizes dates, amounts and transaction \
                  directions per a YAML config, and merges them into aggregated \
                  CSV, JSON or YAML files."
)]
struct Cli {
    /// Config file (default: config.yaml)
    #[arg(short = 'c', long = "conf", env = "BILL_AGG_CONFIG", global = true)]
    conf: Option<PathBuf>,

    /// Bills directory (default: the config file's directory)
    #[arg(short = 'd', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Append the run log to this file as JSON lines
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all bill groups and export the aggregations (default)
    Run {
        /// Print the summary without writing output files
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the config file
    Check,

    /// Extract a single file and print its records
    Extract {
        /// Bill file to extract
        file: PathBuf,
        /// Bill group whose settings apply
        #[arg(short, long)]
        account: String,
        /// Number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let paths = WorkPaths::resolve(cli.conf.as_deref(), cli.dir.as_deref())?;

    match cli.command {
        None => handle_run(
            &paths,
            &RunOptions {
                dry_run: false,
                log_file: cli.log_file,
            },
        )?,
        Some(Commands::Run { dry_run }) => handle_run(
            &paths,
            &RunOptions {
                dry_run,
                log_file: cli.log_file,
            },
        )?,
        Some(Commands::Check) => handle_check(&paths)?,
        Some(Commands::Extract {
            file,
            account,
            limit,
        }) => handle_extract(&paths, &file, &account, limit)?,
    }

    Ok(())
}
