//! Aggregation service
//!
//! Runs the extraction of every configured bill group, wraps the records
//! with their group and merges them into named aggregations. A file that
//! fails to extract is logged and skipped; the run goes on with the next
//! file.

use std::path::Path;

use log::{error, info, warn};
use rust_decimal::Decimal;

use crate::config::{AppConfig, BillGroupConfig};
use crate::error::{BillAggError, BillAggResult};
use crate::extract::{extract_file, Extraction, LogLevel};
use crate::models::{AggregatedRecord, AmountType};
use crate::report::{ExtractLog, FileEntry, GroupEntry, LogWriter};

use super::selection::select_files;

/// Records merged under one output name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub name: String,
    /// Records in chronological order
    pub records: Vec<AggregatedRecord>,
}

/// Totals of an aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationTotals {
    pub inbound: Decimal,
    pub outbound: Decimal,
    pub count: usize,
}

impl Aggregation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Sum inbound and outbound amounts
    ///
    /// Records of unknown direction are counted but not summed.
    pub fn totals(&self) -> AggregationTotals {
        let mut totals = AggregationTotals {
            count: self.records.len(),
            ..AggregationTotals::default()
        };
        for record in &self.records {
            match record.record.amount_type {
                AmountType::In => totals.inbound += record.record.amount,
                AmountType::Out => totals.outbound += record.record.amount,
                AmountType::Unknown => {}
            }
        }
        totals
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|r| r.record.timestamp());
    }
}

/// Result of a full run
#[derive(Debug, Clone, Default)]
pub struct AggregationRun {
    /// Aggregations in the order they were first seen
    pub aggregations: Vec<Aggregation>,
    pub log: ExtractLog,
}

impl AggregationRun {
    fn aggregation_mut(&mut self, name: &str) -> &mut Aggregation {
        let idx = match self.aggregations.iter().position(|a| a.name == name) {
            Some(idx) => idx,
            None => {
                self.aggregations.push(Aggregation::new(name));
                self.aggregations.len() - 1
            }
        };
        &mut self.aggregations[idx]
    }

    /// Total number of records across all aggregations
    pub fn record_count(&self) -> usize {
        self.aggregations.iter().map(|a| a.records.len()).sum()
    }
}

/// Service for aggregating bill files
pub struct AggregatorService<'a> {
    config: &'a AppConfig,
    workdir: &'a Path,
    log_writer: Option<&'a LogWriter>,
}

impl<'a> AggregatorService<'a> {
    /// Create a new aggregator service
    pub fn new(config: &'a AppConfig, workdir: &'a Path) -> Self {
        Self {
            config,
            workdir,
            log_writer: None,
        }
    }

    /// Also persist every group entry to a log file
    pub fn with_log_writer(mut self, writer: &'a LogWriter) -> Self {
        self.log_writer = Some(writer);
        self
    }

    /// Output name of a group's records
    pub fn aggregation_name(&self, group: &BillGroupConfig) -> String {
        match (&group.currency, self.config.separate_by_currency) {
            (Some(currency), true) => format!("{}_{}", group.aggregation(), currency),
            _ => group.aggregation().to_string(),
        }
    }

    /// Extract every bill group and merge the records
    pub fn run(&self) -> BillAggResult<AggregationRun> {
        let mut run = AggregationRun::default();

        for group in &self.config.bill_groups {
            let name = self.aggregation_name(group);
            info!("Handling bill group: {} -> {}", group.account, name);

            let mut entry = GroupEntry::new(&group.account, &name);
            let mut records = Vec::new();

            let files = match select_files(self.workdir, group) {
                Ok(files) => files,
                Err(e) if e.is_file_scoped() => {
                    error!("[{}] {}", group.account, e);
                    entry.message(LogLevel::Error, e.message());
                    Vec::new()
                }
                Err(e) => return Err(e),
            };
            if files.is_empty() && entry.messages.is_empty() {
                warn!("[{}] no bill files found", group.account);
                entry.message(LogLevel::Warn, "No bill files found");
            }

            for path in &files {
                let file_name = display_name(path);
                match self.extract_group_file(group, path) {
                    Ok(extraction) => {
                        entry.files.push(FileEntry::extracted(&file_name, &extraction));
                        records.extend(extraction.records.into_iter().map(|record| {
                            AggregatedRecord::new(
                                &group.account,
                                group.currency.as_deref(),
                                group.final_memo.as_deref(),
                                record,
                            )
                        }));
                    }
                    Err(e) if e.is_file_scoped() => {
                        error!("{}", e);
                        entry.files.push(FileEntry::failed(&file_name, &e));
                    }
                    Err(e) => return Err(e),
                }
            }

            run.aggregation_mut(&name).records.extend(records);
            if let Some(writer) = self.log_writer {
                writer.write(&entry)?;
            }
            run.log.push(entry);
        }

        for aggregation in &mut run.aggregations {
            aggregation.sort();
        }
        Ok(run)
    }

    /// Extract one file with a group's settings
    pub fn extract_group_file(
        &self,
        group: &BillGroupConfig,
        path: &Path,
    ) -> BillAggResult<Extraction> {
        let extraction = extract_file(path, group.file_type, &group.file_config)
            .map_err(|e| e.in_file(&group.account, display_name(path)))?;
        for notice in &extraction.notices {
            notice.log();
        }
        Ok(extraction)
    }

    /// Extract one file with the settings of the named group
    pub fn extract_for_account(&self, account: &str, path: &Path) -> BillAggResult<Extraction> {
        let group = self.config.find_group(account).ok_or_else(|| {
            BillAggError::Config(format!("no bill group with account \"{}\"", account))
        })?;
        self.extract_group_file(group, path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::str::FromStr;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
bill_groups:
  - account: Visa
    currency: USD
    file_type: csv
    file_config:
      has_header: true
      fields:
        date: {column: date}
        name: {column: name}
        memo: {column: memo}
        amount: {column: amount, format: OneColumnWithSign}
    final_memo: [name, memo]
  - account: Checking
    currency: EUR
    file_type: csv
    file_config:
      has_header: false
      fields:
        date: {column: 0}
        name: {column: 1}
        amount:
          format: TwoColumns
          inbound: {column: 2}
          outbound: {column: 3}
  - account: Cash
    aggregation: cash
    file_type: csv
    file_config:
      has_header: true
      fields:
        date: {column: 0}
        name: {column: 1}
        amount: {column: 2, format: OneColumnWithSign}
export_to: csv
"#;

    fn setup() -> (TempDir, AppConfig) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Visa-2020.csv"),
            "date,name,memo,amount\n2020-01-03,Shop,card,-10.00\n2020-01-01,Refund,,5.00\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Visa-broken.csv"),
            "date,name,memo,amount\n2020-01-02,Shop,,1.2.3\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Checking-2020.csv"),
            "2020-01-02,Salary,100.00,\n2020-01-04,Rent,,40.00\n",
        )
        .unwrap();
        (dir, AppConfig::from_yaml(CONFIG).unwrap())
    }

    #[test]
    fn test_run_merges_groups() {
        let (dir, config) = setup();
        let run = AggregatorService::new(&config, dir.path()).run().unwrap();

        let names: Vec<&str> = run.aggregations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["result", "cash"]);

        let result = &run.aggregations[0];
        let order: Vec<&str> = result
            .records
            .iter()
            .map(|r| r.record.name.as_str())
            .collect();
        assert_eq!(order, vec!["Refund", "Salary", "Shop", "Rent"]);
        assert_eq!(result.records[2].final_memo, "Shop; card");
        assert_eq!(result.records[2].currency.as_deref(), Some("USD"));
        assert_eq!(result.records[1].account, "Checking");

        let totals = result.totals();
        assert_eq!(totals.count, 4);
        assert_eq!(totals.inbound, Decimal::from_str("105.00").unwrap());
        assert_eq!(totals.outbound, Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_failed_file_is_logged_and_skipped() {
        let (dir, config) = setup();
        let run = AggregatorService::new(&config, dir.path()).run().unwrap();

        let visa = &run.log.groups()[0];
        assert_eq!(visa.files.len(), 2);
        assert_eq!(visa.files[0].records, Some(2));
        assert_eq!(visa.files[1].records, None);
        assert_eq!(visa.files[1].level(), LogLevel::Error);

        // Cash has no files
        let cash = &run.log.groups()[2];
        assert_eq!(cash.level(), LogLevel::Warn);

        let counts = run.log.counts();
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.warnings, 1);
        assert_eq!(run.record_count(), 4);
    }

    #[test]
    fn test_separate_by_currency() {
        let (dir, mut config) = setup();
        config.separate_by_currency = true;
        let service = AggregatorService::new(&config, dir.path());
        assert_eq!(service.aggregation_name(&config.bill_groups[0]), "result_USD");
        assert_eq!(service.aggregation_name(&config.bill_groups[2]), "cash");

        let run = service.run().unwrap();
        let names: Vec<&str> = run.aggregations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["result_USD", "result_EUR", "cash"]);
    }

    #[test]
    fn test_extract_for_account() {
        let (dir, config) = setup();
        let service = AggregatorService::new(&config, dir.path());

        let extraction = service
            .extract_for_account("Visa", &dir.path().join("Visa-2020.csv"))
            .unwrap();
        assert_eq!(extraction.records.len(), 2);

        let err = service
            .extract_for_account("Visa", &dir.path().join("Visa-broken.csv"))
            .unwrap_err();
        assert!(err.to_string().starts_with("[Visa] Visa-broken.csv: "));

        assert!(service
            .extract_for_account("Amex", &dir.path().join("Visa-2020.csv"))
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_run_writes_log_file() {
        let (dir, config) = setup();
        let writer = LogWriter::new(dir.path().join("run.log"));
        AggregatorService::new(&config, dir.path())
            .with_log_writer(&writer)
            .run()
            .unwrap();
        assert_eq!(writer.read_all().unwrap().len(), 3);
    }
}
