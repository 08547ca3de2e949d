//! Path management for the bill aggregator
//!
//! Resolves the config file and the bills directory.
//!
//! ## Path Resolution Order
//!
//! 1. `--conf` argument, or the `BILL_AGG_CONFIG` environment variable
//! 2. `config.yaml` in the current directory
//!
//! The bills directory is `--dir` when given, otherwise the directory that
//! contains the config file.

use std::path::{Path, PathBuf};

use super::settings::DEFAULT_CONFIG_FILE;
use crate::error::{BillAggError, BillAggResult};

/// Manages all paths used by one aggregation run
#[derive(Debug, Clone)]
pub struct WorkPaths {
    /// Absolute path of the YAML config file
    config_file: PathBuf,
    /// Directory holding the bill files, also the output directory
    workdir: PathBuf,
}

impl WorkPaths {
    /// Resolve and check the config file and bills directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config file or the bills
    /// directory does not exist.
    pub fn resolve(conf: Option<&Path>, dir: Option<&Path>) -> BillAggResult<Self> {
        let config_file = absolute(conf.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)))?;
        if !config_file.is_file() {
            return Err(BillAggError::Config(format!(
                "{}: no such file",
                config_file.display()
            )));
        }

        let workdir = match dir {
            Some(dir) => absolute(dir)?,
            None => config_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        if !workdir.is_dir() {
            return Err(BillAggError::Config(format!(
                "{}: no such directory",
                workdir.display()
            )));
        }

        Ok(Self {
            config_file,
            workdir,
        })
    }

    /// Create WorkPaths without any checks (useful for testing)
    pub fn with_paths(config_file: PathBuf, workdir: PathBuf) -> Self {
        Self {
            config_file,
            workdir,
        }
    }

    /// Get the config file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Get the bills directory
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Get the path of an aggregated output file
    pub fn output_file(&self, aggregation: &str, extension: &str) -> PathBuf {
        self.workdir.join(format!("{}.{}", aggregation, extension))
    }
}

fn absolute(path: &Path) -> BillAggResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| BillAggError::Io(format!("Cannot determine current directory: {}", e)))?;
        Ok(cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_workdir_defaults_to_config_parent() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("bills.yaml");
        std::fs::write(&config, "bill_groups: []\n").unwrap();

        let paths = WorkPaths::resolve(Some(&config), None).unwrap();
        assert_eq!(paths.config_file(), config.as_path());
        assert_eq!(paths.workdir(), temp_dir.path());
    }

    #[test]
    fn test_explicit_workdir() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config.yaml");
        std::fs::write(&config, "").unwrap();
        let bills = temp_dir.path().join("bills");
        std::fs::create_dir(&bills).unwrap();

        let paths = WorkPaths::resolve(Some(&config), Some(&bills)).unwrap();
        assert_eq!(paths.workdir(), bills.as_path());
        assert_eq!(paths.output_file("result", "csv"), bills.join("result.csv"));
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = WorkPaths::resolve(Some(&temp_dir.path().join("nope.yaml")), None).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_missing_workdir() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config.yaml");
        std::fs::write(&config, "").unwrap();

        let err =
            WorkPaths::resolve(Some(&config), Some(&temp_dir.path().join("missing"))).unwrap_err();
        assert!(err.to_string().contains("no such directory"));
    }
}
