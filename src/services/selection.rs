//! Bill file selection

use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;

use crate::config::BillGroupConfig;
use crate::error::{BillAggError, BillAggResult};

/// Find the files of a bill group inside the bills directory
///
/// Files matching the group's pattern are returned in path order. Matches
/// whose extension does not belong to the group's file type are left out.
pub fn select_files(workdir: &Path, group: &BillGroupConfig) -> BillAggResult<Vec<PathBuf>> {
    let base = workdir.to_str().ok_or_else(|| {
        BillAggError::Config(format!("{}: not a valid UTF-8 path", workdir.display()))
    })?;
    let pattern = format!("{}/{}", Pattern::escape(base), group.file_pattern());

    let entries = glob::glob(&pattern).map_err(|e| {
        BillAggError::Config(format!(
            "[{}] invalid file_pattern \"{}\": {}",
            group.account,
            group.file_pattern(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BillAggError::Io(e.to_string()))?;
        if !path.is_file() {
            continue;
        }
        if !group.file_type.matches(&path) {
            debug!("skipping {}: not a {} file", path.display(), group.file_type);
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}
