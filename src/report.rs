//! Size audit of locally exported part files.
//!
//! Exports land on disk as `{prefix}_{store}_{N}.csv`, one file per
//! registered spreadsheet, numbered from 1 in rotation order. Only the
//! highest-numbered part is still being written to, so only that one is
//! judged against the thresholds; older parts are listed for context.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SizeLevels;
use crate::Result;

/// Advisory level for a part's byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLevel {
    Ok,
    Warn,
    Alert,
    /// At or past the rotation threshold.
    Hard,
}

impl SizeLevel {
    pub fn classify(bytes: u64, levels: &SizeLevels) -> Self {
        if bytes >= levels.hard_bytes {
            SizeLevel::Hard
        } else if bytes >= levels.alert_bytes {
            SizeLevel::Alert
        } else if bytes >= levels.warn_bytes {
            SizeLevel::Warn
        } else {
            SizeLevel::Ok
        }
    }
}

impl std::fmt::Display for SizeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SizeLevel::Ok => "OK",
            SizeLevel::Warn => "WARN",
            SizeLevel::Alert => "ALERT",
            SizeLevel::Hard => "HARD",
        };
        f.write_str(label)
    }
}

/// One numbered part file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFile {
    pub index: u32,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Scans `dir` for `{prefix}_{store}_{N}.csv` files, sorted by part number.
/// The unsuffixed combined file (`{prefix}_{store}.csv`) is ignored.
pub fn find_parts(dir: &Path, prefix: &str, store: &str) -> Result<Vec<PartFile>> {
    let lead = format!("{prefix}_{store}_");
    let mut parts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let index = match parse_part_index(name, &lead) {
            Some(index) => index,
            None => continue,
        };
        let size_bytes = entry.metadata()?.len();
        parts.push(PartFile {
            index,
            path,
            size_bytes,
        });
    }
    parts.sort_by_key(|part| part.index);
    Ok(parts)
}

/// The part currently being written: highest numeric suffix.
pub fn latest_part(parts: &[PartFile]) -> Option<&PartFile> {
    parts.last()
}

fn parse_part_index(name: &str, lead: &str) -> Option<u32> {
    let stem = name.strip_suffix(".csv")?;
    let suffix = stem.strip_prefix(lead)?;
    if suffix.is_empty() {
        return None;
    }
    suffix.parse::<u32>().ok()
}
