//! Upload configuration and size thresholds.
//!
//! The classifier and splitter share one measurement function selected by
//! [`MeasureUnit`]; mixing units between the two would break the fit
//! guarantee, so the unit lives in config and nowhere else.

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Hard per-spreadsheet limit: a dataset or chunk above this must rotate.
pub const DEFAULT_HARD_BYTES: u64 = 60 * MIB;
/// Advisory levels for the size audit report.
pub const DEFAULT_ALERT_BYTES: u64 = 50 * MIB;
pub const DEFAULT_WARN_BYTES: u64 = 40 * MIB;

pub const DEFAULT_TITLE_PREFIX: &str = "inventory_map";

/// Unit used to measure datasets, rows, and chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    Rows,
    Bytes,
}

impl std::str::FromStr for MeasureUnit {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "rows" => Ok(MeasureUnit::Rows),
            "bytes" => Ok(MeasureUnit::Bytes),
            other => Err(format!("unknown measurement unit: {other}")),
        }
    }
}

impl std::fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureUnit::Rows => write!(f, "rows"),
            MeasureUnit::Bytes => write!(f, "bytes"),
        }
    }
}

/// Configuration for one store's plan/upload cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum measured size of a single chunk, in `unit`.
    pub size_threshold: u64,
    pub unit: MeasureUnit,
    /// New spreadsheets are titled `{title_prefix}_{store}_{n}`.
    pub title_prefix: String,
}

impl UploadConfig {
    pub fn new(size_threshold: u64, unit: MeasureUnit) -> Self {
        Self {
            size_threshold,
            unit,
            title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HARD_BYTES, MeasureUnit::Bytes)
    }
}

/// Byte thresholds for the local part-file audit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeLevels {
    pub warn_bytes: u64,
    pub alert_bytes: u64,
    pub hard_bytes: u64,
}

impl Default for SizeLevels {
    fn default() -> Self {
        Self {
            warn_bytes: DEFAULT_WARN_BYTES,
            alert_bytes: DEFAULT_ALERT_BYTES,
            hard_bytes: DEFAULT_HARD_BYTES,
        }
    }
}
