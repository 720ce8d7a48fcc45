use thiserror::Error;

use crate::registry::SpreadsheetId;

#[derive(Debug, Error)]
pub enum Error {
    /// A single row measures larger than the configured threshold, so no
    /// contiguous split can bound it.
    #[error("row {row_index} measures {measured} which exceeds threshold {threshold}")]
    UnsplittableRow {
        row_index: usize,
        measured: u64,
        threshold: u64,
    },

    /// The external capability failed to create a spreadsheet (quota, etc.).
    #[error("provisioning failed for store {store}: {reason}")]
    Provisioning { store: String, reason: String },

    /// A chunk upload failed for a non-capacity reason. Carries enough
    /// context to retry that one chunk externally.
    #[error("write failed for store {store}, rows {row_start}..{row_end}, target {target}: {reason}")]
    Writer {
        store: String,
        target: SpreadsheetId,
        row_start: usize,
        row_end: usize,
        reason: String,
    },

    /// The registry cannot be trusted: unparseable on disk, or an empty
    /// sequence where a current target was expected. Never silently reset.
    #[error("registry corrupt ({context}): {reason}")]
    RegistryCorrupt { context: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
