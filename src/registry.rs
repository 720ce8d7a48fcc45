//! Durable store → spreadsheet-history mapping.
//!
//! The registry is the single source of truth for which spreadsheets exist
//! for a store and which one is current. Per-store sequences are append-only
//! and ordered oldest first; the last element is always the current write
//! target. Entries are never deleted or reordered by this crate — operators
//! may hand-edit the JSON file between runs, and that is supported.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opaque identifier issued by the external provisioning capability.
/// Never fabricated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpreadsheetId(String);

impl SpreadsheetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store → ordered spreadsheet history. `append` must be durable before it
/// returns for persistent implementations; duplicates are permitted because
/// the registry records history, not a set.
pub trait Registry {
    /// The store's current write target: the last element of its sequence,
    /// or `None` if the store has never been written (or has an empty entry).
    fn current_target(&self, store: &str) -> Option<&SpreadsheetId>;

    /// Appends `id` as the new last element for `store`, creating the entry
    /// if absent, and flushes before returning.
    fn append(&mut self, store: &str, id: SpreadsheetId) -> Result<()>;

    /// The full history for `store`, oldest first. Empty if unknown.
    fn all(&self, store: &str) -> &[SpreadsheetId];
}

/// Volatile registry for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    map: BTreeMap<String, Vec<SpreadsheetId>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for MemoryRegistry {
    fn current_target(&self, store: &str) -> Option<&SpreadsheetId> {
        self.map.get(store).and_then(|ids| ids.last())
    }

    fn append(&mut self, store: &str, id: SpreadsheetId) -> Result<()> {
        self.map.entry(store.to_string()).or_default().push(id);
        Ok(())
    }

    fn all(&self, store: &str) -> &[SpreadsheetId] {
        self.map.get(store).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Registry persisted as a human-editable JSON object:
///
/// ```json
/// { "acme": ["sheet_1", "sheet_2"] }
/// ```
///
/// Loaded once on open; every append rewrites the file atomically
/// (tmp + fsync + rename) so a crash never leaves a half-written mapping.
#[derive(Debug)]
pub struct JsonRegistry {
    path: PathBuf,
    map: BTreeMap<String, Vec<SpreadsheetId>>,
}

impl JsonRegistry {
    /// Opens the registry at `path`. A missing file is an empty registry;
    /// an unparseable one is surfaced as [`Error::RegistryCorrupt`], never
    /// silently reset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|err| Error::RegistryCorrupt {
                context: path.display().to_string(),
                reason: err.to_string(),
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores with at least one registered spreadsheet, sorted by name.
    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(store, _)| store.as_str())
    }

    fn flush(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.map)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Registry for JsonRegistry {
    fn current_target(&self, store: &str) -> Option<&SpreadsheetId> {
        self.map.get(store).and_then(|ids| ids.last())
    }

    fn append(&mut self, store: &str, id: SpreadsheetId) -> Result<()> {
        log::info!("registry append: store={store} id={id}");
        self.map
            .entry(store.to_string())
            .or_default()
            .push(id);
        self.flush()
    }

    fn all(&self, store: &str) -> &[SpreadsheetId] {
        self.map.get(store).map(Vec::as_slice).unwrap_or(&[])
    }
}
