//! Upload coordination: splitting, target selection, and sequential
//! execution of chunk writes for one store at a time.
//!
//! Chunks go out strictly in splitter order because the rotation decision
//! for chunk N+1 depends on the reported outcome of chunk N. Processing
//! halts at the first failure; whatever succeeded stays recorded, both in
//! the outcome sequence and in the registry.

use crate::config::UploadConfig;
use crate::dataset::{Chunk, Dataset};
use crate::registry::{Registry, SpreadsheetId};
use crate::rotation::{RotationEngine, SheetProvisioner, SheetWriter, WriteOutcome};
use crate::split::split;
use crate::{Error, Result};

/// Terminal status of one chunk within an upload call.
#[derive(Debug)]
pub enum ChunkStatus {
    Ok,
    /// The structured error that stopped this chunk. Later chunks are not
    /// attempted; retrying is the caller's decision.
    Failed(Error),
}

impl ChunkStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChunkStatus::Ok)
    }
}

/// What happened to one chunk: the target it was (last) attempted against,
/// the absolute row range it covers, and how it ended.
#[derive(Debug)]
pub struct ChunkOutcome {
    pub spreadsheet_id: SpreadsheetId,
    pub row_range: (usize, usize),
    pub status: ChunkStatus,
}

/// Drives splitter output and rotation decisions for one store.
pub struct UploadCoordinator<R: Registry> {
    engine: RotationEngine<R>,
    config: UploadConfig,
}

impl<R: Registry> UploadCoordinator<R> {
    pub fn new(registry: R, config: UploadConfig) -> Self {
        let engine = RotationEngine::new(registry, config.title_prefix.clone());
        Self { engine, config }
    }

    pub fn registry(&self) -> &R {
        self.engine.registry()
    }

    pub fn into_registry(self) -> R {
        self.engine.into_registry()
    }

    /// Splits the dataset and pairs every chunk with the store's current
    /// target, provisioning the first spreadsheet when the store has none.
    /// That `NoTarget` provisioning is the only mutation a plan performs:
    /// capacity is only learnable from write outcomes, so rotation points
    /// cannot be predicted here.
    pub fn plan(
        &mut self,
        store: &str,
        dataset: &Dataset,
        provisioner: &mut dyn SheetProvisioner,
    ) -> Result<Vec<(Chunk, SpreadsheetId)>> {
        let chunks = split(dataset, &self.config)?;
        let target = self.engine.current_or_provision(store, provisioner)?;
        Ok(chunks
            .into_iter()
            .map(|chunk| (chunk, target.clone()))
            .collect())
    }

    /// Uploads a dataset chunk by chunk, rotating to a newly provisioned
    /// spreadsheet whenever the writer reports capacity exceeded. The
    /// rotated chunk is retried exactly once against the fresh target.
    ///
    /// Returns one outcome per attempted chunk, in order. The sequence ends
    /// at the first failed chunk; registry entries appended before the
    /// failure stand (they name real external resources).
    ///
    /// # Errors
    ///
    /// Fails without touching the registry if the dataset contains an
    /// unsplittable row, and before any write if the store's first
    /// spreadsheet cannot be provisioned.
    pub fn process_upload(
        &mut self,
        store: &str,
        dataset: &Dataset,
        provisioner: &mut dyn SheetProvisioner,
        writer: &mut dyn SheetWriter,
    ) -> Result<Vec<ChunkOutcome>> {
        let chunks = split(dataset, &self.config)?;
        log::info!(
            "uploading store={store}: {} rows in {} chunk(s)",
            dataset.row_count(),
            chunks.len()
        );

        let mut outcomes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let target = self.engine.current_or_provision(store, provisioner)?;
            let outcome = self.write_one(store, chunk, target, provisioner, writer);
            let failed = !outcome.status.is_ok();
            outcomes.push(outcome);
            if failed {
                log::warn!("halting store={store} after failed chunk");
                break;
            }
        }
        Ok(outcomes)
    }

    fn write_one(
        &mut self,
        store: &str,
        chunk: &Chunk,
        target: SpreadsheetId,
        provisioner: &mut dyn SheetProvisioner,
        writer: &mut dyn SheetWriter,
    ) -> ChunkOutcome {
        let row_range = chunk.row_range();
        match writer.write_chunk(&target, chunk) {
            WriteOutcome::Ok => ChunkOutcome {
                spreadsheet_id: target,
                row_range,
                status: ChunkStatus::Ok,
            },
            WriteOutcome::Failed(reason) => ChunkOutcome {
                spreadsheet_id: target.clone(),
                row_range,
                status: ChunkStatus::Failed(writer_error(store, target, row_range, reason)),
            },
            WriteOutcome::CapacityExceeded => {
                log::info!(
                    "store={store}: target {target} reported capacity exceeded, rotating"
                );
                let fresh = match self.engine.rotate(store, provisioner) {
                    Ok(id) => id,
                    Err(err) => {
                        return ChunkOutcome {
                            spreadsheet_id: target,
                            row_range,
                            status: ChunkStatus::Failed(err),
                        }
                    }
                };
                match writer.write_chunk(&fresh, chunk) {
                    WriteOutcome::Ok => ChunkOutcome {
                        spreadsheet_id: fresh,
                        row_range,
                        status: ChunkStatus::Ok,
                    },
                    WriteOutcome::Failed(reason) => ChunkOutcome {
                        spreadsheet_id: fresh.clone(),
                        row_range,
                        status: ChunkStatus::Failed(writer_error(store, fresh, row_range, reason)),
                    },
                    // A brand-new spreadsheet refusing the chunk means no
                    // amount of rotation will place it; one retry only.
                    WriteOutcome::CapacityExceeded => ChunkOutcome {
                        spreadsheet_id: fresh.clone(),
                        row_range,
                        status: ChunkStatus::Failed(writer_error(
                            store,
                            fresh,
                            row_range,
                            "capacity exceeded on freshly provisioned spreadsheet".to_string(),
                        )),
                    },
                }
            }
        }
    }
}

fn writer_error(
    store: &str,
    target: SpreadsheetId,
    row_range: (usize, usize),
    reason: impl Into<String>,
) -> Error {
    Error::Writer {
        store: store.to_string(),
        target,
        row_start: row_range.0,
        row_end: row_range.1,
        reason: reason.into(),
    }
}
