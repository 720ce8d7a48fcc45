//! Size-based rotation of per-store inventory CSV exports across external
//! spreadsheets.
//!
//! A store's export grows without bound while each spreadsheet has a hard
//! size limit, so writes rotate to a freshly provisioned spreadsheet
//! whenever the current one fills up. The durable registry keeps the full
//! ordered history of spreadsheet ids per store; its last entry is always
//! the current write target. Everything external (provisioning, the actual
//! uploads, reads) sits behind capability traits.
//!
//! Processing is synchronous and handles one store at a time; chunk N+1's
//! target depends on the reported outcome of chunk N. The crate assumes a
//! single active writer per store — callers running concurrent processes
//! must serialize registry writes per store themselves.

pub mod config;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod registry;
pub mod report;
pub mod rotation;
pub mod split;
pub mod upload;

pub use config::{MeasureUnit, SizeLevels, UploadConfig};
pub use dataset::{Chunk, Dataset};
pub use error::{Error, Result};
pub use merge::{merge_datasets, merge_history, SheetReader};
pub use registry::{JsonRegistry, MemoryRegistry, Registry, SpreadsheetId};
pub use report::{find_parts, latest_part, PartFile, SizeLevel};
pub use rotation::{ProvisionError, RotationEngine, SheetProvisioner, SheetWriter, WriteOutcome};
pub use split::{classify, split, Fit};
pub use upload::{ChunkOutcome, ChunkStatus, UploadCoordinator};
