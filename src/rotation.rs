//! Rotation engine: decides when a store's writes move to a new spreadsheet.
//!
//! Spreadsheet identifiers always originate from the external provisioning
//! capability; every registry entry therefore corresponds to a real,
//! externally confirmed resource. The engine is re-entered fresh on every
//! upload call, starting from whatever the registry currently reports.

use crate::dataset::Chunk;
use crate::registry::{Registry, SpreadsheetId};
use crate::{Error, Result};

/// Failure reported by the provisioning capability (quota, permissions).
/// The engine adds store context and propagates it unchanged otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionError {
    pub reason: String,
}

impl ProvisionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ProvisionError {}

/// External capability that creates spreadsheets.
pub trait SheetProvisioner {
    fn create_spreadsheet(
        &mut self,
        title: &str,
    ) -> std::result::Result<SpreadsheetId, ProvisionError>;
}

/// Closed result of one chunk write. `CapacityExceeded` is the rotate
/// trigger; `Failed` is any other writer-side error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Ok,
    CapacityExceeded,
    Failed(String),
}

/// External capability that writes one chunk into one spreadsheet.
pub trait SheetWriter {
    fn write_chunk(&mut self, target: &SpreadsheetId, chunk: &Chunk) -> WriteOutcome;
}

/// Per-store target selection over an injected [`Registry`].
///
/// States per store are implicit in the registry: `NoTarget` when
/// `current_target` is `None`, `HasTarget` otherwise. The only transitions
/// that mutate anything are the ones that append a freshly provisioned id.
pub struct RotationEngine<R: Registry> {
    registry: R,
    title_prefix: String,
}

impl<R: Registry> RotationEngine<R> {
    pub fn new(registry: R, title_prefix: impl Into<String>) -> Self {
        Self {
            registry,
            title_prefix: title_prefix.into(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Title for the store's next spreadsheet: `{prefix}_{store}_{n}`, `n`
    /// counting from 1 over the store's registered history.
    pub fn next_title(&self, store: &str) -> String {
        let n = self.registry.all(store).len() + 1;
        format!("{}_{}_{}", self.title_prefix, store, n)
    }

    /// Returns the store's current target, provisioning and registering the
    /// first spreadsheet when the store has none (`NoTarget → HasTarget`).
    pub fn current_or_provision(
        &mut self,
        store: &str,
        provisioner: &mut dyn SheetProvisioner,
    ) -> Result<SpreadsheetId> {
        if let Some(id) = self.registry.current_target(store) {
            return Ok(id.clone());
        }
        self.rotate(store, provisioner)
    }

    /// Provisions a new spreadsheet and appends it as the store's current
    /// target. The append is durable before the new id is handed back, so a
    /// crash after provisioning can never lose a live spreadsheet.
    pub fn rotate(
        &mut self,
        store: &str,
        provisioner: &mut dyn SheetProvisioner,
    ) -> Result<SpreadsheetId> {
        let title = self.next_title(store);
        log::info!("rotating store={store}: provisioning {title}");
        let id = provisioner
            .create_spreadsheet(&title)
            .map_err(|err| Error::Provisioning {
                store: store.to_string(),
                reason: err.reason,
            })?;
        self.registry.append(store, id.clone())?;
        match self.registry.current_target(store) {
            Some(current) if *current == id => Ok(id),
            _ => Err(Error::RegistryCorrupt {
                context: format!("store {store}"),
                reason: "no current target after append".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    struct CountingProvisioner {
        created: u32,
    }

    impl SheetProvisioner for CountingProvisioner {
        fn create_spreadsheet(
            &mut self,
            title: &str,
        ) -> std::result::Result<SpreadsheetId, ProvisionError> {
            self.created += 1;
            Ok(SpreadsheetId::new(format!("id:{title}")))
        }
    }

    #[test]
    fn first_call_provisions_then_reuses() {
        let mut engine = RotationEngine::new(MemoryRegistry::new(), "inventory_map");
        let mut provisioner = CountingProvisioner { created: 0 };

        let first = engine
            .current_or_provision("acme", &mut provisioner)
            .unwrap();
        assert_eq!(first.as_str(), "id:inventory_map_acme_1");
        assert_eq!(provisioner.created, 1);

        let second = engine
            .current_or_provision("acme", &mut provisioner)
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(provisioner.created, 1);
    }

    #[test]
    fn rotate_appends_in_order() {
        let mut engine = RotationEngine::new(MemoryRegistry::new(), "inventory_map");
        let mut provisioner = CountingProvisioner { created: 0 };

        engine.current_or_provision("acme", &mut provisioner).unwrap();
        engine.rotate("acme", &mut provisioner).unwrap();

        let ids: Vec<&str> = engine
            .registry()
            .all("acme")
            .iter()
            .map(SpreadsheetId::as_str)
            .collect();
        assert_eq!(ids, ["id:inventory_map_acme_1", "id:inventory_map_acme_2"]);
    }

    #[test]
    fn provisioning_failure_leaves_registry_untouched() {
        struct Quota;
        impl SheetProvisioner for Quota {
            fn create_spreadsheet(
                &mut self,
                _title: &str,
            ) -> std::result::Result<SpreadsheetId, ProvisionError> {
                Err(ProvisionError::new("quota exceeded"))
            }
        }

        let mut engine = RotationEngine::new(MemoryRegistry::new(), "inventory_map");
        let err = engine.current_or_provision("acme", &mut Quota).unwrap_err();
        assert!(matches!(err, Error::Provisioning { .. }));
        assert!(engine.registry().all("acme").is_empty());
    }
}
