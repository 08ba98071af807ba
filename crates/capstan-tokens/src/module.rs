//! The token-overrides capability module.
//!
//! Wires the store into the orchestrator: the module's hook-install stage
//! callback flips the store's one-time latch and loads every token document
//! found under the configured plugin-asset directory. Modules that write to
//! the store declare a dependency on [`module_id`] so activation order puts
//! this setup first.

use std::path::PathBuf;

use tracing::{debug, info};

use capstan_core::{LifecycleStage, ModuleId};
use capstan_runtime::{ModuleDescriptor, ModuleError};

use crate::discovery::load_documents_from_dir;
use crate::store::TokenStore;

/// The ID under which the token-overrides module registers.
#[must_use]
pub fn module_id() -> ModuleId {
    ModuleId::from_static("token-overrides")
}

/// Build the module descriptor for a store.
///
/// When `asset_root` is given, documents under it are loaded during the
/// hook-install stage; otherwise the store starts empty and is populated by
/// other modules or by explicit loads.
#[must_use]
pub fn descriptor(store: TokenStore, asset_root: Option<PathBuf>) -> ModuleDescriptor {
    ModuleDescriptor::new(module_id()).on_stage(LifecycleStage::HookInstall, move |_ctx| {
        if !store.initialize() {
            debug!("Token store already initialized, skipping setup");
            return Ok(());
        }

        if let Some(root) = &asset_root {
            let loaded = load_documents_from_dir(&store, root)
                .map_err(|e| ModuleError::failed(e.to_string()))?;
            info!(
                count = loaded,
                root = %root.display(),
                "Loaded token documents from asset directory"
            );
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use capstan_runtime::{Orchestrator, OrchestratorConfig};

    use super::*;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(OrchestratorConfig::new("test-build"))
    }

    #[test]
    fn test_setup_initializes_store() {
        let store = TokenStore::new();
        let mut orch = orchestrator();
        orch.register(descriptor(store.clone(), None)).unwrap();

        assert!(!store.is_initialized());
        let report = orch.activate().unwrap();

        assert!(report.is_activated(&module_id()));
        assert!(store.is_initialized());
        assert_eq!(store.resolve("anything", "en").unwrap(), None);
    }

    #[test]
    fn test_setup_loads_asset_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("pack.tokens"),
            r#"{"en": {"greet": "hi"}, "fr": {"greet": "salut"}}"#,
        )
        .unwrap();

        let store = TokenStore::new();
        let mut orch = orchestrator();
        orch.register(descriptor(store.clone(), Some(tmp.path().to_path_buf())))
            .unwrap();
        orch.activate().unwrap();

        assert_eq!(store.resolve("greet", "fr").unwrap(), Some("salut".into()));
        assert_eq!(store.resolve("greet", "de").unwrap(), Some("hi".into()));
    }

    #[test]
    fn test_store_rejects_writes_before_activation() {
        let store = TokenStore::new();
        let mut orch = orchestrator();
        orch.register(descriptor(store.clone(), None)).unwrap();

        // Activation has not run yet: the latch is still down.
        assert!(store.set_generic("k", "v").is_err());
    }
}
