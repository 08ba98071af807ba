//! Module catalog.
//!
//! An explicit registration table: each capability module hands the catalog
//! a plain [`ModuleDescriptor`] value. A rejected registration (duplicate
//! identity) affects only the offending module; registration of the
//! remaining modules proceeds.

use std::collections::HashSet;

use tracing::info;

use capstan_core::ModuleId;

use crate::descriptor::ModuleDescriptor;
use crate::error::{RuntimeError, RuntimeResult};

/// Registration table for module descriptors, in declaration order.
#[derive(Default)]
pub struct ModuleCatalog {
    modules: Vec<ModuleDescriptor>,
    ids: HashSet<ModuleId>,
}

impl ModuleCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AlreadyRegistered`] if a module with the same
    /// ID is already in the catalog. The catalog is unchanged in that case.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> RuntimeResult<()> {
        let id = descriptor.id().clone();
        if self.ids.contains(&id) {
            return Err(RuntimeError::AlreadyRegistered(id));
        }

        info!(
            module_id = %id,
            dependencies = descriptor.depends_on().len(),
            stages = descriptor.stages().len(),
            "Registered module"
        );
        self.ids.insert(id);
        self.modules.push(descriptor);
        Ok(())
    }

    /// Whether a module with the given ID is registered.
    #[must_use]
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.ids.contains(id)
    }

    /// Registered module IDs, in declaration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&ModuleId> {
        self.modules.iter().map(ModuleDescriptor::id).collect()
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drain the catalog into its descriptors, in declaration order.
    pub(crate) fn take_descriptors(&mut self) -> Vec<ModuleDescriptor> {
        self.ids.clear();
        std::mem::take(&mut self.modules)
    }
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("module_count", &self.modules.len())
            .field("module_ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> ModuleDescriptor {
        ModuleDescriptor::new(ModuleId::from_static(id))
    }

    #[test]
    fn test_register_and_contains() {
        let mut catalog = ModuleCatalog::new();
        assert!(catalog.is_empty());

        catalog.register(descriptor("alpha")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains(&ModuleId::from_static("alpha")));
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(descriptor("alpha")).unwrap();

        let result = catalog.register(descriptor("alpha"));
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::AlreadyRegistered(_)
        ));
        // Only the duplicate is rejected.
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_does_not_block_later_registrations() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(descriptor("alpha")).unwrap();
        let _ = catalog.register(descriptor("alpha"));
        catalog.register(descriptor("beta")).unwrap();

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(descriptor("gamma")).unwrap();
        catalog.register(descriptor("alpha")).unwrap();
        catalog.register(descriptor("beta")).unwrap();

        let ids: Vec<&str> = catalog.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn test_take_descriptors_empties_catalog() {
        let mut catalog = ModuleCatalog::new();
        catalog.register(descriptor("alpha")).unwrap();

        let taken = catalog.take_descriptors();
        assert_eq!(taken.len(), 1);
        assert!(catalog.is_empty());
        assert!(!catalog.contains(&ModuleId::from_static("alpha")));
    }
}
