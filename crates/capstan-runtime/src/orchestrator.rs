//! The orchestrator.
//!
//! Ties the catalog, resolver, scheduler, compatibility gate and patch
//! instrumentation together behind one entry type. Modules register before
//! host startup completes; `activate` runs the single discovery-and-
//! activation pass; afterwards the host queries module status and feeds the
//! gate its build and version observations.

use tracing::{info, warn};

use capstan_core::{ModuleId, Version};

use crate::catalog::ModuleCatalog;
use crate::compat::{BuildTag, Compatibility, CompatibilityGate};
use crate::context::HostContext;
use crate::descriptor::ModuleDescriptor;
use crate::error::{RuntimeError, RuntimeResult};
use crate::preflight::{self, PreflightConfig, PreflightReport};
use crate::resolver::resolve;
use crate::scheduler::{ActivationReport, StageScheduler};

/// Configuration for an orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// The host build this orchestrator was built against.
    pub expected_build: BuildTag,
    /// The orchestrator's own version.
    pub version: Version,
    /// Preflight policy for the host's code-unit inventory.
    pub preflight: PreflightConfig,
}

impl OrchestratorConfig {
    /// Configuration with the given expected build, the crate's own version
    /// and no preflight policy.
    #[must_use]
    pub fn new(expected_build: impl Into<BuildTag>) -> Self {
        Self {
            expected_build: expected_build.into(),
            version: Version::current(),
            preflight: PreflightConfig::default(),
        }
    }

    /// Override the orchestrator version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the preflight policy.
    #[must_use]
    pub fn with_preflight(mut self, preflight: PreflightConfig) -> Self {
        self.preflight = preflight;
        self
    }
}

/// Discovers, resolves and activates capability modules, once per process.
pub struct Orchestrator {
    catalog: ModuleCatalog,
    scheduler: StageScheduler,
    context: HostContext,
    preflight: PreflightConfig,
    activated: bool,
}

impl Orchestrator {
    /// Create an orchestrator from configuration.
    #[must_use]
    pub fn new(config: OrchestratorConfig) -> Self {
        let gate = CompatibilityGate::new(config.expected_build, config.version);
        Self {
            catalog: ModuleCatalog::new(),
            scheduler: StageScheduler::new(),
            context: HostContext::new(gate),
            preflight: config.preflight,
            activated: false,
        }
    }

    /// Register a capability module.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AlreadyRegistered`] for a duplicate module ID
    /// and [`RuntimeError::AlreadyActivated`] once the activation pass has
    /// run. Either way the rejection affects only the offending module.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> RuntimeResult<()> {
        if self.activated {
            return Err(RuntimeError::AlreadyActivated);
        }
        self.catalog.register(descriptor)
    }

    /// Run the preflight checks over the host's code-unit inventory.
    ///
    /// Warning output only; findings never block activation.
    #[must_use]
    pub fn run_preflight(&self, inventory: &[String]) -> PreflightReport {
        preflight::run_preflight(&self.preflight, inventory)
    }

    /// Resolve and activate every registered module.
    ///
    /// Discovery happens once at process start: the catalog is drained and
    /// the pass cannot be repeated.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AlreadyActivated`] on a second call.
    pub fn activate(&mut self) -> RuntimeResult<ActivationReport> {
        if self.activated {
            return Err(RuntimeError::AlreadyActivated);
        }
        self.activated = true;

        let descriptors = self.catalog.take_descriptors();
        info!(count = descriptors.len(), "Resolving module dependencies");
        let resolution = resolve(descriptors);
        Ok(self.scheduler.run(resolution, &mut self.context))
    }

    /// Whether the named module activated fully.
    ///
    /// Before the activation pass this returns `false` with a warning — the
    /// answer cannot reflect actual load status yet.
    #[must_use]
    pub fn is_active(&self, id: &ModuleId) -> bool {
        if !self.activated {
            warn!(
                module_id = %id,
                "is_active called before activation, result may not reflect actual load status"
            );
            return false;
        }
        self.scheduler.is_activated(id)
    }

    /// Whether the one-time activation pass has run.
    #[must_use]
    pub fn has_activated(&self) -> bool {
        self.activated
    }

    /// The process-scoped host context.
    #[must_use]
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    /// Mutable access to the host context.
    pub fn context_mut(&mut self) -> &mut HostContext {
        &mut self.context
    }

    /// Record the host's reported build identifier (warn-only).
    pub fn observe_build(&self, observed: &BuildTag) -> Compatibility {
        self.context.gate().observe_build(observed)
    }

    /// Record the host's reported version string (warn-only).
    pub fn observe_host_version(&self, raw: &str) {
        self.context.gate().observe_host_version(raw);
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registered", &self.catalog.len())
            .field("activated", &self.activated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use capstan_core::LifecycleStage;

    use super::*;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(OrchestratorConfig::new("test-build").with_version(Version::new(1, 0, 0)))
    }

    #[test]
    fn test_register_activate_query() {
        let mut orch = orchestrator();
        orch.register(
            ModuleDescriptor::new(ModuleId::from_static("alpha"))
                .on_stage(LifecycleStage::PostInit, |_| Ok(())),
        )
        .unwrap();

        let report = orch.activate().unwrap();
        assert!(report.is_activated(&ModuleId::from_static("alpha")));
        assert!(orch.is_active(&ModuleId::from_static("alpha")));
        assert!(!orch.is_active(&ModuleId::from_static("missing")));
    }

    #[test]
    fn test_is_active_before_activation_is_false() {
        let mut orch = orchestrator();
        orch.register(ModuleDescriptor::new(ModuleId::from_static("alpha")))
            .unwrap();
        assert!(!orch.is_active(&ModuleId::from_static("alpha")));
    }

    #[test]
    fn test_second_activation_rejected() {
        let mut orch = orchestrator();
        orch.activate().unwrap();
        assert!(matches!(
            orch.activate(),
            Err(RuntimeError::AlreadyActivated)
        ));
    }

    #[test]
    fn test_register_after_activation_rejected() {
        let mut orch = orchestrator();
        orch.activate().unwrap();
        let result = orch.register(ModuleDescriptor::new(ModuleId::from_static("late")));
        assert!(matches!(result, Err(RuntimeError::AlreadyActivated)));
    }

    #[test]
    fn test_observe_build_never_errors() {
        let orch = orchestrator();
        assert!(orch.observe_build(&BuildTag::from("test-build")).is_match());
        assert!(!orch.observe_build(&BuildTag::from("other")).is_match());
        orch.observe_host_version("1.5.0");
    }
}
