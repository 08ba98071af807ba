//! Module descriptors.
//!
//! A [`ModuleDescriptor`] is the declarative registration surface of a
//! capability module: identity, the modules that must activate first, and
//! one callback per requested lifecycle stage. Descriptors are plain values
//! built in code and handed to the catalog — there is no reflective
//! discovery.

use std::collections::HashMap;
use std::fmt;

use capstan_core::{LifecycleStage, ModuleId};

use crate::context::HostContext;
use crate::error::ModuleError;

/// A stage callback invoked with the process-scoped host context.
///
/// Callbacks run on the host's startup thread; they are expected to finish
/// cheap setup work without blocking.
pub type StageCallback = Box<dyn FnMut(&mut HostContext) -> Result<(), ModuleError>>;

/// Declarative metadata and callbacks for one capability module.
pub struct ModuleDescriptor {
    id: ModuleId,
    depends_on: Vec<ModuleId>,
    stages: Vec<LifecycleStage>,
    callbacks: HashMap<LifecycleStage, StageCallback>,
}

impl ModuleDescriptor {
    /// Create a descriptor with no dependencies and no stages.
    #[must_use]
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            depends_on: Vec::new(),
            stages: Vec::new(),
            callbacks: HashMap::new(),
        }
    }

    /// Declare a module that must activate before this one.
    #[must_use]
    pub fn with_dependency(mut self, dep: ModuleId) -> Self {
        self.depends_on.push(dep);
        self
    }

    /// Register a callback for a lifecycle stage.
    ///
    /// Registering the same stage twice replaces the earlier callback; the
    /// stage keeps its original declaration position.
    #[must_use]
    pub fn on_stage<F>(mut self, stage: LifecycleStage, callback: F) -> Self
    where
        F: FnMut(&mut HostContext) -> Result<(), ModuleError> + 'static,
    {
        if !self.stages.contains(&stage) {
            self.stages.push(stage);
        }
        self.callbacks.insert(stage, Box::new(callback));
        self
    }

    /// The module's identity.
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Modules that must activate before this one.
    #[must_use]
    pub fn depends_on(&self) -> &[ModuleId] {
        &self.depends_on
    }

    /// Requested stages, in declaration order.
    #[must_use]
    pub fn stages(&self) -> &[LifecycleStage] {
        &self.stages
    }

    /// Whether the module requested the given stage.
    #[must_use]
    pub fn requests(&self, stage: LifecycleStage) -> bool {
        self.callbacks.contains_key(&stage)
    }

    pub(crate) fn callback_mut(&mut self, stage: LifecycleStage) -> Option<&mut StageCallback> {
        self.callbacks.get_mut(&stage)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("depends_on", &self.depends_on)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}
