//! Staged activation.
//!
//! Walks the resolved module order through the fixed global stage sequence,
//! invoking each module's callback for every stage it requested. A failing
//! callback moves that module to `Failed` and skips its later stages; it
//! never prevents sibling callbacks from running in the same stage.

use std::collections::HashMap;

use tracing::{debug, error, info};

use capstan_core::{LifecycleStage, ModuleId, ModuleState};

use crate::context::HostContext;
use crate::resolver::{Exclusion, Resolution};

/// The outcome of one activation pass.
#[derive(Debug)]
pub struct ActivationReport {
    /// Modules that completed every requested stage.
    pub activated: Vec<ModuleId>,
    /// Modules whose stage callback failed, with the failure message.
    pub failed: Vec<(ModuleId, String)>,
    /// Modules excluded at resolution time.
    pub excluded: Vec<Exclusion>,
}

impl ActivationReport {
    /// Whether the named module activated fully.
    #[must_use]
    pub fn is_activated(&self, id: &ModuleId) -> bool {
        self.activated.contains(id)
    }
}

/// Drives modules through the lifecycle stage sequence and tracks their
/// states.
#[derive(Debug, Default)]
pub struct StageScheduler {
    states: HashMap<ModuleId, ModuleState>,
}

impl StageScheduler {
    /// Create a scheduler with no recorded module states.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded state of a module, if it went through this scheduler.
    #[must_use]
    pub fn state(&self, id: &ModuleId) -> Option<&ModuleState> {
        self.states.get(id)
    }

    /// Whether a module completed activation.
    #[must_use]
    pub fn is_activated(&self, id: &ModuleId) -> bool {
        matches!(self.states.get(id), Some(ModuleState::Activated))
    }

    /// Run every stage of [`LifecycleStage::SEQUENCE`] over the resolved
    /// order, invoking each module's callbacks.
    pub fn run(&mut self, resolution: Resolution, ctx: &mut HostContext) -> ActivationReport {
        let Resolution { mut ordered, excluded } = resolution;

        for desc in &ordered {
            self.states
                .insert(desc.id().clone(), ModuleState::Resolved);
        }
        // Excluded modules were discovered but never earned an activation
        // slot; they stay in their pre-resolution state.
        for exclusion in &excluded {
            self.states
                .entry(exclusion.id.clone())
                .or_insert(ModuleState::Discovered);
        }

        let mut failed = Vec::new();
        for stage in LifecycleStage::SEQUENCE {
            for desc in &mut ordered {
                let id = desc.id().clone();
                if self.states.get(&id).is_some_and(ModuleState::is_failed) {
                    continue;
                }
                let Some(callback) = desc.callback_mut(stage) else {
                    continue;
                };

                if matches!(self.states.get(&id), Some(ModuleState::Resolved)) {
                    self.states.insert(id.clone(), ModuleState::Activating);
                }
                debug!(module_id = %id, stage = %stage, "Running stage callback");

                if let Err(e) = callback(ctx) {
                    error!(
                        module_id = %id,
                        stage = %stage,
                        error = %e,
                        "Module failed to activate"
                    );
                    self.states
                        .insert(id.clone(), ModuleState::Failed(e.to_string()));
                    failed.push((id, e.to_string()));
                }
            }
        }

        let mut activated = Vec::new();
        for desc in &ordered {
            let id = desc.id();
            if !self.states.get(id).is_some_and(ModuleState::is_failed) {
                self.states.insert(id.clone(), ModuleState::Activated);
                activated.push(id.clone());
            }
        }

        info!(
            activated = activated.len(),
            failed = failed.len(),
            excluded = excluded.len(),
            "Module activation complete"
        );
        ActivationReport {
            activated,
            failed,
            excluded,
        }
    }
}
