//! The process-scoped host context.
//!
//! One `HostContext` exists per orchestrator. It replaces global mutable
//! state: every stage callback receives it by mutable reference, and every
//! component that needs the patch board or the compatibility gate gets them
//! from here explicitly.

use crate::compat::CompatibilityGate;
use crate::patch::PatchBoard;

/// Process-scoped state handed to every stage callback.
#[derive(Debug)]
pub struct HostContext {
    patches: PatchBoard,
    gate: CompatibilityGate,
}

impl HostContext {
    pub(crate) fn new(gate: CompatibilityGate) -> Self {
        Self {
            patches: PatchBoard::new(),
            gate,
        }
    }

    /// The patch instrumentation board.
    #[must_use]
    pub fn patches(&self) -> &PatchBoard {
        &self.patches
    }

    /// Mutable access to the patch board, for installing patches.
    pub fn patches_mut(&mut self) -> &mut PatchBoard {
        &mut self.patches
    }

    /// The compatibility gate.
    #[must_use]
    pub fn gate(&self) -> &CompatibilityGate {
        &self.gate
    }

    /// Clear accumulated audit state. Teardown entry point for test
    /// isolation; does not undo installed patches.
    pub fn reset(&mut self) {
        self.patches.clear();
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use capstan_core::Version;

        use crate::compat::BuildTag;

        Self::new(CompatibilityGate::new(
            BuildTag::from("test-build"),
            Version::new(0, 1, 0),
        ))
    }
}
