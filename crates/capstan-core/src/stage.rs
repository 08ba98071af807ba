//! Lifecycle stage sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named phase in the fixed global activation sequence.
///
/// Stages always execute in the order of [`LifecycleStage::SEQUENCE`];
/// within a stage, modules execute in activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleStage {
    /// Setup that must happen before any runtime patch is installed.
    PrePatch,
    /// Installation of runtime patches and detours.
    HookInstall,
    /// Setup that runs after every module has installed its hooks.
    PostInit,
}

impl LifecycleStage {
    /// The fixed global stage order.
    pub const SEQUENCE: [Self; 3] = [Self::PrePatch, Self::HookInstall, Self::PostInit];
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrePatch => write!(f, "pre-patch"),
            Self::HookInstall => write!(f, "hook-install"),
            Self::PostInit => write!(f, "post-init"),
        }
    }
}
