//! Module catalog, dependency resolution and staged activation for the
//! Capstan orchestrator.
//!
//! Capability modules register a [`ModuleDescriptor`] with the
//! [`Orchestrator`]; activation resolves the declared dependency graph into
//! a deterministic order and walks every module through the fixed
//! [`LifecycleStage`](capstan_core::LifecycleStage) sequence. Anything that
//! can be isolated to one module is isolated: a missing dependency, a
//! dependency cycle or a failing stage callback excludes that module and
//! never aborts the orchestration of its siblings.
//!
//! - [`ModuleCatalog`]: Explicit registration table for module descriptors
//! - [`resolve`]: Deterministic topological activation order with
//!   degrade-not-abort exclusion reporting
//! - [`StageScheduler`]: Staged callback execution with per-module failure
//!   isolation
//! - [`CompatibilityGate`]: Warn-only host build/version comparison
//! - [`PatchBoard`]: Auditable wrapper around runtime patch installation
//! - [`HostContext`]: Process-scoped state handed to every stage callback

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod compat;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod orchestrator;
pub mod patch;
pub mod preflight;
pub mod resolver;
pub mod scheduler;

pub use catalog::ModuleCatalog;
pub use compat::{BuildTag, Compatibility, CompatibilityGate};
pub use context::HostContext;
pub use descriptor::{ModuleDescriptor, StageCallback};
pub use error::{ModuleError, RuntimeError, RuntimeResult};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use patch::{PatchBoard, PatchRecord, PatchTarget};
pub use preflight::{PreflightConfig, PreflightReport};
pub use resolver::{Exclusion, ExclusionReason, Resolution, resolve};
pub use scheduler::{ActivationReport, StageScheduler};
