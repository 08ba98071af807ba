//! Core types and traits for the Capstan module orchestrator.
//!
//! This crate holds the leaf types shared by the runtime and by capability
//! modules:
//!
//! - [`ModuleId`]: Stable, human-readable module identifier
//! - [`ModuleState`]: Lifecycle state machine for a module
//! - [`LifecycleStage`]: The fixed global activation stage sequence
//! - [`Version`]: Semantic version with the host compatibility rule
//!
//! `LifecycleStage` lives here so that the runtime and capability-module
//! crates can reference it without creating a circular dependency.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod module;
pub mod stage;
pub mod version;

pub use error::{CoreError, CoreResult};
pub use module::{ModuleId, ModuleState};
pub use stage::LifecycleStage;
pub use version::{Version, VersionParseError};
