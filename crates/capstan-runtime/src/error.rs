//! Runtime error types.

use capstan_core::ModuleId;

/// Errors from orchestrator operations.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A module with this ID is already registered.
    #[error("module already registered: {0}")]
    AlreadyRegistered(ModuleId),

    /// The module ID is invalid.
    #[error("invalid module id: {0}")]
    InvalidId(String),

    /// The orchestrator has already run its one-time activation pass.
    #[error("orchestrator already activated; modules are discovered once at process start")]
    AlreadyActivated,
}

impl From<capstan_core::CoreError> for RuntimeError {
    fn from(e: capstan_core::CoreError) -> Self {
        match e {
            capstan_core::CoreError::InvalidId(msg) => Self::InvalidId(msg),
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// A failure reported by a module's stage callback.
///
/// The failing module transitions to
/// [`ModuleState::Failed`](capstan_core::ModuleState::Failed); its siblings
/// are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The module could not complete its stage work.
    #[error("{0}")]
    Failed(String),

    /// I/O error during module setup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModuleError {
    /// Create a failure with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
