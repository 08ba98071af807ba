//! Core error types.

/// Errors from core type construction.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The module ID is invalid.
    #[error("invalid module id: {0}")]
    InvalidId(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
