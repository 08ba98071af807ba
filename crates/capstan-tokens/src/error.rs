//! Token store error types.

/// Errors from token store operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The store was used before the module's setup stage ran.
    ///
    /// This is a programming error in the calling module — declare a
    /// dependency on the token-overrides module so activation order puts
    /// its setup first.
    #[error("token store is not initialized; depend on the token-overrides module")]
    Uninitialized,

    /// A token document failed to parse.
    #[error("token document parse error: {message}")]
    Parse {
        /// Parse error description.
        message: String,
    },

    /// I/O error reading a token document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TokenError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Result type for token store operations.
pub type TokenResult<T> = Result<T, TokenError>;
