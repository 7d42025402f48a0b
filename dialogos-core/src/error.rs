//! Error types for Dialogos operations

/// Result type for Dialogos operations
pub type Result<T> = std::result::Result<T, DialogosError>;

/// Error types for the Dialogos conversation core
#[derive(Debug, thiserror::Error)]
pub enum DialogosError {
    /// Message was empty, or became empty after normalization
    #[error("message is empty after normalization")]
    EmptyInput,

    /// Message matched a moderation deny pattern
    #[error("message rejected: {reason}")]
    ModerationRejected {
        /// Human-readable reason for the rejection
        reason: String,
    },

    /// Failure reaching or interpreting the completion provider
    #[error("completion provider error: {0}")]
    CompletionProvider(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DialogosError {
    /// True for errors caused by caller input (normalization, moderation).
    ///
    /// The transport layer maps these to client-error status codes; everything
    /// else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DialogosError::EmptyInput | DialogosError::ModerationRejected { .. }
        )
    }
}

impl From<String> for DialogosError {
    fn from(s: String) -> Self {
        DialogosError::Other(s)
    }
}

impl From<&str> for DialogosError {
    fn from(s: &str) -> Self {
        DialogosError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for DialogosError {
    fn from(err: anyhow::Error) -> Self {
        DialogosError::Other(err.to_string())
    }
}
