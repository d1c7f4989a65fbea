//! Error taxonomy shared by every typology crate

/// Errors raised by configuration loading and by the classification engine.
///
/// An unresolved classification is not an error: it is reported as a
/// completed run whose `final_category` is `None`.
#[derive(Debug, thiserror::Error)]
pub enum TypologyError {
    /// The stage graph or another configuration document is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An answer id that is neither in the answer scale nor numeric.
    #[error("Invalid answer: '{answer}' is not in the answer scale and is not a numeric score")]
    InvalidAnswer { answer: String },

    /// The engine was driven out of order (e.g. `answer()` before `start()`).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TypologyError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

/// Result type alias for typology operations
pub type TypologyResult<T> = Result<T, TypologyError>;
