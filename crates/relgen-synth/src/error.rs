//! Error types for value synthesis.

/// Error type for synthesizer operations.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The requested bounds cannot be satisfied by any value
    #[error("Inconsistent definition: {0}")]
    InconsistentDefinition(String),

    /// A declarative generator that cannot be driven as configured
    #[error("Invalid '{generator}' generator: {reason}")]
    InvalidOverride {
        generator: &'static str,
        reason: String,
    },

    /// Error while encoding binary payloads
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::io::Error),
}

impl SynthError {
    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        Self::InconsistentDefinition(message.into())
    }

    pub(crate) fn invalid_override(generator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOverride {
            generator,
            reason: reason.into(),
        }
    }
}

/// Result type for synthesizer operations.
pub type Result<T> = std::result::Result<T, SynthError>;
