//! Error types for test-data generation.

use relgen_core::SchemaError;
use relgen_store::StoreError;
use relgen_synth::SynthError;
use thiserror::Error;

/// Errors that abort a generation run.
///
/// Rows rejected by the store are not errors: they are reported as skipped
/// instances in the model outcome.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Required relations form a cycle; nothing was generated.
    #[error("Cyclic dependency between models: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A unique field cannot produce enough distinct valid values.
    #[error(
        "Sparse generator for unique field '{model}.{field}': \
         {found} distinct values, {needed} needed"
    )]
    SparseGenerator {
        model: String,
        field: String,
        found: usize,
        needed: usize,
    },

    /// A synthesizer was asked for impossible bounds.
    #[error("Inconsistent definition of '{model}.{field}': {reason}")]
    InconsistentDefinition {
        model: String,
        field: String,
        reason: String,
    },

    /// A value override cannot be driven as configured.
    #[error("Invalid generator for '{model}.{field}': {reason}")]
    InvalidGenerator {
        model: String,
        field: String,
        reason: String,
    },

    /// A requested model is not declared in the schema.
    #[error("Model '{0}' not found in schema")]
    UnknownModel(String),

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Store error other than a rejected row.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl GenerationError {
    /// Attach the field location to a synthesizer error.
    pub fn from_synth(model: &str, field: &str, err: SynthError) -> Self {
        match err {
            SynthError::InconsistentDefinition(reason) => Self::InconsistentDefinition {
                model: model.to_string(),
                field: field.to_string(),
                reason,
            },
            SynthError::InvalidOverride { .. } => Self::InvalidGenerator {
                model: model.to_string(),
                field: field.to_string(),
                reason: err.to_string(),
            },
            SynthError::Encoding(e) => Self::Io(e),
        }
    }

    pub(crate) fn invalid_generator(model: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidGenerator {
            model: model.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;
