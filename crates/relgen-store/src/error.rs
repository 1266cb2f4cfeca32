//! Error types for the backing store.

use relgen_core::InstanceId;
use thiserror::Error;

/// Errors returned by a [`Store`](crate::Store).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The row violates a constraint and was not persisted.
    #[error("Integrity error on '{model}': {reason}")]
    Integrity { model: String, reason: String },

    /// No rows of the model were ever stored.
    #[error("Model '{0}' not found in store")]
    UnknownModel(String),

    /// The instance being saved was never created.
    #[error("Instance {id} of '{model}' not found in store")]
    UnknownInstance { model: String, id: InstanceId },
}

impl StoreError {
    pub(crate) fn integrity(model: &str, reason: impl Into<String>) -> Self {
        Self::Integrity {
            model: model.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns the rejected row.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}
