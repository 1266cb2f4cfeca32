//! Store trait definition.
//!
//! The generator only ever talks to the backing store through this trait, so
//! any persistence layer that can enforce row constraints can sit behind it.

use crate::error::StoreError;
use relgen_core::{FieldValues, Instance, ModelDescriptor};

/// Trait for persisting generated instances.
///
/// # Usage Pattern
///
/// The generator is generic over the store:
///
/// ```ignore
/// pub fn generate_test_data<S: Store>(
///     schema: &Schema,
///     store: &mut S,
///     config: &GenerationConfig,
/// ) -> Result<GenerationReport, GenerationError> {
///     let instance = store.create(model, values)?;
/// }
/// ```
pub trait Store {
    /// Persist a new row of `model`.
    ///
    /// Assigns the instance id. Returns [`StoreError::Integrity`] and stores
    /// nothing when the row violates a nullability, uniqueness,
    /// uniqueness-together, reference or model constraint.
    fn create(
        &mut self,
        model: &ModelDescriptor,
        values: FieldValues,
    ) -> Result<Instance, StoreError>;

    /// Replace a previously created row.
    ///
    /// Runs the same checks as [`Store::create`] against every other row,
    /// and additionally checks that many-to-many links point at existing rows.
    fn save(&mut self, model: &ModelDescriptor, instance: &Instance) -> Result<(), StoreError>;

    /// Rows of `model` in creation order.
    fn instances(&self, model: &str) -> Vec<Instance>;

    /// Number of rows of `model`.
    fn count(&self, model: &str) -> usize {
        self.instances(model).len()
    }
}
