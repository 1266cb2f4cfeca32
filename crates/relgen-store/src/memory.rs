//! In-memory backing store.

use crate::error::StoreError;
use crate::traits::Store;
use relgen_core::{FieldValues, Instance, InstanceId, ModelDescriptor, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Model name and the columns of one uniqueness group.
type UniqueKey = (String, Vec<String>);

/// Store keeping every row in memory.
///
/// Rows are grouped per model in creation order. Instance ids are unique
/// across models and start at 1. Unique fields and uniqueness-together
/// groups are indexed by their non-null value tuples.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Vec<Instance>>,
    locations: HashMap<InstanceId, (String, usize)>,
    unique_index: HashMap<UniqueKey, HashMap<Vec<Value>, InstanceId>>,
    next_id: u64,
}

/// Column groups whose value tuples must be unique: single unique fields
/// followed by the uniqueness-together groups.
fn unique_groups(model: &ModelDescriptor) -> Vec<Vec<String>> {
    model
        .generated_fields()
        .filter(|field| field.is_unique() && !field.is_many_to_many())
        .map(|field| vec![field.name.clone()])
        .chain(model.unique_together.iter().cloned())
        .collect()
}

/// Index key of a row for one group. Tuples with a null member never clash.
fn group_key(fields: &FieldValues, group: &[String]) -> Option<Vec<Value>> {
    group
        .iter()
        .map(|name| fields.get(name).filter(|v| !v.is_null()).cloned())
        .collect()
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the models with at least one row.
    pub fn model_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Look up a row by id.
    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        let (model, pos) = self.locations.get(&id)?;
        self.tables.get(model)?.get(*pos)
    }

    /// Total number of rows across all models.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Check if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn contains(&self, model: &str, id: InstanceId) -> bool {
        self.locations
            .get(&id)
            .is_some_and(|(owner, _)| owner == model)
    }

    /// Build the missing uniqueness indexes of `model` from its stored rows.
    fn ensure_indexes(&mut self, model: &ModelDescriptor) {
        for group in unique_groups(model) {
            let key = (model.name.clone(), group);
            if self.unique_index.contains_key(&key) {
                continue;
            }
            let index: HashMap<Vec<Value>, InstanceId> = self
                .tables
                .get(&model.name)
                .map(|rows| {
                    rows.iter()
                        .filter_map(|row| Some((group_key(&row.fields, &key.1)?, row.id)))
                        .collect()
                })
                .unwrap_or_default();
            self.unique_index.insert(key, index);
        }
    }

    fn index_row(&mut self, model: &ModelDescriptor, row: &Instance) {
        for group in unique_groups(model) {
            if let Some(tuple) = group_key(&row.fields, &group) {
                self.unique_index
                    .entry((model.name.clone(), group))
                    .or_default()
                    .insert(tuple, row.id);
            }
        }
    }

    fn unindex_row(&mut self, model: &ModelDescriptor, row: &Instance) {
        for group in unique_groups(model) {
            let Some(tuple) = group_key(&row.fields, &group) else {
                continue;
            };
            if let Some(index) = self.unique_index.get_mut(&(model.name.clone(), group)) {
                if index.get(&tuple) == Some(&row.id) {
                    index.remove(&tuple);
                }
            }
        }
    }

    /// Whether a row other than `exclude` already holds `tuple` for `group`.
    fn clashes(
        &self,
        model: &str,
        group: &[String],
        tuple: &[Value],
        exclude: Option<InstanceId>,
    ) -> bool {
        self.unique_index
            .get(&(model.to_string(), group.to_vec()))
            .and_then(|index| index.get(tuple))
            .is_some_and(|id| Some(*id) != exclude)
    }

    /// Check a row against every stored row of the model except `exclude`.
    ///
    /// Expects [`Self::ensure_indexes`] to have run for the model.
    fn check_row(
        &self,
        model: &ModelDescriptor,
        fields: &FieldValues,
        exclude: Option<InstanceId>,
    ) -> Result<(), String> {
        if let Some(name) = fields.keys().find(|name| model.get_field(name).is_none()) {
            return Err(format!("unknown field '{name}'"));
        }

        for field in model.generated_fields() {
            if field.is_many_to_many() {
                continue;
            }
            let value = fields.get(&field.name).unwrap_or(&Value::Null);
            if value.is_null() {
                if field.is_required() {
                    return Err(format!("field '{}' cannot be null", field.name));
                }
                continue;
            }

            if let Some(target) = field.related_model() {
                let Some(id) = value.as_ref_id() else {
                    return Err(format!(
                        "field '{}' must reference a '{target}' row, got {value}",
                        field.name
                    ));
                };
                if !self.contains(target, id) {
                    return Err(format!(
                        "field '{}' references missing '{target}' row {id}",
                        field.name
                    ));
                }
            }

            if field.is_unique()
                && self.clashes(
                    &model.name,
                    std::slice::from_ref(&field.name),
                    std::slice::from_ref(value),
                    exclude,
                )
            {
                return Err(format!(
                    "duplicate value {value} for unique field '{}'",
                    field.name
                ));
            }
        }

        for group in &model.unique_together {
            let Some(tuple) = group_key(fields, group) else {
                continue;
            };
            if self.clashes(&model.name, group, &tuple, exclude) {
                return Err(format!(
                    "duplicate values for unique together ({})",
                    group.join(", ")
                ));
            }
        }

        if let Some(constraint) = model.constraints.iter().find(|c| !c.check(fields)) {
            return Err(format!("constraint '{}' failed", constraint.name));
        }
        Ok(())
    }

    fn check_links(
        &self,
        model: &ModelDescriptor,
        links: &BTreeMap<String, Vec<InstanceId>>,
    ) -> Result<(), String> {
        for (name, ids) in links {
            let target = model
                .get_field(name)
                .filter(|field| field.is_many_to_many())
                .and_then(|field| field.related_model())
                .ok_or_else(|| format!("'{name}' is not a many-to-many field"))?;
            if let Some(id) = ids.iter().find(|id| !self.contains(target, **id)) {
                return Err(format!("'{name}' links missing '{target}' row {id}"));
            }
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn create(
        &mut self,
        model: &ModelDescriptor,
        values: FieldValues,
    ) -> Result<Instance, StoreError> {
        self.ensure_indexes(model);
        if let Err(reason) = self.check_row(model, &values, None) {
            debug!("Rejected new '{}' row: {}", model.name, reason);
            return Err(StoreError::integrity(&model.name, reason));
        }

        self.next_id += 1;
        let id = InstanceId(self.next_id);
        let instance = Instance::new(model.name.clone(), id, values);

        let rows = self.tables.entry(model.name.clone()).or_default();
        self.locations.insert(id, (model.name.clone(), rows.len()));
        rows.push(instance.clone());
        self.index_row(model, &instance);
        Ok(instance)
    }

    fn save(&mut self, model: &ModelDescriptor, instance: &Instance) -> Result<(), StoreError> {
        if instance.model != model.name {
            return Err(StoreError::UnknownModel(instance.model.clone()));
        }
        let pos = match self.locations.get(&instance.id) {
            Some((owner, pos)) if *owner == model.name => *pos,
            _ => {
                return Err(StoreError::UnknownInstance {
                    model: model.name.clone(),
                    id: instance.id,
                })
            }
        };

        self.ensure_indexes(model);
        let checked = self
            .check_row(model, &instance.fields, Some(instance.id))
            .and_then(|()| self.check_links(model, &instance.links));
        if let Err(reason) = checked {
            debug!("Rejected update of '{}' row {}: {}", model.name, instance.id, reason);
            return Err(StoreError::integrity(&model.name, reason));
        }

        let row = self
            .tables
            .get_mut(&model.name)
            .and_then(|rows| rows.get_mut(pos))
            .ok_or_else(|| StoreError::UnknownModel(model.name.clone()))?;
        let previous = std::mem::replace(row, instance.clone());
        self.unindex_row(model, &previous);
        self.index_row(model, instance);
        Ok(())
    }

    fn instances(&self, model: &str) -> Vec<Instance> {
        self.tables.get(model).cloned().unwrap_or_default()
    }

    fn count(&self, model: &str) -> usize {
        self.tables.get(model).map_or(0, Vec::len)
    }
}
