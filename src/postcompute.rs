//! Post-compute pass over deferred fields.
//!
//! Runs once every model of the run has been through the primary pass, so
//! relational fields can draw from every stored row. Each (model, field)
//! pair is resolved once:
//!
//! - many-to-many fields link every row to a random subset of target rows,
//!   at most [`MAX_LINKS`] of them (at least one when the field is required)
//! - singular fields get pooled values zipped onto the rows still missing one
//!
//! Rows are saved after the whole field has been worked through.

use crate::error::Result;
use crate::generate::Session;
use crate::report::FieldFix;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use relgen_core::{FieldDescriptor, Instance, InstanceId, ModelDescriptor, Schema, SchemaError, Value};
use relgen_store::Store;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Upper bound on links added per row and field.
pub const MAX_LINKS: usize = 5;

/// Result of the post-compute pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostcomputeOutcome {
    pub fixes: Vec<FieldFix>,
    /// Fields (`Model.field`) without any candidate value
    pub unresolved: Vec<String>,
}

/// Resolve the deferred `(model, field)` pairs against the full store.
pub fn postcompute<S: Store>(
    session: &mut Session<'_, S>,
    schema: &Schema,
    deferred: &[(String, String)],
) -> Result<PostcomputeOutcome> {
    let mut outcome = PostcomputeOutcome::default();
    let mut visited = HashSet::new();

    for (model_name, field_name) in deferred {
        if !visited.insert((model_name.as_str(), field_name.as_str())) {
            continue;
        }
        let model = schema.model(model_name)?;
        let field = model
            .get_field(field_name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                model: model_name.clone(),
                field: field_name.clone(),
            })?;

        let instances = session.store.instances(&model.name);
        let fix = if instances.is_empty() {
            // Rows were never composed when a required field had no values.
            if field.is_required() && !field.is_many_to_many() {
                None
            } else {
                debug!("No '{}' rows to fix for '{}'", model.name, field.name);
                continue;
            }
        } else if field.is_many_to_many() {
            link_many(session, model, field, instances)?
        } else {
            fill_singular(session, model, field, instances)?
        };

        match fix {
            Some(fix) => {
                debug!(
                    "Fixed {}.{}: {} rows updated, {} failed",
                    fix.model, fix.field, fix.updated, fix.failed
                );
                outcome.fixes.push(fix);
            }
            None => {
                warn!(
                    "Deferred field {}.{} has no candidate values",
                    model.name, field.name
                );
                outcome.unresolved.push(format!("{}.{}", model.name, field.name));
            }
        }
    }
    Ok(outcome)
}

fn link_many<S: Store>(
    session: &mut Session<'_, S>,
    model: &ModelDescriptor,
    field: &FieldDescriptor,
    mut instances: Vec<Instance>,
) -> Result<Option<FieldFix>> {
    let targets: Vec<InstanceId> = session
        .candidate_pool(model, field, instances.len())?
        .iter()
        .filter_map(Value::as_ref_id)
        .collect();
    if targets.is_empty() {
        return Ok(None);
    }

    let min_links = usize::from(field.is_required());
    let max_links = MAX_LINKS.min(targets.len());
    for instance in &mut instances {
        let count = session.rng.random_range(min_links..=max_links);
        let picked: Vec<InstanceId> = targets
            .choose_multiple(&mut session.rng, count)
            .copied()
            .collect();
        instance.link(field.name.clone(), picked);
    }

    save_all(session, model, field, &instances).map(Some)
}

fn fill_singular<S: Store>(
    session: &mut Session<'_, S>,
    model: &ModelDescriptor,
    field: &FieldDescriptor,
    instances: Vec<Instance>,
) -> Result<Option<FieldFix>> {
    let missing: Vec<Instance> = instances
        .into_iter()
        .filter(|i| i.get_field(&field.name).map_or(true, Value::is_null))
        .collect();
    if missing.is_empty() {
        return save_all(session, model, field, &[]).map(Some);
    }

    let mut pool = session.candidate_pool(model, field, missing.len())?;
    if pool.is_empty() {
        return Ok(None);
    }
    let values: Vec<Value> = if field.is_unique() {
        pool.shuffle(&mut session.rng);
        pool
    } else {
        (0..missing.len())
            .filter_map(|_| pool.choose(&mut session.rng).cloned())
            .collect()
    };

    let updated: Vec<Instance> = missing
        .into_iter()
        .zip(values)
        .map(|(mut instance, value)| {
            instance.set_field(field.name.clone(), value);
            instance
        })
        .collect();
    save_all(session, model, field, &updated).map(Some)
}

fn save_all<S: Store>(
    session: &mut Session<'_, S>,
    model: &ModelDescriptor,
    field: &FieldDescriptor,
    instances: &[Instance],
) -> Result<FieldFix> {
    let mut fix = FieldFix {
        model: model.name.clone(),
        field: field.name.clone(),
        updated: 0,
        failed: 0,
    };
    for instance in instances {
        match session.store.save(model, instance) {
            Ok(()) => fix.updated += 1,
            Err(e) if e.is_integrity() => {
                warn!("Could not save '{}' row {}: {}", model.name, instance.id, e);
                fix.failed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(fix)
}
