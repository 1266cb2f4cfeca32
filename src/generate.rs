//! Per-model instance generation.
//!
//! For one model the generator builds a value column per field, then
//! composes rows index by index and hands each to the store:
//!
//! ```text
//! field ──┬─ many-to-many ────────────────> deferred
//!         ├─ to-one relation ─ target rows ─> column (or deferred if none)
//!         └─ scalar ─ value source ─ pool ──> column (or deferred if empty)
//! ```
//!
//! A scalar field's value source is, in priority order: a closure override
//! registered in the config, the field's `samples`, its `generator` block,
//! and finally the synthesizer picked by the classifier.

use crate::classify::classify;
use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::phase::ModelPhase;
use crate::pool::{build_pool, pool_target, CandidateSource};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use relgen_core::{FieldDescriptor, FieldValues, Instance, ModelDescriptor, Value};
use relgen_store::Store;
use relgen_synth::generators::static_value::yaml_to_value;
use relgen_synth::{OverrideGenerator, SynthContext};
use std::fmt;
use tracing::{debug, warn};

/// State shared by every step of one generation run.
pub struct Session<'a, S: Store> {
    pub(crate) ctx: &'a SynthContext,
    pub(crate) config: &'a GenerationConfig,
    pub(crate) store: &'a mut S,
    pub(crate) rng: StdRng,
}

impl<'a, S: Store> Session<'a, S> {
    pub fn new(
        ctx: &'a SynthContext,
        config: &'a GenerationConfig,
        store: &'a mut S,
        rng: StdRng,
    ) -> Self {
        Self {
            ctx,
            config,
            store,
            rng,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Candidate values for `field` when `size` rows need one.
    ///
    /// Relational fields take references to every stored row of the target
    /// model. Other fields go through the pool builder.
    pub(crate) fn candidate_pool(
        &mut self,
        model: &ModelDescriptor,
        field: &FieldDescriptor,
        size: usize,
    ) -> Result<Vec<Value>> {
        if let Some(target) = field.related_model() {
            return Ok(self
                .store
                .instances(target)
                .iter()
                .map(Instance::as_ref_value)
                .collect());
        }

        let source = value_source(self.ctx, self.config, &model.name, field, &mut self.rng)?;
        let target = pool_target(size, model.unique_together_count(&field.name));
        let pool = build_pool(&model.name, field, source, target, &mut self.rng)?;
        Ok(pool.values)
    }
}

fn value_source<'a>(
    ctx: &'a SynthContext,
    config: &GenerationConfig,
    model: &str,
    field: &FieldDescriptor,
    rng: &mut StdRng,
) -> Result<CandidateSource<'a>> {
    if let Some(generate) = config.field_override(model, &field.name) {
        let generate = generate.clone();
        let mut index = 0;
        return Ok(CandidateSource::unbounded(move |rng| {
            let value = generate.generate(rng, index);
            index += 1;
            Ok(value)
        }));
    }

    let field_type = field.field_type.as_ref();
    match (&field.samples, &field.generator) {
        (Some(_), Some(_)) => Err(GenerationError::invalid_generator(
            model,
            &field.name,
            "samples and generator cannot both be set",
        )),
        (Some(samples), None) => Ok(CandidateSource::finite(
            samples
                .iter()
                .map(|sample| yaml_to_value(sample, field_type))
                .collect(),
        )),
        (None, Some(generator)) => {
            let mut generator = OverrideGenerator::from_config(generator, field_type)
                .map_err(|e| GenerationError::from_synth(model, &field.name, e))?;
            if !generator.is_unbounded() {
                return Ok(CandidateSource::finite(vec![generator.next_value(ctx, rng)]));
            }
            Ok(CandidateSource::unbounded(move |rng| {
                Ok(generator.next_value(ctx, rng))
            }))
        }
        (None, None) => {
            let classification =
                classify(field).ok_or_else(|| GenerationError::InconsistentDefinition {
                    model: model.to_string(),
                    field: field.name.clone(),
                    reason: "field has neither a type nor a relation".to_string(),
                })?;
            debug!(
                "Field {}.{} classified as '{}' ({})",
                model,
                field.name,
                classification.rule,
                classification.synthesizer.name()
            );
            let synthesizer = classification.synthesizer;
            Ok(CandidateSource::unbounded(move |rng| {
                synthesizer.synthesize(ctx, rng)
            }))
        }
    }
}

/// Why a composed row was not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A model constraint rejected the row before it reached the store.
    Constraint(String),
    /// The store rejected the row.
    Integrity(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Constraint(name) => write!(f, "constraint '{name}' failed"),
            SkipReason::Integrity(reason) => write!(f, "{reason}"),
        }
    }
}

/// A composed row that was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstance {
    pub values: FieldValues,
    pub reason: SkipReason,
}

/// Result of generating the rows of one model.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub model: String,
    pub requested: usize,
    pub created: Vec<Instance>,
    pub skipped: Vec<SkippedInstance>,
    /// Fields left for the post-compute pass, in declaration order
    pub deferred: Vec<String>,
    pub phase: ModelPhase,
}

impl ModelOutcome {
    fn new(model: &str, requested: usize) -> Self {
        Self {
            model: model.to_string(),
            requested,
            created: Vec::new(),
            skipped: Vec::new(),
            deferred: Vec::new(),
            phase: ModelPhase::Unstarted,
        }
    }

    fn advance(&mut self, phase: ModelPhase) {
        debug!("Model '{}': {} -> {}", self.model, self.phase, phase);
        self.phase = phase;
    }
}

/// Generate and persist `size` rows of `model`.
///
/// Rows the store rejects are reported as skipped; the rest of the batch
/// carries on. Fields that cannot be filled yet are reported as deferred.
/// When a deferred field is required, no row can be composed and none is
/// attempted.
pub fn generate_models<S: Store>(
    session: &mut Session<'_, S>,
    model: &ModelDescriptor,
    size: usize,
) -> Result<ModelOutcome> {
    let mut outcome = ModelOutcome::new(&model.name, size);
    if size == 0 {
        outcome.advance(ModelPhase::Done);
        return Ok(outcome);
    }
    let mut blocked_by = None;
    let mut pools: Vec<(&FieldDescriptor, Vec<Value>)> = Vec::new();

    let allow_null = session.config.allow_null;
    for field in model.generated_fields() {
        if field.is_many_to_many() {
            outcome.deferred.push(field.name.clone());
            continue;
        }

        let mut pool = session.candidate_pool(model, field, size)?;
        let null_allowed = allow_null && field.nullable;
        if pool.is_empty() && (field.relation.is_some() || !null_allowed) {
            debug!(
                "Deferring {}.{}: no candidate values yet",
                model.name, field.name
            );
            if field.is_required() && blocked_by.is_none() {
                blocked_by = Some(field.name.clone());
            }
            outcome.deferred.push(field.name.clone());
            continue;
        }
        if null_allowed {
            pool.push(Value::Null);
        }
        pools.push((field, pool));
    }
    outcome.advance(ModelPhase::FieldsClassified);

    if let Some(field) = blocked_by {
        warn!(
            "No '{}' rows generated: required field '{}' has no candidate values",
            model.name, field
        );
        outcome.advance(ModelPhase::DeferredPending);
        return Ok(outcome);
    }

    let mut columns: Vec<(&str, Vec<Value>)> = Vec::with_capacity(pools.len());
    for (field, mut pool) in pools {
        let column = if field.is_unique() {
            pool.shuffle(&mut session.rng);
            if pool.len() < size {
                if field.relation.is_none() {
                    return Err(GenerationError::SparseGenerator {
                        model: model.name.clone(),
                        field: field.name.clone(),
                        found: pool.len(),
                        needed: size,
                    });
                }
                // Rows past the last target get a null the store may reject.
                pool.resize(size, Value::Null);
            }
            pool.truncate(size);
            pool
        } else {
            (0..size)
                .filter_map(|_| pool.choose(&mut session.rng).cloned())
                .collect()
        };
        columns.push((field.name.as_str(), column));
    }
    outcome.advance(ModelPhase::PoolsBuilt);

    for row in 0..size {
        let values: FieldValues = columns
            .iter()
            .filter_map(|(name, column)| Some((name.to_string(), column.get(row)?.clone())))
            .collect();

        if let Some(constraint) = model.constraints.iter().find(|c| !c.check(&values)) {
            debug!(
                "Skipping '{}' row {}: constraint '{}' failed",
                model.name, row, constraint.name
            );
            outcome.skipped.push(SkippedInstance {
                values,
                reason: SkipReason::Constraint(constraint.name.clone()),
            });
            continue;
        }

        match session.store.create(model, values.clone()) {
            Ok(instance) => outcome.created.push(instance),
            Err(e) if e.is_integrity() => {
                warn!("Skipping '{}' row {}: {}", model.name, row, e);
                outcome.skipped.push(SkippedInstance {
                    values,
                    reason: SkipReason::Integrity(e.to_string()),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
    outcome.advance(ModelPhase::InstancesPersisted);

    if outcome.deferred.is_empty() {
        outcome.advance(ModelPhase::Done);
    } else {
        outcome.advance(ModelPhase::DeferredPending);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use relgen_core::{FieldType, GeneratorConfig, ModelConstraint, RelationKind, Validator};
    use relgen_store::MemoryStore;
    use relgen_synth::Dictionary;
    use std::collections::HashSet;

    fn context() -> SynthContext {
        SynthContext::with_dictionary(Dictionary::builtin())
    }

    fn run(
        model: &ModelDescriptor,
        store: &mut MemoryStore,
        config: &GenerationConfig,
        size: usize,
    ) -> Result<ModelOutcome> {
        let ctx = context();
        let mut session = Session::new(&ctx, config, store, StdRng::seed_from_u64(42));
        generate_models(&mut session, model, size)
    }

    #[test]
    fn test_scalar_fields_are_generated() {
        let model = ModelDescriptor::new(
            "Person",
            vec![
                FieldDescriptor::new("name", FieldType::char(30)),
                FieldDescriptor::new("age", FieldType::PositiveSmallInteger)
                    .with_validator(Validator::MaxValue { limit: 120 }),
                FieldDescriptor::new("email", FieldType::Email { max_length: 80 }).unique(),
            ],
        );
        let mut store = MemoryStore::new();

        let outcome = run(&model, &mut store, &GenerationConfig::default(), 20).unwrap();
        assert_eq!(outcome.created.len(), 20);
        assert!(outcome.skipped.is_empty());
        assert!(outcome.deferred.is_empty());
        assert_eq!(outcome.phase, ModelPhase::Done);

        let emails: HashSet<String> = outcome
            .created
            .iter()
            .filter_map(|i| i.get_field("email")?.as_str().map(String::from))
            .collect();
        assert_eq!(emails.len(), 20);
        assert!(outcome
            .created
            .iter()
            .all(|i| i.get_field("age").and_then(Value::as_i64).is_some_and(|a| (0..=120).contains(&a))));
    }

    #[test]
    fn test_required_relation_without_targets_is_deferred() {
        let model = ModelDescriptor::new(
            "Profile",
            vec![
                FieldDescriptor::new("bio", FieldType::text(Some(200))),
                FieldDescriptor::relation("user", "User", RelationKind::OneToOne),
            ],
        );
        let mut store = MemoryStore::new();

        let outcome = run(&model, &mut store, &GenerationConfig::default(), 5).unwrap();
        assert!(outcome.created.is_empty());
        assert_eq!(outcome.deferred, vec!["user".to_string()]);
        assert_eq!(outcome.phase, ModelPhase::DeferredPending);
        assert_eq!(store.count("Profile"), 0);
    }

    #[test]
    fn test_many_to_many_is_always_deferred() {
        let tag = ModelDescriptor::new("Tag", vec![FieldDescriptor::new("label", FieldType::char(20))]);
        let post = ModelDescriptor::new(
            "Post",
            vec![
                FieldDescriptor::new("title", FieldType::char(40)),
                FieldDescriptor::relation("tags", "Tag", RelationKind::ManyToMany),
            ],
        );
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default();
        run(&tag, &mut store, &config, 3).unwrap();

        let outcome = run(&post, &mut store, &config, 4).unwrap();
        assert_eq!(outcome.created.len(), 4);
        assert_eq!(outcome.deferred, vec!["tags".to_string()]);
        assert_eq!(outcome.phase, ModelPhase::DeferredPending);
    }

    #[test]
    fn test_foreign_keys_reference_existing_rows() {
        let author = ModelDescriptor::new("Author", vec![FieldDescriptor::new("name", FieldType::char(20))]);
        let book = ModelDescriptor::new(
            "Book",
            vec![FieldDescriptor::relation("author", "Author", RelationKind::ForeignKey)],
        );
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default();
        let authors = run(&author, &mut store, &config, 3).unwrap();
        let ids: HashSet<_> = authors.created.iter().map(|a| a.id).collect();

        let books = run(&book, &mut store, &config, 10).unwrap();
        assert_eq!(books.created.len(), 10);
        for book in &books.created {
            let id = book.get_field("author").and_then(Value::as_ref_id).unwrap();
            assert!(ids.contains(&id));
        }
    }

    #[test]
    fn test_unique_relation_beyond_targets_is_skipped() {
        let user = ModelDescriptor::new("User", vec![FieldDescriptor::new("name", FieldType::char(20))]);
        let profile = ModelDescriptor::new(
            "Profile",
            vec![FieldDescriptor::relation("user", "User", RelationKind::OneToOne)],
        );
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default();
        run(&user, &mut store, &config, 3).unwrap();

        let outcome = run(&profile, &mut store, &config, 5).unwrap();
        assert_eq!(outcome.created.len(), 3);
        assert_eq!(outcome.skipped.len(), 2);
        assert!(outcome
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::Integrity(_))));
    }

    #[test]
    fn test_allow_null_fills_nullable_fields() {
        let model = ModelDescriptor::new(
            "Note",
            vec![FieldDescriptor::new("flag", FieldType::Boolean).nullable()],
        );
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default().with_allow_null(true);

        let outcome = run(&model, &mut store, &config, 60).unwrap();
        assert_eq!(outcome.created.len(), 60);
        let seen: HashSet<Value> = outcome
            .created
            .iter()
            .filter_map(|i| i.get_field("flag").cloned())
            .collect();
        assert!(seen.contains(&Value::Null));
    }

    #[test]
    fn test_sparse_unique_field_is_an_error() {
        let model = ModelDescriptor::new(
            "Color",
            vec![FieldDescriptor::new("name", FieldType::char(10))
                .unique()
                .with_samples(vec!["red".into(), "green".into(), "blue".into()])],
        );
        let mut store = MemoryStore::new();

        let err = run(&model, &mut store, &GenerationConfig::default(), 5).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SparseGenerator { found: 3, needed: 5, .. }
        ));
        assert_eq!(store.count("Color"), 0);
    }

    #[test]
    fn test_samples_and_generator_sources() {
        let model = ModelDescriptor::new(
            "Ticket",
            vec![
                FieldDescriptor::new("number", FieldType::Integer)
                    .unique()
                    .with_generator(GeneratorConfig::Sequential { start: 100 }),
                FieldDescriptor::new("status", FieldType::char(10))
                    .with_samples(vec!["open".into(), "closed".into()]),
                FieldDescriptor::new("kind", FieldType::char(10)).with_generator(
                    GeneratorConfig::Static {
                        value: "bug".into(),
                    },
                ),
            ],
        );
        let mut store = MemoryStore::new();

        let outcome = run(&model, &mut store, &GenerationConfig::default(), 6).unwrap();
        assert_eq!(outcome.created.len(), 6);

        let mut numbers: Vec<i64> = outcome
            .created
            .iter()
            .filter_map(|i| i.get_field("number")?.as_i64())
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![100, 101, 102, 103, 104, 105]);

        for instance in &outcome.created {
            let status = instance.get_field("status").and_then(Value::as_str).unwrap();
            assert!(status == "open" || status == "closed");
            assert_eq!(instance.get_field("kind"), Some(&Value::Text("bug".to_string())));
        }
    }

    #[test]
    fn test_closure_override_wins() {
        let model = ModelDescriptor::new(
            "Sku",
            vec![FieldDescriptor::new("code", FieldType::char(12))
                .unique()
                .with_samples(vec!["ignored".into()])],
        );
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default()
            .with_override("Sku", "code", |_, index| Value::Text(format!("SKU-{index:04}")));

        let outcome = run(&model, &mut store, &config, 4).unwrap();
        let mut codes: Vec<&str> = outcome
            .created
            .iter()
            .filter_map(|i| i.get_field("code")?.as_str())
            .collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["SKU-0000", "SKU-0001", "SKU-0002", "SKU-0003"]);
    }

    #[test]
    fn test_samples_with_generator_is_invalid() {
        let model = ModelDescriptor::new(
            "Ticket",
            vec![FieldDescriptor::new("number", FieldType::Integer)
                .with_samples(vec!["1".into()])
                .with_generator(GeneratorConfig::UuidV4)],
        );
        let mut store = MemoryStore::new();

        let err = run(&model, &mut store, &GenerationConfig::default(), 2).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidGenerator { .. }));
    }

    #[test]
    fn test_constraint_failures_are_skipped() {
        let model = ModelDescriptor::new(
            "Range",
            vec![
                FieldDescriptor::new("low", FieldType::SmallInteger),
                FieldDescriptor::new("high", FieldType::SmallInteger),
            ],
        )
        .with_constraint(ModelConstraint::new("low_below_high", |values| {
            let low = values.get("low").and_then(Value::as_i64);
            let high = values.get("high").and_then(Value::as_i64);
            matches!((low, high), (Some(l), Some(h)) if l < h)
        }));
        let mut store = MemoryStore::new();

        let outcome = run(&model, &mut store, &GenerationConfig::default(), 40).unwrap();
        assert_eq!(outcome.created.len() + outcome.skipped.len(), 40);
        assert!(!outcome.skipped.is_empty());
        for skipped in &outcome.skipped {
            assert_eq!(
                skipped.reason,
                SkipReason::Constraint("low_below_high".to_string())
            );
        }
        for instance in &outcome.created {
            let low = instance.get_field("low").and_then(Value::as_i64).unwrap();
            let high = instance.get_field("high").and_then(Value::as_i64).unwrap();
            assert!(low < high);
        }
    }
}
