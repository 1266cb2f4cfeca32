//! Top-level generation entry point.

use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::generate::{generate_models, Session};
use crate::graph::topological_sort;
use crate::phase::{ModelPhase, RunPhase};
use crate::postcompute::postcompute;
use crate::report::{GenerationReport, ModelReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use relgen_core::Schema;
use relgen_store::Store;
use relgen_synth::SynthContext;
use tracing::{debug, info, warn};

/// Populate `store` with random rows for the models of `schema`.
///
/// Builds a fresh [`SynthContext`] (system dictionary, `config.now` or the
/// current time) and runs [`generate_test_data_with_context`].
pub fn generate_test_data<S: Store>(
    schema: &Schema,
    store: &mut S,
    config: &GenerationConfig,
) -> Result<GenerationReport> {
    let mut ctx = SynthContext::new();
    if let Some(now) = config.now {
        ctx = ctx.with_now(now);
    }
    generate_test_data_with_context(schema, store, config, &ctx)
}

/// Populate `store` using the given synthesizer resources.
///
/// Models are generated in dependency order, then deferred fields are
/// resolved against the complete store. A dependency cycle among required
/// relations aborts the run before any row is created.
pub fn generate_test_data_with_context<S: Store>(
    schema: &Schema,
    store: &mut S,
    config: &GenerationConfig,
    ctx: &SynthContext,
) -> Result<GenerationReport> {
    let selected: Vec<String> = match &config.models {
        Some(subset) => {
            if let Some(unknown) = subset.iter().find(|name| schema.get_model(name).is_none()) {
                return Err(GenerationError::UnknownModel(unknown.clone()));
            }
            schema.with_dependencies(subset)?
        }
        None => schema.model_names().into_iter().map(String::from).collect(),
    };
    info!(
        "Starting test data generation for {} models ({} rows each)",
        selected.len(),
        config.size
    );

    let mut report = GenerationReport::new();
    debug!("Run phase: {}", report.phase);

    let order = match topological_sort(&selected, |name| {
        schema
            .dependencies(name, false)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    }) {
        Ok(order) => order,
        Err(cycle) => {
            report.phase = RunPhase::CycleDetected;
            warn!("Run phase: {}: {}", report.phase, cycle);
            return Err(GenerationError::CyclicDependency { cycle: cycle.nodes });
        }
    };
    report.order = order;
    report.phase = RunPhase::OrderEstablished;
    info!("Generation order: {}", report.order.join(" -> "));

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut session = Session::new(ctx, config, store, rng);

    report.phase = RunPhase::PerModelPass;
    debug!("Run phase: {}", report.phase);
    let mut deferred = Vec::new();
    for name in &report.order {
        let model = schema.model(name)?;
        let size = config.size_for(name);
        let outcome = generate_models(&mut session, model, size)?;
        info!(
            "Generated {}/{} '{}' rows ({} skipped, {} deferred fields)",
            outcome.created.len(),
            size,
            name,
            outcome.skipped.len(),
            outcome.deferred.len()
        );
        deferred.extend(
            outcome
                .deferred
                .iter()
                .map(|field| (name.clone(), field.clone())),
        );
        report.models.push(ModelReport::from(&outcome));
    }

    report.phase = RunPhase::PostcomputePass;
    debug!(
        "Run phase: {} ({} deferred fields)",
        report.phase,
        deferred.len()
    );
    let fixed = postcompute(&mut session, schema, &deferred)?;
    for model in &mut report.models {
        let pending = fixed
            .unresolved
            .iter()
            .any(|field| field.split_once('.').is_some_and(|(m, _)| m == model.model));
        if model.phase == ModelPhase::DeferredPending && !pending {
            model.phase = ModelPhase::Done;
        }
    }
    report.fixes = fixed.fixes;
    report.unresolved = fixed.unresolved;

    report.phase = RunPhase::Done;
    info!(
        "Test data generation completed: {} rows created, {} skipped, {} updated",
        report.total_created(),
        report.total_skipped(),
        report.total_updated()
    );
    Ok(report)
}
