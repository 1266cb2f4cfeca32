//! Rejection-sampling value pools.
//!
//! A pool is the batch of distinct, valid candidate values for one field,
//! built before any row of the model is composed. Candidates are drawn one
//! at a time and rejected when they are null, fail a validator, or repeat a
//! value already pooled. Drawing stops when the pool is full, after
//! [`MAX_CONSECUTIVE_FAILURES`] rejections in a row, after
//! `DRAW_CAP_FACTOR * target` draws, or when a finite source runs dry.

use crate::error::{GenerationError, Result};
use rand::rngs::StdRng;
use relgen_core::{validate_all, FieldDescriptor, Value};
use relgen_synth::SynthError;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Rejections in a row after which drawing stops.
pub const MAX_CONSECUTIVE_FAILURES: usize = 50;

/// Draw budget as a multiple of the target size.
pub const DRAW_CAP_FACTOR: usize = 10;

/// Where candidate values come from.
pub enum CandidateSource<'a> {
    /// Externally supplied values, consumed in order
    Finite(std::vec::IntoIter<Value>),
    /// Repeated calls to a synthesizer
    Unbounded(Box<dyn FnMut(&mut StdRng) -> std::result::Result<Value, SynthError> + 'a>),
}

impl<'a> CandidateSource<'a> {
    pub fn finite(values: Vec<Value>) -> Self {
        Self::Finite(values.into_iter())
    }

    pub fn unbounded(
        draw: impl FnMut(&mut StdRng) -> std::result::Result<Value, SynthError> + 'a,
    ) -> Self {
        Self::Unbounded(Box::new(draw))
    }

    /// Next candidate, or `None` once a finite source is exhausted.
    pub fn next_candidate(
        &mut self,
        rng: &mut StdRng,
    ) -> std::result::Result<Option<Value>, SynthError> {
        match self {
            Self::Finite(values) => Ok(values.next()),
            Self::Unbounded(draw) => draw(rng).map(Some),
        }
    }
}

impl fmt::Debug for CandidateSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(values) => write!(f, "Finite({} left)", values.len()),
            Self::Unbounded(_) => f.write_str("Unbounded(..)"),
        }
    }
}

/// Why drawing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStop {
    Filled,
    FailureCap,
    DrawCap,
    Exhausted,
}

impl PoolStop {
    pub fn as_str(&self) -> &str {
        match self {
            PoolStop::Filled => "filled",
            PoolStop::FailureCap => "failure_cap",
            PoolStop::DrawCap => "draw_cap",
            PoolStop::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for PoolStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted candidates for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuePool {
    pub values: Vec<Value>,
    pub draws: usize,
    pub stop: PoolStop,
}

impl ValuePool {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Pool size for `size` rows of a field named in `unique_together` tuples.
///
/// Each tuple naming the field inflates the pool so that enough distinct
/// combinations exist downstream.
pub fn pool_target(size: usize, unique_together: usize) -> usize {
    let factor = ((1000 * unique_together) as f64).sqrt().floor() as usize + 1;
    size.saturating_mul(factor)
}

/// Draw candidates for `field` until `target` values are pooled.
///
/// A unique field that hits the failure cap is a [`GenerationError::SparseGenerator`].
/// Any other early stop returns the partial pool.
pub fn build_pool(
    model: &str,
    field: &FieldDescriptor,
    mut source: CandidateSource<'_>,
    target: usize,
    rng: &mut StdRng,
) -> Result<ValuePool> {
    let draw_cap = target.saturating_mul(DRAW_CAP_FACTOR);
    let mut values = Vec::new();
    let mut seen = HashSet::new();
    let mut failures = 0;
    let mut draws = 0;

    let stop = loop {
        if values.len() >= target {
            break PoolStop::Filled;
        }
        if failures >= MAX_CONSECUTIVE_FAILURES {
            break PoolStop::FailureCap;
        }
        if draws >= draw_cap {
            break PoolStop::DrawCap;
        }
        draws += 1;

        let candidate = source
            .next_candidate(rng)
            .map_err(|e| GenerationError::from_synth(model, &field.name, e))?;
        let Some(candidate) = candidate else {
            break PoolStop::Exhausted;
        };

        let accepted = !candidate.is_null()
            && validate_all(&field.validators, &candidate)
            && (candidate.is_structured() || seen.insert(candidate.clone()));
        if accepted {
            values.push(candidate);
            failures = 0;
        } else {
            failures += 1;
        }
    };

    debug!(
        "Pool for {}.{}: {}/{} values after {} draws ({})",
        model,
        field.name,
        values.len(),
        target,
        draws,
        stop
    );

    if stop == PoolStop::FailureCap && field.is_unique() {
        return Err(GenerationError::SparseGenerator {
            model: model.to_string(),
            field: field.name.clone(),
            found: values.len(),
            needed: target,
        });
    }

    Ok(ValuePool {
        values,
        draws,
        stop,
    })
}
