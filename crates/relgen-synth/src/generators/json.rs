//! Random JSON documents.

use crate::context::SynthContext;
use crate::error::Result;
use crate::generators::numeric::{generate_integer, IntegerBounds};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{Map, Value as JsonValue};

/// Nesting depth of generated documents.
pub const DEFAULT_JSON_DEPTH: usize = 2;

const CHILDREN_PER_CONTAINER: usize = 4;
const WORD_LENGTHS: [usize; 4] = [3, 4, 5, 7];

/// Generate a nested JSON value.
///
/// At each level the value is a leaf with probability `1 - 1/(1 + depth)`,
/// so shallow levels favor containers. Leaves are small integers, booleans,
/// null or lowercase words; containers are lists or objects of four children.
pub fn generate_json<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    depth: usize,
) -> Result<JsonValue> {
    let leaf_probability = 1.0 - 1.0 / (1.0 + depth as f64);
    if depth == 0 || rng.random::<f64>() < leaf_probability {
        return generate_leaf(ctx, rng);
    }

    if rng.random_bool(0.5) {
        let items = (0..CHILDREN_PER_CONTAINER)
            .map(|_| generate_json(ctx, rng, depth - 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(JsonValue::Array(items))
    } else {
        let mut map = Map::new();
        for _ in 0..CHILDREN_PER_CONTAINER {
            let key = random_word(ctx, rng);
            map.insert(key, generate_json(ctx, rng, depth - 1)?);
        }
        Ok(JsonValue::Object(map))
    }
}

fn generate_leaf<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> Result<JsonValue> {
    Ok(match rng.random_range(0..18) {
        0..=2 => JsonValue::from(generate_integer(rng, IntegerBounds::new(16, true))?),
        3 => JsonValue::Bool(true),
        4 => JsonValue::Bool(false),
        5 => JsonValue::Null,
        _ => JsonValue::String(random_word(ctx, rng)),
    })
}

fn random_word<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> String {
    let length = WORD_LENGTHS.choose(rng).copied().unwrap_or(5);
    ctx.dictionary().word(rng, length).to_lowercase()
}
