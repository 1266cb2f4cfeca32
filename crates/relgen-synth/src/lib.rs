//! Random value synthesizers for the relgen test-data generator.
//!
//! Every synthesizer is a function of its bounds, a shared read-only
//! [`SynthContext`] (word dictionary and reference time) and a caller-owned
//! RNG. Seeding the RNG makes the output reproducible.
//!
//! # Architecture
//!
//! ```text
//! FieldDescriptor ──classifier──▶ Synthesizer ─┐
//!                                              ├─▶ Value
//! GeneratorConfig ────────▶ OverrideGenerator ─┘
//!                                ▲
//!                   SynthContext + StdRng
//! ```
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use relgen_synth::{Dictionary, SynthContext, Synthesizer};
//!
//! let ctx = SynthContext::with_dictionary(Dictionary::builtin());
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let email = Synthesizer::Email {
//!     min_length: 14,
//!     max_length: 40,
//!     allowlist: vec![],
//! };
//! let value = email.synthesize(&ctx, &mut rng).unwrap();
//! assert!(value.as_str().unwrap().contains('@'));
//! ```
//!
//! # Generators
//!
//! Declarative overrides support:
//!
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`, `{word}`)
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `timestamp_range` - Random timestamps in a range
//! - `weighted_bool` - Booleans with a configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Fixed value

pub mod context;
pub mod error;
pub mod generators;
pub mod words;

pub use context::SynthContext;
pub use error::{Result, SynthError};
pub use generators::numeric::IntegerBounds;
pub use generators::text::CharClasses;
pub use generators::{OverrideGenerator, Synthesizer};
pub use words::Dictionary;
