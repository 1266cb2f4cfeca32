//! relgen
//!
//! Constrained random test data for relational models.
//!
//! Given a schema of models (typed fields, validators, uniqueness and
//! relations), relgen fills a backing store with rows that satisfy every
//! declared constraint.
//!
//! # Features
//!
//! - Dependency ordering: models are generated after the models their
//!   required relations point at; cycles abort the run up front
//! - Validator-aware value synthesis: emails, URLs, IPs, slugs, decimals,
//!   bounded integers, files, images, JSON and more
//! - Rejection sampling: candidate pools are deduplicated and validated
//!   before rows are composed
//! - Deferred fields: many-to-many links and relations to models generated
//!   later are resolved in a post-compute pass
//! - Per-field overrides: `samples`, declarative `generator` blocks, or
//!   closures registered on the [`GenerationConfig`]
//!
//! # Architecture
//!
//! ```text
//! Schema ─> graph (order) ─> generate (per model) ─> postcompute
//!                               │
//!                 classify ─> pool ─> relgen-synth
//!                               │
//!                          relgen-store (Store)
//! ```
//!
//! # Example
//!
//! ```rust
//! use relgen::{generate_test_data, GenerationConfig};
//! use relgen_core::Schema;
//! use relgen_store::{MemoryStore, Store};
//!
//! let schema = Schema::from_yaml(r#"
//! models:
//!   - name: Author
//!     fields:
//!       - name: email
//!         type: {type: email, max_length: 80}
//!         unique: true
//!   - name: Book
//!     fields:
//!       - name: title
//!         type: {type: char, max_length: 60}
//!       - name: author
//!         relation: {target: Author, kind: foreign_key}
//! "#).unwrap();
//!
//! let mut store = MemoryStore::new();
//! let config = GenerationConfig::new(5).with_seed(42);
//! let report = generate_test_data(&schema, &mut store, &config).unwrap();
//!
//! assert_eq!(report.order, vec!["Author", "Book"]);
//! assert_eq!(store.count("Book"), 5);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod graph;
pub mod phase;
pub mod pool;
pub mod postcompute;
pub mod report;
pub mod run;

// Re-exports for convenience
pub use classify::{classify, Classification, FieldConstraints};
pub use config::{FieldOverride, GenerationConfig};
pub use error::{GenerationError, Result};
pub use generate::{generate_models, ModelOutcome, Session, SkipReason, SkippedInstance};
pub use graph::{topological_sort, DependencyCycle};
pub use phase::{ModelPhase, RunPhase};
pub use pool::{build_pool, pool_target, CandidateSource, PoolStop, ValuePool};
pub use postcompute::{postcompute, PostcomputeOutcome};
pub use report::{FieldFix, GenerationReport, ModelReport};
pub use run::{generate_test_data, generate_test_data_with_context};
