//! Core types for the relgen test-data generator.
//!
//! This crate provides the foundational types shared by the generator,
//! the synthesizers and the backing store:
//!
//! - [`FieldType`] - Primitive type tag of a non-relational field
//! - [`Validator`] - Predicates attached to fields (and the metadata the
//!   classifier reads from them)
//! - [`ModelDescriptor`] / [`FieldDescriptor`] - Read-only schema view
//! - [`Value`] / [`Instance`] - Generated values and persisted rows
//!
//! # Architecture
//!
//! ```text
//! relgen-core (this crate)
//!    │
//!    ├─── relgen-synth   (value synthesizers produce `Value`s)
//!    ├─── relgen-store   (persists `Instance`s, enforces integrity)
//!    └─── relgen         (classifier, pool builder, sorter, generator)
//! ```
//!
//! # Example
//!
//! ```rust
//! use relgen_core::{FieldDescriptor, FieldType, ModelDescriptor, RelationKind, Schema};
//!
//! let schema = Schema::new(vec![
//!     ModelDescriptor::new("Author", vec![FieldDescriptor::new("name", FieldType::char(40))]),
//!     ModelDescriptor::new(
//!         "Book",
//!         vec![FieldDescriptor::relation("author", "Author", RelationKind::ForeignKey)],
//!     ),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.dependencies("Book", false), vec!["Author"]);
//! ```

pub mod schema;
pub mod types;
pub mod validators;
pub mod values;

// Re-exports for convenience
pub use schema::{
    Cardinality, FieldDescriptor, GeneratorConfig, ModelConstraint, ModelDescriptor,
    RelationDescriptor, RelationKind, Schema, SchemaError,
};
pub use types::{FieldType, IpProtocol};
pub use validators::{validate_all, CustomValidator, Validator};
pub use values::{FieldValues, FilePayload, Instance, InstanceBuilder, InstanceId, Value};
