//! Backing store for the relgen test-data generator.
//!
//! The generator persists every composed row through the [`Store`] trait and
//! relies on the store to reject rows that violate nullability, uniqueness,
//! uniqueness-together, reference or model constraints. Rejections surface as
//! [`StoreError::Integrity`], which the generator treats as recoverable.
//!
//! [`MemoryStore`] keeps everything in process and is what the tests use.
//!
//! # Example
//!
//! ```rust
//! use relgen_core::{FieldDescriptor, FieldType, FieldValues, ModelDescriptor, Value};
//! use relgen_store::{MemoryStore, Store};
//!
//! let model = ModelDescriptor::new(
//!     "Tag",
//!     vec![FieldDescriptor::new("label", FieldType::char(20)).unique()],
//! );
//! let mut store = MemoryStore::new();
//!
//! let mut values = FieldValues::new();
//! values.insert("label".to_string(), Value::Text("rust".to_string()));
//! store.create(&model, values.clone()).unwrap();
//!
//! // Same label again violates uniqueness
//! assert!(store.create(&model, values).unwrap_err().is_integrity());
//! assert_eq!(store.count("Tag"), 1);
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::Store;
