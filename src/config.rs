//! Generation run configuration.
//!
//! # YAML Format
//!
//! ```yaml
//! size: 20            # rows per model
//! allow_null: true    # nullable fields may be left null
//! models: [Book]      # subset (dependencies are pulled in)
//! model_sizes:
//!   Author: 5
//! seed: 42
//! now: 2024-06-01T12:00:00Z
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use relgen_core::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default number of rows per model.
pub const DEFAULT_SIZE: usize = 10;

fn default_size() -> usize {
    DEFAULT_SIZE
}

/// Programmatic value generator for one field.
///
/// Called with the run's RNG and the number of values drawn so far.
#[derive(Clone)]
pub struct FieldOverride(Arc<dyn Fn(&mut StdRng, u64) -> Value + Send + Sync>);

impl FieldOverride {
    /// Wrap a closure.
    pub fn new(generate: impl Fn(&mut StdRng, u64) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(generate))
    }

    /// Draw one value.
    pub fn generate(&self, rng: &mut StdRng, index: u64) -> Value {
        (self.0)(rng, index)
    }
}

impl fmt::Debug for FieldOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldOverride(..)")
    }
}

/// Configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Rows to generate per model.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Allow nullable fields to take null.
    #[serde(default)]
    pub allow_null: bool,

    /// Models to generate (all models if not set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,

    /// Per-model row counts overriding `size`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_sizes: BTreeMap<String, usize>,

    /// Random seed (fresh entropy if not set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Reference time for temporal values (current time if not set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,

    /// Closure overrides keyed by (model, field).
    #[serde(skip)]
    overrides: BTreeMap<(String, String), FieldOverride>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl GenerationConfig {
    /// Create a configuration generating `size` rows per model.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            allow_null: false,
            models: None,
            model_sizes: BTreeMap::new(),
            seed: None,
            now: None,
            overrides: BTreeMap::new(),
        }
    }

    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Allow or forbid nulls in nullable fields.
    pub fn with_allow_null(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    /// Restrict generation to these models and their dependencies.
    pub fn with_models<S: Into<String>>(mut self, models: impl IntoIterator<Item = S>) -> Self {
        self.models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    /// Generate `size` rows of `model`.
    pub fn with_model_size(mut self, model: impl Into<String>, size: usize) -> Self {
        self.model_sizes.insert(model.into(), size);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pin the reference time.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Register a closure generating the values of `model.field`.
    pub fn with_override(
        mut self,
        model: impl Into<String>,
        field: impl Into<String>,
        generate: impl Fn(&mut StdRng, u64) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.overrides
            .insert((model.into(), field.into()), FieldOverride::new(generate));
        self
    }

    /// Rows to generate for `model`.
    pub fn size_for(&self, model: &str) -> usize {
        self.model_sizes.get(model).copied().unwrap_or(self.size)
    }

    /// Closure override registered for `model.field`.
    pub fn field_override(&self, model: &str, field: &str) -> Option<&FieldOverride> {
        self.overrides.get(&(model.to_string(), field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;

    #[test]
    fn test_config_from_yaml() {
        let config = GenerationConfig::from_yaml(
            r#"
size: 20
allow_null: true
models: [Book]
model_sizes:
  Author: 5
seed: 42
now: 2024-06-01T12:00:00Z
"#,
        )
        .unwrap();

        assert_eq!(config.size, 20);
        assert!(config.allow_null);
        assert_eq!(config.models, Some(vec!["Book".to_string()]));
        assert_eq!(config.size_for("Author"), 5);
        assert_eq!(config.size_for("Book"), 20);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.now,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = GenerationConfig::from_yaml("{}").unwrap();
        assert_eq!(config.size, DEFAULT_SIZE);
        assert!(!config.allow_null);
        assert!(config.models.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_builder_and_overrides() {
        let config = GenerationConfig::new(3)
            .with_seed(7)
            .with_models(["Book"])
            .with_model_size("Book", 9)
            .with_override("Book", "title", |_, index| {
                Value::Text(format!("title-{index}"))
            });

        assert_eq!(config.size_for("Book"), 9);
        assert_eq!(config.size_for("Author"), 3);
        assert!(config.field_override("Book", "isbn").is_none());

        let generate = config.field_override("Book", "title").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            generate.generate(&mut rng, 4),
            Value::Text("title-4".to_string())
        );
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "size: 3\nseed: 1\n").unwrap();

        let config = GenerationConfig::from_file(&path).unwrap();
        assert_eq!(config.size, 3);
        assert_eq!(config.seed, Some(1));

        assert!(GenerationConfig::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
