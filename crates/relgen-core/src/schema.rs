//! Model and field descriptors.
//!
//! This module defines the read-only view of a relational schema that the
//! generator works from.
//!
//! ## Type Hierarchy
//!
//! - `FieldDescriptor` - Single field: either a primitive `FieldType` or a
//!   `RelationDescriptor`, plus nullability, uniqueness and validators
//! - `ModelDescriptor` - Named model with ordered fields, uniqueness-together
//!   tuples and custom constraint predicates
//! - `Schema` - Collection of models, loaded from YAML
//!
//! ## YAML Format
//!
//! ```yaml
//! models:
//!   - name: Author
//!     fields:
//!       - name: email
//!         type: email
//!         unique: true
//!   - name: Book
//!     unique_together: [[title, author]]
//!     fields:
//!       - name: title
//!         type: {type: char, max_length: 80}
//!       - name: author
//!         relation: {target: Author, kind: foreign_key}
//! ```

use crate::types::FieldType;
use crate::validators::Validator;
use crate::values::FieldValues;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Model not found in schema
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Two models share a name
    #[error("Model declared twice: {0}")]
    DuplicateModel(String),

    /// Field not found in model
    #[error("Field '{field}' not found in model '{model}'")]
    FieldNotFound { model: String, field: String },

    /// A field must carry exactly one of a type and a relation
    #[error("Field '{model}.{field}' must declare exactly one of `type` and `relation`")]
    AmbiguousField { model: String, field: String },

    /// Relation pointing at an undeclared model
    #[error("Field '{model}.{field}' relates to unknown model '{target}'")]
    UnknownRelationTarget {
        model: String,
        field: String,
        target: String,
    },

    /// Regex validator that does not compile
    #[error("Field '{model}.{field}' has an invalid regex validator: {source}")]
    InvalidRegex {
        model: String,
        field: String,
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// Generator Overrides
// ============================================================================

/// Declarative value generator overriding the classified synthesizer.
///
/// This enum defines the value generators a field can pin in the schema
/// instead of relying on its type and validators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N}, {word})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339)
        start: String,
        /// End timestamp (RFC 3339)
        end: String,
    },

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },
}

impl GeneratorConfig {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UuidV4 => "uuid_v4",
            Self::Sequential { .. } => "sequential",
            Self::Pattern { .. } => "pattern",
            Self::IntRange { .. } => "int_range",
            Self::FloatRange { .. } => "float_range",
            Self::TimestampRange { .. } => "timestamp_range",
            Self::WeightedBool { .. } => "weighted_bool",
            Self::OneOf { .. } => "one_of",
            Self::Static { .. } => "static",
        }
    }
}

// ============================================================================
// Relations
// ============================================================================

/// Kind of relation a field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Many rows may point at the same target row
    ForeignKey,
    /// At most one row points at each target row
    OneToOne,
    /// Arbitrary links in both directions, stored outside the row
    ManyToMany,
}

/// Relation between a field and a target model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Related model name
    pub target: String,

    /// Relation kind
    pub kind: RelationKind,

    /// Auto-generated back-reference (never generated)
    #[serde(default)]
    pub reverse: bool,
}

impl RelationDescriptor {
    /// Create a forward relation.
    pub fn new(target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            target: target.into(),
            kind,
            reverse: false,
        }
    }
}

/// Cardinality of a relational field as seen by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Non-nullable to-one relation (a hard ordering dependency)
    ToOneRequired,
    /// Nullable to-one relation
    ToOneOptional,
    /// Many-to-many relation (symmetric, never an ordering dependency)
    ToMany,
}

// ============================================================================
// Fields
// ============================================================================

/// Field descriptor.
///
/// Exactly one of `field_type` and `relation` is set; `Schema::from_yaml`
/// rejects anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Primitive type of a non-relational field
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Relation of a relational field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationDescriptor>,

    /// Whether this field accepts null
    #[serde(default)]
    pub nullable: bool,

    /// Whether values must be distinct across rows
    #[serde(default)]
    pub unique: bool,

    /// Whether this field is the primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Filled in by the backing store (never generated)
    #[serde(default)]
    pub auto: bool,

    /// Validators applied to every candidate value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,

    /// Finite list of sample values used instead of synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<serde_yaml::Value>>,

    /// Declarative generator used instead of synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
}

impl FieldDescriptor {
    /// Create a non-relational field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type),
            relation: None,
            nullable: false,
            unique: false,
            primary_key: false,
            auto: false,
            validators: Vec::new(),
            samples: None,
            generator: None,
        }
    }

    /// Create a relational field.
    pub fn relation(name: impl Into<String>, target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            relation: Some(RelationDescriptor::new(target, kind)),
            nullable: false,
            unique: false,
            primary_key: false,
            auto: false,
            validators: Vec::new(),
            samples: None,
            generator: None,
        }
    }

    /// Mark the field nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Attach a validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Pin a declarative generator.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Use a finite list of sample values.
    pub fn with_samples(mut self, samples: Vec<serde_yaml::Value>) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Unique, primary key, or one-to-one relation.
    pub fn is_unique(&self) -> bool {
        self.unique
            || self.primary_key
            || matches!(&self.relation, Some(r) if r.kind == RelationKind::OneToOne)
    }

    /// Non-nullable.
    pub fn is_required(&self) -> bool {
        !self.nullable
    }

    /// Relation target model, if relational.
    pub fn related_model(&self) -> Option<&str> {
        self.relation.as_ref().map(|r| r.target.as_str())
    }

    /// Cardinality of a relational field.
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.relation.as_ref().map(|r| match r.kind {
            RelationKind::ManyToMany => Cardinality::ToMany,
            _ if self.nullable => Cardinality::ToOneOptional,
            _ => Cardinality::ToOneRequired,
        })
    }

    /// Check if this field is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality() == Some(Cardinality::ToMany)
    }

    /// Auto-filled and reverse fields are left to the store.
    pub fn is_generated(&self) -> bool {
        !self.auto && !self.relation.as_ref().is_some_and(|r| r.reverse)
    }
}

// ============================================================================
// Models
// ============================================================================

/// Named predicate over a composed instance.
#[derive(Clone)]
pub struct ModelConstraint {
    /// Name reported when an instance is rejected
    pub name: String,
    check: Arc<dyn Fn(&FieldValues) -> bool + Send + Sync>,
}

impl ModelConstraint {
    /// Create a named constraint from a predicate.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&FieldValues) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Run the predicate.
    pub fn check(&self, values: &FieldValues) -> bool {
        (self.check)(values)
    }
}

impl fmt::Debug for ModelConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConstraint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Model descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name
    pub name: String,

    /// Field definitions in declaration order
    pub fields: Vec<FieldDescriptor>,

    /// Field name tuples whose combined values must be unique
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_together: Vec<Vec<String>>,

    /// Custom predicates (registered programmatically)
    #[serde(skip)]
    pub constraints: Vec<ModelConstraint>,
}

impl ModelDescriptor {
    /// Create a new model descriptor.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
            unique_together: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a uniqueness-together tuple.
    pub fn with_unique_together<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.unique_together
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Add a custom constraint.
    pub fn with_constraint(mut self, constraint: ModelConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fields the generator fills, in declaration order.
    ///
    /// Auto-filled primary keys and reverse relations are excluded.
    pub fn generated_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_generated())
    }

    /// Number of uniqueness-together tuples naming a field.
    pub fn unique_together_count(&self, field: &str) -> usize {
        self.unique_together
            .iter()
            .filter(|group| group.iter().any(|name| name == field))
            .count()
    }

    /// Related models this model depends on.
    ///
    /// By default only required to-one relations count. In strong mode optional
    /// to-one and many-to-many relations count as well. Self references are
    /// ignored in strong mode only. Targets are listed once, in field order.
    pub fn dependencies(&self, strong: bool) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut deps = Vec::new();
        for field in self.generated_fields() {
            let (Some(target), Some(cardinality)) = (field.related_model(), field.cardinality())
            else {
                continue;
            };
            let counts = match cardinality {
                Cardinality::ToOneRequired => !(strong && target == self.name),
                Cardinality::ToOneOptional | Cardinality::ToMany => {
                    strong && target != self.name
                }
            };
            if counts && seen.insert(target) {
                deps.push(target);
            }
        }
        deps
    }
}

// ============================================================================
// Schema
// ============================================================================

fn default_version() -> u32 {
    1
}

/// Full schema.
///
/// Loaded from a YAML file (or assembled in code) and validated once; the
/// generator only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Model definitions
    pub models: Vec<ModelDescriptor>,

    /// Cached model lookup (not serialized)
    #[serde(skip)]
    model_map: HashMap<String, usize>,
}

impl Schema {
    /// Build and validate a schema from model descriptors.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, SchemaError> {
        let mut schema = Self {
            version: default_version(),
            models,
            model_map: HashMap::new(),
        };
        schema.build_model_map()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: Schema = serde_yaml::from_str(yaml)?;
        schema.build_model_map()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Build the internal model lookup map.
    fn build_model_map(&mut self) -> Result<(), SchemaError> {
        self.model_map.clear();
        for (idx, model) in self.models.iter().enumerate() {
            if self.model_map.insert(model.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateModel(model.name.clone()));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for model in &self.models {
            for field in &model.fields {
                if field.field_type.is_some() == field.relation.is_some() {
                    return Err(SchemaError::AmbiguousField {
                        model: model.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if let Some(target) = field.related_model() {
                    if !self.model_map.contains_key(target) {
                        return Err(SchemaError::UnknownRelationTarget {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
                for validator in &field.validators {
                    validator
                        .compiled_regex()
                        .map_err(|source| SchemaError::InvalidRegex {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            source,
                        })?;
                }
            }
            for name in model.unique_together.iter().flatten() {
                if model.get_field(name).is_none() {
                    return Err(SchemaError::FieldNotFound {
                        model: model.name.clone(),
                        field: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.model_map
            .get(name)
            .and_then(|&idx| self.models.get(idx))
    }

    /// Get a model by name, failing if it is not declared.
    pub fn model(&self, name: &str) -> Result<&ModelDescriptor, SchemaError> {
        self.get_model(name)
            .ok_or_else(|| SchemaError::ModelNotFound(name.to_string()))
    }

    /// Get a mutable model by name (to register constraints or validators).
    pub fn get_model_mut(&mut self, name: &str) -> Option<&mut ModelDescriptor> {
        let idx = *self.model_map.get(name)?;
        self.models.get_mut(idx)
    }

    /// Get all model names in declaration order.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    /// Dependencies of a model by name (empty for unknown models).
    pub fn dependencies(&self, model: &str, strong: bool) -> Vec<&str> {
        self.get_model(model)
            .map(|m| m.dependencies(strong))
            .unwrap_or_default()
    }

    /// Expand a model subset with everything it references.
    ///
    /// Follows strong dependencies transitively. The result keeps schema
    /// declaration order.
    pub fn with_dependencies(&self, subset: &[String]) -> Result<Vec<String>, SchemaError> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();
        for name in subset {
            let model = self.model(name)?;
            if included.insert(model.name.as_str()) {
                stack.push(model.name.as_str());
            }
        }
        while let Some(name) = stack.pop() {
            for dep in self.dependencies(name, true) {
                if included.insert(dep) {
                    stack.push(dep);
                }
            }
        }
        Ok(self
            .models
            .iter()
            .filter(|m| included.contains(m.name.as_str()))
            .map(|m| m.name.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"
version: 1
models:
  - name: Publisher
    fields:
      - name: id
        type: int
        primary_key: true
        auto: true
      - name: name
        type: {type: char, max_length: 40}
        unique: true
  - name: Author
    fields:
      - name: email
        type: email
        validators:
          - type: email
  - name: Tag
    fields:
      - name: label
        type: slug
  - name: Book
    unique_together: [[title, author]]
    fields:
      - name: title
        type: {type: char, max_length: 80}
      - name: author
        relation: {target: Author, kind: foreign_key}
      - name: publisher
        relation: {target: Publisher, kind: foreign_key}
        nullable: true
      - name: tags
        relation: {target: Tag, kind: many_to_many}
      - name: sequel
        relation: {target: Book, kind: one_to_one}
        nullable: true
      - name: reviews
        relation: {target: Review, kind: foreign_key, reverse: true}
  - name: Review
    fields:
      - name: book
        relation: {target: Book, kind: foreign_key}
"#;

    #[test]
    fn test_parse_schema() {
        let schema = Schema::from_yaml(LIBRARY).unwrap();
        assert_eq!(schema.version, 1);
        assert_eq!(
            schema.model_names(),
            vec!["Publisher", "Author", "Tag", "Book", "Review"]
        );

        let book = schema.get_model("Book").unwrap();
        assert_eq!(book.unique_together, vec![vec!["title", "author"]]);
        assert_eq!(book.unique_together_count("title"), 1);
        assert_eq!(book.unique_together_count("tags"), 0);

        let author = book.get_field("author").unwrap();
        assert_eq!(author.cardinality(), Some(Cardinality::ToOneRequired));
        let publisher = book.get_field("publisher").unwrap();
        assert_eq!(publisher.cardinality(), Some(Cardinality::ToOneOptional));
        assert!(book.get_field("tags").unwrap().is_many_to_many());
        assert!(book.get_field("sequel").unwrap().is_unique());
    }

    #[test]
    fn test_generated_fields_skip_auto_and_reverse() {
        let schema = Schema::from_yaml(LIBRARY).unwrap();

        let publisher = schema.get_model("Publisher").unwrap();
        let names: Vec<&str> = publisher.generated_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name"]);

        let book = schema.get_model("Book").unwrap();
        let names: Vec<&str> = book.generated_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "author", "publisher", "tags", "sequel"]);
    }

    #[test]
    fn test_dependencies() {
        let schema = Schema::from_yaml(LIBRARY).unwrap();

        assert_eq!(schema.dependencies("Book", false), vec!["Author"]);
        assert_eq!(
            schema.dependencies("Book", true),
            vec!["Author", "Publisher", "Tag"]
        );
        assert_eq!(schema.dependencies("Review", false), vec!["Book"]);
        assert!(schema.dependencies("Tag", true).is_empty());
    }

    #[test]
    fn test_with_dependencies_follows_strong_edges() {
        let schema = Schema::from_yaml(LIBRARY).unwrap();

        let expanded = schema.with_dependencies(&["Review".to_string()]).unwrap();
        assert_eq!(expanded, vec!["Publisher", "Author", "Tag", "Book", "Review"]);

        let expanded = schema.with_dependencies(&["Tag".to_string()]).unwrap();
        assert_eq!(expanded, vec!["Tag"]);

        let err = schema.with_dependencies(&["Missing".to_string()]);
        assert!(matches!(err, Err(SchemaError::ModelNotFound(name)) if name == "Missing"));
    }

    #[test]
    fn test_field_requires_type_or_relation() {
        let yaml = r#"
models:
  - name: Broken
    fields:
      - name: nothing
"#;
        assert!(matches!(
            Schema::from_yaml(yaml),
            Err(SchemaError::AmbiguousField { .. })
        ));

        let yaml = r#"
models:
  - name: Broken
    fields:
      - name: both
        type: int
        relation: {target: Broken, kind: foreign_key}
"#;
        assert!(matches!(
            Schema::from_yaml(yaml),
            Err(SchemaError::AmbiguousField { .. })
        ));
    }

    #[test]
    fn test_unknown_relation_target() {
        let yaml = r#"
models:
  - name: Book
    fields:
      - name: author
        relation: {target: Author, kind: foreign_key}
"#;
        let err = Schema::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownRelationTarget { ref target, .. } if target == "Author"
        ));
    }

    #[test]
    fn test_unique_together_unknown_field() {
        let yaml = r#"
models:
  - name: Book
    unique_together: [[title, isbn]]
    fields:
      - name: title
        type: text
"#;
        assert!(matches!(
            Schema::from_yaml(yaml),
            Err(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let yaml = r#"
models:
  - name: Code
    fields:
      - name: value
        type: {type: char, max_length: 10}
        validators:
          - type: regex
            pattern: "([a-z"
"#;
        assert!(matches!(
            Schema::from_yaml(yaml),
            Err(SchemaError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let models = vec![
            ModelDescriptor::new("A", vec![FieldDescriptor::new("x", FieldType::Integer)]),
            ModelDescriptor::new("A", vec![]),
        ];
        assert!(matches!(
            Schema::new(models),
            Err(SchemaError::DuplicateModel(name)) if name == "A"
        ));
    }

    #[test]
    fn test_generator_config_parsing() {
        let yaml = r#"
models:
  - name: Account
    fields:
      - name: handle
        type: {type: char, max_length: 30}
        generator:
          type: pattern
          pattern: "user_{index}"
      - name: tier
        type: {type: char, max_length: 10}
        samples: [gold, silver]
"#;
        let schema = Schema::from_yaml(yaml).unwrap();
        let account = schema.get_model("Account").unwrap();
        assert_eq!(
            account.get_field("handle").unwrap().generator,
            Some(GeneratorConfig::Pattern {
                pattern: "user_{index}".to_string()
            })
        );
        assert_eq!(
            account.get_field("tier").unwrap().samples.as_ref().map(Vec::len),
            Some(2)
        );
    }

    #[test]
    fn test_self_reference_dependencies() {
        let model = ModelDescriptor::new(
            "Node",
            vec![
                FieldDescriptor::relation("parent", "Node", RelationKind::ForeignKey),
                FieldDescriptor::relation("next", "Node", RelationKind::ForeignKey).nullable(),
            ],
        );
        assert_eq!(model.dependencies(false), vec!["Node"]);
        assert!(model.dependencies(true).is_empty());
    }
}
