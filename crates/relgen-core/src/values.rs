//! Value and instance representations.
//!
//! `Value` is the single currency exchanged between synthesizers, the pool
//! builder and the backing store. `Instance` is one persisted row of a model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use uuid::Uuid;

/// Identity assigned by the backing store to a persisted instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// In-memory file produced for file and image fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePayload {
    /// File name including extension
    pub name: String,
    /// Raw file content
    pub content: Vec<u8>,
}

/// A single field value.
///
/// Equality and hashing treat floats by bit pattern so that values can be
/// deduplicated in hash sets. JSON documents compare structurally but are
/// flagged by [`Value::is_structured`] so pools keep them with list semantics.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed integer (every integer width fits)
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Exact decimal
    Decimal(Decimal),

    /// Text value
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date only
    Date(NaiveDate),

    /// Time only
    Time(NaiveTime),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// Time span
    Duration(Duration),

    /// JSON document
    Json(serde_json::Value),

    /// File or image payload
    File(FilePayload),

    /// Reference to a persisted instance of the related model
    Ref(InstanceId),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Structured values are pooled without set deduplication.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integers, floats and decimals.
    pub fn as_f64(&self) -> Option<f64> {
        use rust_decimal::prelude::ToPrimitive;

        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    ///
    /// File payloads expose their file name.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::File(file) => Some(&file.name),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::File(file) => Some(&file.content),
            _ => None,
        }
    }

    /// Try to get this value as a decimal.
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Self::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Try to get this value as an instance reference.
    pub fn as_ref_id(&self) -> Option<InstanceId> {
        match self {
            Self::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Length used by length validators: characters for text, bytes for binary.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Text(s) => Some(s.chars().count()),
            Self::Bytes(b) => Some(b.len()),
            Self::File(file) => Some(file.name.chars().count()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::File(a), Self::File(b)) => a == b,
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            // Decimal hashing normalizes scale, matching its equality
            Self::Decimal(d) => d.hash(state),
            Self::Text(s) => s.hash(state),
            Self::Bytes(b) => b.hash(state),
            Self::Uuid(u) => u.hash(state),
            Self::Date(d) => d.hash(state),
            Self::Time(t) => t.hash(state),
            Self::DateTime(dt) => dt.hash(state),
            Self::Duration(d) => d.hash(state),
            Self::Json(json) => json.to_string().hash(state),
            Self::File(file) => file.hash(state),
            Self::Ref(id) => id.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Json(json) => write!(f, "{json}"),
            Self::File(file) => write!(f, "file:{} ({} bytes)", file.name, file.content.len()),
            Self::Ref(id) => write!(f, "{id}"),
        }
    }
}

/// Field name to value mapping used to compose an instance.
pub type FieldValues = BTreeMap<String, Value>;

/// A persisted row of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Model name
    pub model: String,

    /// Identity assigned by the store
    pub id: InstanceId,

    /// Scalar and to-one field values (field name -> value)
    pub fields: FieldValues,

    /// Many-to-many links (field name -> related instance ids)
    pub links: BTreeMap<String, Vec<InstanceId>>,
}

impl Instance {
    /// Create a new instance without many-to-many links.
    pub fn new(model: impl Into<String>, id: InstanceId, fields: FieldValues) -> Self {
        Self {
            model: model.into(),
            id,
            fields,
            links: BTreeMap::new(),
        }
    }

    /// Create a new instance with a builder pattern.
    pub fn builder(model: impl Into<String>, id: InstanceId) -> InstanceBuilder {
        InstanceBuilder {
            model: model.into(),
            id,
            fields: FieldValues::new(),
            links: BTreeMap::new(),
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, replacing any previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Related instance ids of a many-to-many field (empty if none).
    pub fn linked(&self, name: &str) -> &[InstanceId] {
        self.links.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attach related instances to a many-to-many field, skipping ids already linked.
    pub fn link(&mut self, name: impl Into<String>, ids: impl IntoIterator<Item = InstanceId>) {
        let linked = self.links.entry(name.into()).or_default();
        for id in ids {
            if !linked.contains(&id) {
                linked.push(id);
            }
        }
    }

    /// Reference value pointing at this instance.
    pub fn as_ref_value(&self) -> Value {
        Value::Ref(self.id)
    }
}

/// Builder for `Instance`.
pub struct InstanceBuilder {
    model: String,
    id: InstanceId,
    fields: FieldValues,
    links: BTreeMap<String, Vec<InstanceId>>,
}

impl InstanceBuilder {
    /// Add a field to the instance.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Add many-to-many links to the instance.
    pub fn links(mut self, name: impl Into<String>, ids: Vec<InstanceId>) -> Self {
        self.links.insert(name.into(), ids);
        self
    }

    /// Build the instance.
    pub fn build(self) -> Instance {
        Instance {
            model: self.model,
            id: self.id,
            fields: self.fields,
            links: self.links,
        }
    }
}
