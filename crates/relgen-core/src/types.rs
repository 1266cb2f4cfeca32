//! Field type universe for model descriptors.
//!
//! This module defines `FieldType`, the primitive type tag carried by every
//! non-relational field. The tag mirrors the storage types a relational ORM
//! exposes through introspection (integer widths, character fields, temporal
//! types, files, JSON, ...). The tag alone does not decide how values are
//! synthesized: validators attached to the field take precedence.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Default `max_length` of an email field.
pub const DEFAULT_EMAIL_LENGTH: u32 = 254;
/// Default `max_length` of a URL field.
pub const DEFAULT_URL_LENGTH: u32 = 200;
/// Default `max_length` of a slug field.
pub const DEFAULT_SLUG_LENGTH: u32 = 50;
/// Default `max_length` of file and file path fields.
pub const DEFAULT_FILE_LENGTH: u32 = 100;

/// Primitive type of a non-relational field.
///
/// # YAML Format
///
/// Simple types can be specified as strings:
/// ```yaml
/// type: int
/// type: uuid
/// type: date_time
/// ```
///
/// Parameterized types use object format:
/// ```yaml
/// type:
///   type: char
///   max_length: 50
/// type:
///   type: decimal
///   max_digits: 10
///   decimal_places: 2
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Boolean value
    Boolean,

    // Signed integers
    /// 16-bit signed integer
    SmallInteger,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInteger,

    // Non-negative integers
    /// 16-bit integer restricted to non-negative values
    PositiveSmallInteger,
    /// 32-bit integer restricted to non-negative values
    PositiveInteger,
    /// 64-bit integer restricted to non-negative values
    PositiveBigInteger,

    /// Double precision floating point
    Float,

    /// Exact decimal
    Decimal {
        /// Total number of digits
        max_digits: u8,
        /// Number of digits after the decimal point
        decimal_places: u8,
    },

    // Text
    /// Bounded character string
    Char {
        /// Maximum length in characters
        max_length: u32,
    },
    /// Free text, optionally bounded
    Text {
        /// Maximum length in characters
        max_length: Option<u32>,
    },
    /// Slug made of letters, digits, underscores and hyphens
    Slug {
        /// Maximum length in characters
        max_length: u32,
    },
    /// Comma separated list of integers stored as text
    CommaSeparatedInteger {
        /// Maximum length in characters
        max_length: u32,
    },
    /// Email address
    Email {
        /// Maximum length in characters
        max_length: u32,
    },
    /// URL
    Url {
        /// Maximum length in characters
        max_length: u32,
    },
    /// IP address
    IpAddress {
        /// Accepted protocol family
        protocol: IpProtocol,
    },

    /// UUID (128-bit)
    Uuid,

    // Temporal
    /// Date only
    Date,
    /// Time only
    Time,
    /// Timestamp with timezone
    DateTime,
    /// Time span
    Duration,

    /// Raw bytes
    Binary {
        /// Maximum length in bytes
        max_length: Option<u32>,
    },

    // Files
    /// Filesystem path
    FilePath {
        /// Maximum length in characters
        max_length: u32,
    },
    /// Uploaded file with text content
    File {
        /// Maximum length of the stored file name
        max_length: u32,
    },
    /// Uploaded PNG image
    Image,

    /// Structured JSON document
    Json,
}

/// Protocol family accepted by an IP address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpProtocol {
    /// IPv4 or IPv6
    #[default]
    Both,
    /// IPv4 only
    Ipv4,
    /// IPv6 only
    Ipv6,
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            // Simple types - serialize as string
            Self::Boolean => serializer.serialize_str("bool"),
            Self::SmallInteger => serializer.serialize_str("small_int"),
            Self::Integer => serializer.serialize_str("int"),
            Self::BigInteger => serializer.serialize_str("big_int"),
            Self::PositiveSmallInteger => serializer.serialize_str("positive_small_int"),
            Self::PositiveInteger => serializer.serialize_str("positive_int"),
            Self::PositiveBigInteger => serializer.serialize_str("positive_big_int"),
            Self::Float => serializer.serialize_str("float"),
            Self::Text { max_length: None } => serializer.serialize_str("text"),
            Self::Binary { max_length: None } => serializer.serialize_str("binary"),
            Self::Uuid => serializer.serialize_str("uuid"),
            Self::Date => serializer.serialize_str("date"),
            Self::Time => serializer.serialize_str("time"),
            Self::DateTime => serializer.serialize_str("date_time"),
            Self::Duration => serializer.serialize_str("duration"),
            Self::Image => serializer.serialize_str("image"),
            Self::Json => serializer.serialize_str("json"),

            // Parameterized types - serialize as map
            Self::Decimal {
                max_digits,
                decimal_places,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "decimal")?;
                map.serialize_entry("max_digits", max_digits)?;
                map.serialize_entry("decimal_places", decimal_places)?;
                map.end()
            }
            Self::Text {
                max_length: Some(max_length),
            } => serialize_with_length(serializer, "text", *max_length),
            Self::Binary {
                max_length: Some(max_length),
            } => serialize_with_length(serializer, "binary", *max_length),
            Self::Char { max_length } => serialize_with_length(serializer, "char", *max_length),
            Self::Slug { max_length } => serialize_with_length(serializer, "slug", *max_length),
            Self::CommaSeparatedInteger { max_length } => {
                serialize_with_length(serializer, "comma_separated_int", *max_length)
            }
            Self::Email { max_length } => serialize_with_length(serializer, "email", *max_length),
            Self::Url { max_length } => serialize_with_length(serializer, "url", *max_length),
            Self::FilePath { max_length } => {
                serialize_with_length(serializer, "file_path", *max_length)
            }
            Self::File { max_length } => serialize_with_length(serializer, "file", *max_length),
            Self::IpAddress { protocol } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "ip_address")?;
                map.serialize_entry("protocol", protocol)?;
                map.end()
            }
        }
    }
}

fn serialize_with_length<S: Serializer>(
    serializer: S,
    type_name: &str,
    max_length: u32,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("type", type_name)?;
    map.serialize_entry("max_length", &max_length)?;
    map.end()
}

/// Types that can be written as a bare string.
fn simple_type(name: &str) -> Option<FieldType> {
    let ty = match name {
        "bool" | "boolean" => FieldType::Boolean,
        "small_int" | "smallint" => FieldType::SmallInteger,
        "int" | "integer" => FieldType::Integer,
        "big_int" | "bigint" => FieldType::BigInteger,
        "positive_small_int" => FieldType::PositiveSmallInteger,
        "positive_int" => FieldType::PositiveInteger,
        "positive_big_int" => FieldType::PositiveBigInteger,
        "float" | "double" => FieldType::Float,
        "text" => FieldType::Text { max_length: None },
        "binary" | "bytes" => FieldType::Binary { max_length: None },
        "uuid" => FieldType::Uuid,
        "date" => FieldType::Date,
        "time" => FieldType::Time,
        "date_time" | "datetime" => FieldType::DateTime,
        "duration" => FieldType::Duration,
        "image" => FieldType::Image,
        "json" => FieldType::Json,
        "ip_address" => FieldType::IpAddress {
            protocol: IpProtocol::Both,
        },
        "email" => FieldType::Email {
            max_length: DEFAULT_EMAIL_LENGTH,
        },
        "url" => FieldType::Url {
            max_length: DEFAULT_URL_LENGTH,
        },
        "slug" => FieldType::Slug {
            max_length: DEFAULT_SLUG_LENGTH,
        },
        "file" => FieldType::File {
            max_length: DEFAULT_FILE_LENGTH,
        },
        "file_path" => FieldType::FilePath {
            max_length: DEFAULT_FILE_LENGTH,
        },
        _ => return None,
    };
    Some(ty)
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldTypeVisitor;

        impl<'de> Visitor<'de> for FieldTypeVisitor {
            type Value = FieldType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or map representing a FieldType")
            }

            // Handle string format: "int", "uuid", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_type(value).ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            // Handle map format: {"type": "char", "max_length": 50}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "decimal" => Ok(FieldType::Decimal {
                        max_digits: get_field_required(&fields, "max_digits")?,
                        decimal_places: get_field_required(&fields, "decimal_places")?,
                    }),
                    "char" | "var_char" | "varchar" => Ok(FieldType::Char {
                        max_length: get_field_required(&fields, "max_length")?,
                    }),
                    "comma_separated_int" => Ok(FieldType::CommaSeparatedInteger {
                        max_length: get_field_required(&fields, "max_length")?,
                    }),
                    "text" => Ok(FieldType::Text {
                        max_length: get_field(&fields, "max_length"),
                    }),
                    "binary" | "bytes" => Ok(FieldType::Binary {
                        max_length: get_field(&fields, "max_length"),
                    }),
                    "slug" => Ok(FieldType::Slug {
                        max_length: get_field(&fields, "max_length").unwrap_or(DEFAULT_SLUG_LENGTH),
                    }),
                    "email" => Ok(FieldType::Email {
                        max_length: get_field(&fields, "max_length")
                            .unwrap_or(DEFAULT_EMAIL_LENGTH),
                    }),
                    "url" => Ok(FieldType::Url {
                        max_length: get_field(&fields, "max_length").unwrap_or(DEFAULT_URL_LENGTH),
                    }),
                    "file" => Ok(FieldType::File {
                        max_length: get_field(&fields, "max_length").unwrap_or(DEFAULT_FILE_LENGTH),
                    }),
                    "file_path" => Ok(FieldType::FilePath {
                        max_length: get_field(&fields, "max_length").unwrap_or(DEFAULT_FILE_LENGTH),
                    }),
                    "ip_address" => Ok(FieldType::IpAddress {
                        protocol: get_field(&fields, "protocol").unwrap_or_default(),
                    }),
                    other => simple_type(other)
                        .ok_or_else(|| M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldTypeVisitor)
    }
}

// Helper functions for deserialization
fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

impl FieldType {
    /// Create a new Char type with the given maximum length.
    pub fn char(max_length: u32) -> Self {
        Self::Char { max_length }
    }

    /// Create a new Decimal type.
    pub fn decimal(max_digits: u8, decimal_places: u8) -> Self {
        Self::Decimal {
            max_digits,
            decimal_places,
        }
    }

    /// Create a new Text type, optionally bounded.
    pub fn text(max_length: Option<u32>) -> Self {
        Self::Text { max_length }
    }

    /// Bit width and sign of integer types.
    ///
    /// Returns `(bits, negative_allowed)`; `None` for non-integer types.
    pub fn integer_width(&self) -> Option<(u32, bool)> {
        match self {
            Self::SmallInteger => Some((16, true)),
            Self::Integer => Some((32, true)),
            Self::BigInteger => Some((64, true)),
            Self::PositiveSmallInteger => Some((16, false)),
            Self::PositiveInteger => Some((32, false)),
            Self::PositiveBigInteger => Some((64, false)),
            _ => None,
        }
    }

    /// Declared maximum length, if the type carries one.
    pub fn max_length(&self) -> Option<u32> {
        match self {
            Self::Char { max_length }
            | Self::Slug { max_length }
            | Self::CommaSeparatedInteger { max_length }
            | Self::Email { max_length }
            | Self::Url { max_length }
            | Self::FilePath { max_length }
            | Self::File { max_length } => Some(*max_length),
            Self::Text { max_length } | Self::Binary { max_length } => *max_length,
            _ => None,
        }
    }

    /// Check if this type represents an integer type.
    pub fn is_integer(&self) -> bool {
        self.integer_width().is_some()
    }

    /// Check if this type represents a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime | Self::Duration)
    }

    /// Structured values cannot be deduplicated by hashing.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_width() {
        assert_eq!(FieldType::SmallInteger.integer_width(), Some((16, true)));
        assert_eq!(FieldType::PositiveBigInteger.integer_width(), Some((64, false)));
        assert_eq!(FieldType::Float.integer_width(), None);
        assert!(FieldType::Integer.is_integer());
        assert!(!FieldType::Json.is_integer());
    }

    #[test]
    fn test_max_length() {
        assert_eq!(FieldType::char(50).max_length(), Some(50));
        assert_eq!(FieldType::text(None).max_length(), None);
        assert_eq!(FieldType::text(Some(300)).max_length(), Some(300));
        assert_eq!(FieldType::Uuid.max_length(), None);
    }

    #[test]
    fn test_deserialize_simple_string() {
        let parsed: FieldType = serde_yaml::from_str("int").unwrap();
        assert_eq!(parsed, FieldType::Integer);

        let parsed: FieldType = serde_yaml::from_str("email").unwrap();
        assert_eq!(
            parsed,
            FieldType::Email {
                max_length: DEFAULT_EMAIL_LENGTH
            }
        );

        let parsed: FieldType = serde_yaml::from_str("text").unwrap();
        assert_eq!(parsed, FieldType::Text { max_length: None });
    }

    #[test]
    fn test_deserialize_parameterized_types() {
        let yaml = r#"
type: char
max_length: 500
"#;
        let parsed: FieldType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, FieldType::char(500));

        let yaml = r#"
type: decimal
max_digits: 10
decimal_places: 2
"#;
        let parsed: FieldType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, FieldType::decimal(10, 2));

        let yaml = r#"
type: ip_address
protocol: ipv6
"#;
        let parsed: FieldType = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed,
            FieldType::IpAddress {
                protocol: IpProtocol::Ipv6
            }
        );
    }

    #[test]
    fn test_char_requires_max_length() {
        let yaml = r#"
type: char
"#;
        let parsed: Result<FieldType, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let parsed: Result<FieldType, _> = serde_yaml::from_str("geometry");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let types = vec![
            FieldType::Boolean,
            FieldType::PositiveSmallInteger,
            FieldType::decimal(8, 3),
            FieldType::char(40),
            FieldType::text(Some(1000)),
            FieldType::IpAddress {
                protocol: IpProtocol::Ipv4,
            },
            FieldType::File { max_length: 80 },
        ];

        for ty in types {
            let yaml = serde_yaml::to_string(&ty).unwrap();
            let parsed: FieldType = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(ty, parsed);
        }
    }
}
