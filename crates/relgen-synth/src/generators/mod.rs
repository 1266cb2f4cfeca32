//! Individual value generators for different data types.
//!
//! [`Synthesizer`] is the per-field strategy picked by the classifier and
//! [`OverrideGenerator`] drives the declarative `generator:` blocks of a
//! schema. Both hand out [`Value`]s from a shared [`SynthContext`] and a
//! caller-provided RNG.

pub mod file;
pub mod json;
pub mod network;
pub mod numeric;
pub mod pattern;
pub mod png;
pub mod static_value;
pub mod temporal;
pub mod text;
pub mod uuid;

use crate::context::SynthContext;
use crate::error::{Result, SynthError};
use chrono::{DateTime, Utc};
use numeric::IntegerBounds;
use pattern::Pattern;
use rand::seq::IndexedRandom;
use rand::Rng;
use relgen_core::{FieldType, GeneratorConfig, Value};
use serde_yaml::Value as YamlValue;
use text::CharClasses;

/// Default bound for unbounded binary fields.
pub const DEFAULT_BINARY_LENGTH: usize = 100;

/// Strategy producing random values for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesizer {
    /// Log-biased integer within width and validator bounds
    Integer(IntegerBounds),
    /// Fair coin
    Boolean,
    /// Email address
    Email {
        min_length: usize,
        max_length: usize,
        allowlist: Vec<String>,
    },
    /// URL with one of the accepted schemes
    Url {
        min_length: usize,
        max_length: usize,
        schemes: Vec<String>,
    },
    /// IPv4 and/or IPv6 address
    Ip { v4: bool, v6: bool },
    /// Integers joined by commas
    IntegerList {
        min_length: usize,
        max_length: usize,
        allow_negative: bool,
    },
    /// Random bytes
    Binary { max_length: usize },
    /// Slug characters
    Slug { min_length: usize, max_length: usize },
    /// Sentences of dictionary words
    Text {
        min_length: usize,
        max_length: Option<usize>,
    },
    /// Random printable characters
    String { min_length: usize, max_length: usize },
    /// Exact decimal with precision and scale
    Decimal { max_digits: u8, decimal_places: u8 },
    /// Timestamp in the recent past
    DateTime,
    /// Date in the recent past
    Date,
    /// Time of day
    Time,
    /// Span between two recent timestamps
    Duration,
    /// Wide float
    Float,
    /// Random UUID v4
    Uuid,
    /// Relative path of words
    FilePath { min_length: usize, max_length: usize },
    /// PNG image payload
    Image { max_length: usize },
    /// Text file payload
    File {
        max_length: usize,
        extensions: Vec<String>,
    },
    /// Nested JSON document
    Json,
}

impl Synthesizer {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Boolean => "boolean",
            Self::Email { .. } => "email",
            Self::Url { .. } => "url",
            Self::Ip { .. } => "ip",
            Self::IntegerList { .. } => "integer_list",
            Self::Binary { .. } => "binary",
            Self::Slug { .. } => "slug",
            Self::Text { .. } => "text",
            Self::String { .. } => "string",
            Self::Decimal { .. } => "decimal",
            Self::DateTime => "date_time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Float => "float",
            Self::Uuid => "uuid",
            Self::FilePath { .. } => "file_path",
            Self::Image { .. } => "image",
            Self::File { .. } => "file",
            Self::Json => "json",
        }
    }

    /// Draw one value.
    pub fn synthesize<R: Rng + ?Sized>(&self, ctx: &SynthContext, rng: &mut R) -> Result<Value> {
        let value = match self {
            Self::Integer(bounds) => Value::Int(numeric::generate_integer(rng, *bounds)?),
            Self::Boolean => numeric::generate_boolean(rng),
            Self::Email {
                min_length,
                max_length,
                allowlist,
            } => Value::Text(network::generate_email(
                ctx,
                rng,
                *min_length,
                *max_length,
                allowlist,
            )?),
            Self::Url {
                min_length,
                max_length,
                schemes,
            } => Value::Text(network::generate_url(
                ctx,
                rng,
                *min_length,
                *max_length,
                schemes,
            )?),
            Self::Ip { v4, v6 } => Value::Text(network::generate_ip(rng, *v4, *v6)),
            Self::IntegerList {
                min_length,
                max_length,
                allow_negative,
            } => Value::Text(text::generate_integer_list(
                rng,
                *min_length,
                *max_length,
                ',',
                *allow_negative,
            )?),
            Self::Binary { max_length } => Value::Bytes(
                text::generate_string(rng, 1, (*max_length).max(1), &CharClasses::all())?
                    .into_bytes(),
            ),
            Self::Slug {
                min_length,
                max_length,
            } => Value::Text(text::generate_slug(rng, *min_length, *max_length)?),
            Self::Text {
                min_length,
                max_length,
            } => Value::Text(text::generate_text(
                ctx,
                rng,
                *max_length,
                *min_length,
                " ",
            )?),
            Self::String {
                min_length,
                max_length,
            } => Value::Text(text::generate_string(
                rng,
                *min_length,
                *max_length,
                &CharClasses::all(),
            )?),
            Self::Decimal {
                max_digits,
                decimal_places,
            } => Value::Decimal(numeric::generate_decimal(
                rng,
                *max_digits,
                *decimal_places,
            )?),
            Self::DateTime => Value::DateTime(temporal::generate_date_time(ctx, rng)),
            Self::Date => Value::Date(temporal::generate_date(ctx, rng)),
            Self::Time => Value::Time(temporal::generate_time(ctx, rng)),
            Self::Duration => Value::Duration(temporal::generate_duration(ctx, rng)),
            Self::Float => Value::Float(numeric::generate_float(rng)?),
            Self::Uuid => Value::Uuid(uuid::generate_uuid_v4(rng)),
            Self::FilePath {
                min_length,
                max_length,
            } => Value::Text(file::generate_file_path(
                ctx,
                rng,
                *min_length,
                *max_length,
            )?),
            Self::Image { max_length } => {
                Value::File(file::generate_image_file(ctx, rng, *max_length)?)
            }
            Self::File {
                max_length,
                extensions,
            } => Value::File(file::generate_text_file(ctx, rng, *max_length, extensions)?),
            Self::Json => Value::Json(json::generate_json(ctx, rng, json::DEFAULT_JSON_DEPTH)?),
        };
        Ok(value)
    }
}

// ============================================================================
// Declarative overrides
// ============================================================================

#[derive(Debug, Clone)]
enum OverrideKind {
    UuidV4,
    Sequential { start: i64 },
    Pattern(Pattern),
    IntRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    TimestampRange { start: DateTime<Utc>, end: DateTime<Utc> },
    WeightedBool { true_weight: f64 },
    OneOf(Vec<YamlValue>),
    Static(YamlValue),
}

/// Stateful driver for a schema `generator:` block.
///
/// Keeps the position in the generated sequence for `sequential` and the
/// `{index}` placeholder of `pattern`.
#[derive(Debug, Clone)]
pub struct OverrideGenerator {
    kind: OverrideKind,
    field_type: Option<FieldType>,
    index: u64,
}

impl OverrideGenerator {
    /// Validate a configuration and build its driver.
    ///
    /// `field_type` guides the conversion of `one_of` and `static` values.
    pub fn from_config(config: &GeneratorConfig, field_type: Option<&FieldType>) -> Result<Self> {
        let name = config.name();
        let kind = match config {
            GeneratorConfig::UuidV4 => OverrideKind::UuidV4,
            GeneratorConfig::Sequential { start } => OverrideKind::Sequential { start: *start },
            GeneratorConfig::Pattern { pattern } => OverrideKind::Pattern(Pattern::parse(pattern)?),
            GeneratorConfig::IntRange { min, max } => {
                if min > max {
                    return Err(SynthError::invalid_override(
                        name,
                        format!("min {min} exceeds max {max}"),
                    ));
                }
                OverrideKind::IntRange {
                    min: *min,
                    max: *max,
                }
            }
            GeneratorConfig::FloatRange { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min > max {
                    return Err(SynthError::invalid_override(
                        name,
                        format!("[{min}, {max}] is not a finite range"),
                    ));
                }
                OverrideKind::FloatRange {
                    min: *min,
                    max: *max,
                }
            }
            GeneratorConfig::TimestampRange { start, end } => {
                let parse = |s: &str| {
                    temporal::parse_timestamp(s).ok_or_else(|| {
                        SynthError::invalid_override(name, format!("invalid timestamp '{s}'"))
                    })
                };
                let (start, end) = (parse(start)?, parse(end)?);
                if start > end {
                    return Err(SynthError::invalid_override(
                        name,
                        format!("start {start} is after end {end}"),
                    ));
                }
                OverrideKind::TimestampRange { start, end }
            }
            GeneratorConfig::WeightedBool { true_weight } => {
                if !(0.0..=1.0).contains(true_weight) {
                    return Err(SynthError::invalid_override(
                        name,
                        format!("true_weight {true_weight} is outside [0, 1]"),
                    ));
                }
                OverrideKind::WeightedBool {
                    true_weight: *true_weight,
                }
            }
            GeneratorConfig::OneOf { values } => {
                if values.is_empty() {
                    return Err(SynthError::invalid_override(name, "no values to pick from"));
                }
                OverrideKind::OneOf(values.clone())
            }
            GeneratorConfig::Static { value } => OverrideKind::Static(value.clone()),
        };
        Ok(Self {
            kind,
            field_type: field_type.cloned(),
            index: 0,
        })
    }

    /// Whether repeated draws can yield new values.
    pub fn is_unbounded(&self) -> bool {
        !matches!(self.kind, OverrideKind::Static(_))
    }

    /// Produce the next value and advance the sequence position.
    pub fn next_value<R: Rng + ?Sized>(&mut self, ctx: &SynthContext, rng: &mut R) -> Value {
        let index = self.index;
        self.index += 1;
        let field_type = self.field_type.as_ref();
        match &self.kind {
            OverrideKind::UuidV4 => Value::Uuid(uuid::generate_uuid_v4(rng)),
            OverrideKind::Sequential { start } => {
                Value::Int(start.saturating_add(i64::try_from(index).unwrap_or(i64::MAX)))
            }
            OverrideKind::Pattern(pattern) => Value::Text(pattern.render(ctx, rng, index)),
            OverrideKind::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),
            OverrideKind::FloatRange { min, max } => {
                numeric::generate_float_range(rng, *min, *max)
            }
            OverrideKind::TimestampRange { start, end } => {
                Value::DateTime(temporal::generate_timestamp_range(rng, *start, *end))
            }
            OverrideKind::WeightedBool { true_weight } => Value::Bool(rng.random_bool(*true_weight)),
            OverrideKind::OneOf(values) => values
                .choose(rng)
                .map(|v| static_value::yaml_to_value(v, field_type))
                .unwrap_or(Value::Null),
            OverrideKind::Static(value) => static_value::yaml_to_value(value, field_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Dictionary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use relgen_core::Validator;

    fn ctx() -> SynthContext {
        SynthContext::with_dictionary(Dictionary::builtin())
    }

    #[test]
    fn test_synthesize_value_kinds() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let cases = [
            (Synthesizer::Integer(IntegerBounds::new(16, false)), "int"),
            (Synthesizer::Boolean, "bool"),
            (Synthesizer::Uuid, "uuid"),
            (Synthesizer::Date, "date"),
            (Synthesizer::Time, "time"),
            (Synthesizer::DateTime, "datetime"),
            (Synthesizer::Duration, "duration"),
            (Synthesizer::Float, "float"),
            (Synthesizer::Json, "json"),
            (Synthesizer::Binary { max_length: 10 }, "bytes"),
            (Synthesizer::Image { max_length: 100 }, "file"),
        ];
        for (synth, kind) in cases {
            let value = synth.synthesize(&ctx, &mut rng).unwrap();
            let matched = match kind {
                "int" => matches!(value, Value::Int(v) if (0..=32767).contains(&v)),
                "bool" => matches!(value, Value::Bool(_)),
                "uuid" => matches!(value, Value::Uuid(_)),
                "date" => matches!(value, Value::Date(_)),
                "time" => matches!(value, Value::Time(_)),
                "datetime" => matches!(value, Value::DateTime(_)),
                "duration" => matches!(value, Value::Duration(_)),
                "float" => matches!(value, Value::Float(_)),
                "json" => matches!(value, Value::Json(_)),
                "bytes" => matches!(&value, Value::Bytes(b) if !b.is_empty() && b.len() <= 10),
                "file" => matches!(&value, Value::File(f) if f.name.ends_with(".png")),
                _ => false,
            };
            assert!(matched, "{} produced {value:?}", synth.name());
        }
    }

    #[test]
    fn test_synthesize_text_kinds_respect_lengths() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let synths = [
            Synthesizer::String {
                min_length: 0,
                max_length: 12,
            },
            Synthesizer::Slug {
                min_length: 0,
                max_length: 12,
            },
            Synthesizer::Text {
                min_length: 0,
                max_length: Some(12),
            },
            Synthesizer::IntegerList {
                min_length: 0,
                max_length: 12,
                allow_negative: false,
            },
            Synthesizer::FilePath {
                min_length: 0,
                max_length: 12,
            },
        ];
        for synth in synths {
            for _ in 0..50 {
                let value = synth.synthesize(&ctx, &mut rng).unwrap();
                let text = value.as_str().unwrap();
                assert!(text.len() <= 12, "{}: {text:?}", synth.name());
            }
        }
    }

    #[test]
    fn test_synthesize_email_passes_validator() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let synth = Synthesizer::Email {
            min_length: 14,
            max_length: 254,
            allowlist: vec![],
        };
        let validator = Validator::Email { allowlist: vec![] };
        for _ in 0..50 {
            let value = synth.synthesize(&ctx, &mut rng).unwrap();
            assert!(validator.validate(&value), "{value}");
        }
    }

    #[test]
    fn test_synthesize_inconsistent_decimal() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let synth = Synthesizer::Decimal {
            max_digits: 2,
            decimal_places: 3,
        };
        assert!(matches!(
            synth.synthesize(&ctx, &mut rng),
            Err(SynthError::InconsistentDefinition(_))
        ));
    }

    #[test]
    fn test_override_sequential() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let mut generator =
            OverrideGenerator::from_config(&GeneratorConfig::Sequential { start: 100 }, None)
                .unwrap();
        let values: Vec<Value> = (0..3).map(|_| generator.next_value(&ctx, &mut rng)).collect();
        assert_eq!(values, vec![Value::Int(100), Value::Int(101), Value::Int(102)]);
    }

    #[test]
    fn test_override_pattern_uses_index() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Pattern {
            pattern: "user_{index}".to_string(),
        };
        let mut generator = OverrideGenerator::from_config(&config, None).unwrap();
        assert_eq!(
            generator.next_value(&ctx, &mut rng),
            Value::Text("user_0".to_string())
        );
        assert_eq!(
            generator.next_value(&ctx, &mut rng),
            Value::Text("user_1".to_string())
        );
    }

    #[test]
    fn test_override_ranges() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ints =
            OverrideGenerator::from_config(&GeneratorConfig::IntRange { min: 5, max: 9 }, None)
                .unwrap();
        let mut floats = OverrideGenerator::from_config(
            &GeneratorConfig::FloatRange { min: 0.5, max: 1.5 },
            None,
        )
        .unwrap();
        let mut timestamps = OverrideGenerator::from_config(
            &GeneratorConfig::TimestampRange {
                start: "2020-01-01".to_string(),
                end: "2020-12-31".to_string(),
            },
            None,
        )
        .unwrap();
        for _ in 0..100 {
            let i = ints.next_value(&ctx, &mut rng).as_i64().unwrap();
            assert!((5..=9).contains(&i));
            let f = floats.next_value(&ctx, &mut rng).as_f64().unwrap();
            assert!((0.5..=1.5).contains(&f));
            if let Value::DateTime(dt) = timestamps.next_value(&ctx, &mut rng) {
                assert_eq!(chrono::Datelike::year(&dt), 2020);
            } else {
                panic!("Expected DateTime");
            }
        }
    }

    #[test]
    fn test_override_one_of_and_static_use_field_type() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<YamlValue> = serde_yaml::from_str("[\"2024-01-01\", \"2024-06-01\"]").unwrap();
        let mut one_of =
            OverrideGenerator::from_config(&GeneratorConfig::OneOf { values }, Some(&FieldType::Date))
                .unwrap();
        for _ in 0..10 {
            assert!(matches!(one_of.next_value(&ctx, &mut rng), Value::Date(_)));
        }

        let mut fixed = OverrideGenerator::from_config(
            &GeneratorConfig::Static {
                value: YamlValue::from(7),
            },
            None,
        )
        .unwrap();
        assert!(!fixed.is_unbounded());
        assert_eq!(fixed.next_value(&ctx, &mut rng), Value::Int(7));
    }

    #[test]
    fn test_override_rejects_invalid_configs() {
        let invalid = [
            GeneratorConfig::IntRange { min: 10, max: 1 },
            GeneratorConfig::FloatRange {
                min: 1.0,
                max: f64::NAN,
            },
            GeneratorConfig::TimestampRange {
                start: "2024-01-01".to_string(),
                end: "2020-01-01".to_string(),
            },
            GeneratorConfig::TimestampRange {
                start: "soon".to_string(),
                end: "2020-01-01".to_string(),
            },
            GeneratorConfig::WeightedBool { true_weight: 1.5 },
            GeneratorConfig::OneOf { values: vec![] },
            GeneratorConfig::Pattern {
                pattern: "{bogus}".to_string(),
            },
        ];
        for config in invalid {
            let err = OverrideGenerator::from_config(&config, None).unwrap_err();
            if let SynthError::InvalidOverride { generator, .. } = err {
                assert_eq!(generator, config.name());
            } else {
                panic!("Expected InvalidOverride for {config:?}");
            }
        }
    }
}
