//! Field classifier: maps a field to the synthesizer producing its values.
//!
//! Classification walks a priority-ordered rule table and the first rule
//! whose predicate accepts the field wins. Validators take precedence over
//! the nominal type: a `char` field carrying an email validator is an email
//! field. Bounds for the chosen synthesizer come from the field type and the
//! validator list, gathered into [`FieldConstraints`].

use relgen_core::types::{
    DEFAULT_EMAIL_LENGTH, DEFAULT_FILE_LENGTH, DEFAULT_SLUG_LENGTH, DEFAULT_URL_LENGTH,
};
use relgen_core::validators::DEFAULT_URL_SCHEMES;
use relgen_core::{FieldDescriptor, FieldType, IpProtocol, Validator};
use relgen_synth::generators::network::{MIN_EMAIL_LENGTH, MIN_URL_LENGTH};
use relgen_synth::generators::DEFAULT_BINARY_LENGTH;
use relgen_synth::{IntegerBounds, Synthesizer};
use tracing::debug;

/// Default bound of integer list fields without a declared length.
pub const DEFAULT_INTEGER_LIST_LENGTH: usize = 100;

/// Keyword constraints gathered from a field's type and validators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    /// Inclusive numeric lower bound
    pub min_value: Option<i64>,
    /// Inclusive numeric upper bound
    pub max_value: Option<i64>,
    /// Numeric step
    pub step: Option<i64>,
    /// Minimum length
    pub min_length: Option<usize>,
    /// Maximum length (tightest of type and validators)
    pub max_length: Option<usize>,
    /// Email domains accepted verbatim
    pub allowlist: Vec<String>,
    /// Accepted URL schemes
    pub schemes: Option<Vec<String>>,
    /// Accepted file extensions
    pub extensions: Vec<String>,
    /// Decimal precision
    pub max_digits: Option<u8>,
    /// Decimal scale
    pub decimal_places: Option<u8>,
    /// Integer lists may hold negative numbers
    pub allow_negative: bool,
}

fn tighten<T: Ord + Copy>(current: Option<T>, bound: T, keep: fn(T, T) -> T) -> Option<T> {
    Some(current.map_or(bound, |c| keep(c, bound)))
}

impl FieldConstraints {
    /// Extract the constraints of a field.
    pub fn extract(field: &FieldDescriptor) -> Self {
        let mut c = Self::default();
        if let Some(field_type) = &field.field_type {
            c.max_length = field_type.max_length().map(|n| n as usize);
            if let FieldType::Decimal {
                max_digits,
                decimal_places,
            } = field_type
            {
                c.max_digits = Some(*max_digits);
                c.decimal_places = Some(*decimal_places);
            }
        }

        for validator in &field.validators {
            match validator {
                Validator::Email { allowlist } => c.allowlist.extend(allowlist.iter().cloned()),
                Validator::Url {
                    schemes: Some(schemes),
                } => c.schemes = Some(schemes.clone()),
                Validator::IntList { allow_negative } => c.allow_negative |= *allow_negative,
                Validator::MinLength { limit } => {
                    c.min_length = tighten(c.min_length, *limit, std::cmp::max)
                }
                Validator::MaxLength { limit } => {
                    c.max_length = tighten(c.max_length, *limit, std::cmp::min)
                }
                Validator::MinValue { limit } => {
                    c.min_value = tighten(c.min_value, *limit, std::cmp::max)
                }
                Validator::MaxValue { limit } => {
                    c.max_value = tighten(c.max_value, *limit, std::cmp::min)
                }
                Validator::StepValue { step } => c.step = Some(*step),
                Validator::Decimal {
                    max_digits,
                    decimal_places,
                } => {
                    c.max_digits = tighten(c.max_digits, *max_digits, std::cmp::min);
                    c.decimal_places = tighten(c.decimal_places, *decimal_places, std::cmp::min);
                }
                Validator::FileExtension { allowed } => c.extensions.extend(allowed.iter().cloned()),
                _ => {}
            }
        }
        c
    }

    fn min_length_or(&self, floor: usize) -> usize {
        self.min_length.unwrap_or(0).max(floor)
    }
}

/// Outcome of classifying a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Name of the matching rule
    pub rule: &'static str,
    /// Synthesizer producing the field's values
    pub synthesizer: Synthesizer,
}

struct Rule {
    name: &'static str,
    matches: fn(&FieldType, &[Validator]) -> bool,
    build: fn(&FieldType, &FieldConstraints) -> Synthesizer,
}

fn has_validator(validators: &[Validator], pred: fn(&Validator) -> bool) -> bool {
    validators.iter().any(pred)
}

/// Priority-ordered rule table. First match wins.
const RULES: &[Rule] = &[
    Rule {
        name: "integer",
        matches: |ty, _| ty.is_integer(),
        build: |ty, c| {
            let (bits, negative_allowed) = ty.integer_width().unwrap_or((64, true));
            Synthesizer::Integer(IntegerBounds {
                min: c.min_value,
                max: c.max_value,
                step: c.step.unwrap_or(1),
                ..IntegerBounds::new(bits, negative_allowed)
            })
        },
    },
    Rule {
        name: "boolean",
        matches: |ty, _| matches!(ty, FieldType::Boolean),
        build: |_, _| Synthesizer::Boolean,
    },
    Rule {
        name: "email",
        matches: |ty, v| {
            matches!(ty, FieldType::Email { .. })
                || has_validator(v, |v| matches!(v, Validator::Email { .. }))
        },
        build: |_, c| Synthesizer::Email {
            min_length: c.min_length_or(MIN_EMAIL_LENGTH),
            max_length: c.max_length.unwrap_or(DEFAULT_EMAIL_LENGTH as usize),
            allowlist: c.allowlist.clone(),
        },
    },
    Rule {
        name: "url",
        matches: |ty, v| {
            matches!(ty, FieldType::Url { .. })
                || has_validator(v, |v| matches!(v, Validator::Url { .. }))
        },
        build: |_, c| Synthesizer::Url {
            min_length: c.min_length_or(MIN_URL_LENGTH),
            max_length: c.max_length.unwrap_or(DEFAULT_URL_LENGTH as usize),
            schemes: c.schemes.clone().unwrap_or_else(|| {
                DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect()
            }),
        },
    },
    Rule {
        name: "ipv4",
        matches: |_, v| has_validator(v, |v| matches!(v, Validator::Ipv4)),
        build: |_, _| Synthesizer::Ip {
            v4: true,
            v6: false,
        },
    },
    Rule {
        name: "ipv6",
        matches: |_, v| has_validator(v, |v| matches!(v, Validator::Ipv6)),
        build: |_, _| Synthesizer::Ip {
            v4: false,
            v6: true,
        },
    },
    Rule {
        name: "ip",
        matches: |ty, v| {
            matches!(ty, FieldType::IpAddress { .. })
                || has_validator(v, |v| matches!(v, Validator::Ipv46))
        },
        build: |ty, _| match ty {
            FieldType::IpAddress {
                protocol: IpProtocol::Ipv4,
            } => Synthesizer::Ip {
                v4: true,
                v6: false,
            },
            FieldType::IpAddress {
                protocol: IpProtocol::Ipv6,
            } => Synthesizer::Ip {
                v4: false,
                v6: true,
            },
            _ => Synthesizer::Ip { v4: true, v6: true },
        },
    },
    Rule {
        name: "integer_list",
        matches: |ty, v| {
            matches!(ty, FieldType::CommaSeparatedInteger { .. })
                || has_validator(v, |v| matches!(v, Validator::IntList { .. }))
        },
        build: |_, c| Synthesizer::IntegerList {
            min_length: c.min_length_or(1),
            max_length: c.max_length.unwrap_or(DEFAULT_INTEGER_LIST_LENGTH),
            allow_negative: c.allow_negative,
        },
    },
    Rule {
        name: "binary",
        matches: |ty, _| matches!(ty, FieldType::Binary { .. }),
        build: |_, c| Synthesizer::Binary {
            max_length: c.max_length.unwrap_or(DEFAULT_BINARY_LENGTH),
        },
    },
    Rule {
        name: "slug",
        matches: |ty, v| {
            matches!(ty, FieldType::Slug { .. })
                || has_validator(v, |v| matches!(v, Validator::Slug))
        },
        build: |_, c| Synthesizer::Slug {
            min_length: c.min_length_or(1),
            max_length: c.max_length.unwrap_or(DEFAULT_SLUG_LENGTH as usize),
        },
    },
    Rule {
        name: "text",
        matches: |ty, _| matches!(ty, FieldType::Text { .. }),
        build: |_, c| Synthesizer::Text {
            min_length: c.min_length_or(0),
            max_length: c.max_length,
        },
    },
    Rule {
        name: "decimal",
        matches: |ty, v| {
            matches!(ty, FieldType::Decimal { .. })
                || has_validator(v, |v| matches!(v, Validator::Decimal { .. }))
        },
        build: |_, c| Synthesizer::Decimal {
            max_digits: c.max_digits.unwrap_or(10),
            decimal_places: c.decimal_places.unwrap_or(2),
        },
    },
    Rule {
        name: "date_time",
        matches: |ty, _| matches!(ty, FieldType::DateTime),
        build: |_, _| Synthesizer::DateTime,
    },
    Rule {
        name: "date",
        matches: |ty, _| matches!(ty, FieldType::Date),
        build: |_, _| Synthesizer::Date,
    },
    Rule {
        name: "float",
        matches: |ty, _| matches!(ty, FieldType::Float),
        build: |_, _| Synthesizer::Float,
    },
    Rule {
        name: "time",
        matches: |ty, _| matches!(ty, FieldType::Time),
        build: |_, _| Synthesizer::Time,
    },
    Rule {
        name: "duration",
        matches: |ty, _| matches!(ty, FieldType::Duration),
        build: |_, _| Synthesizer::Duration,
    },
    Rule {
        name: "uuid",
        matches: |ty, _| matches!(ty, FieldType::Uuid),
        build: |_, _| Synthesizer::Uuid,
    },
    Rule {
        name: "file_path",
        matches: |ty, _| matches!(ty, FieldType::FilePath { .. }),
        build: |_, c| Synthesizer::FilePath {
            min_length: c.min_length_or(1),
            max_length: c.max_length.unwrap_or(DEFAULT_FILE_LENGTH as usize),
        },
    },
    // Regex-aware generation is not supported: plain strings are drawn and
    // the pool builder keeps the ones that match.
    Rule {
        name: "regex",
        matches: |_, v| has_validator(v, |v| matches!(v, Validator::Regex { .. })),
        build: |_, c| Synthesizer::String {
            min_length: c.min_length_or(0),
            max_length: c.max_length.unwrap_or(DEFAULT_FILE_LENGTH as usize),
        },
    },
    Rule {
        name: "char",
        matches: |ty, _| matches!(ty, FieldType::Char { .. }),
        build: |_, c| Synthesizer::String {
            min_length: c.min_length_or(0),
            max_length: c.max_length.unwrap_or(DEFAULT_FILE_LENGTH as usize),
        },
    },
    Rule {
        name: "image",
        matches: |ty, _| matches!(ty, FieldType::Image),
        build: |_, c| Synthesizer::Image {
            max_length: c.max_length.unwrap_or(DEFAULT_FILE_LENGTH as usize),
        },
    },
    Rule {
        name: "file",
        matches: |ty, _| matches!(ty, FieldType::File { .. }),
        build: |_, c| Synthesizer::File {
            max_length: c.max_length.unwrap_or(DEFAULT_FILE_LENGTH as usize),
            extensions: c.extensions.clone(),
        },
    },
    Rule {
        name: "json",
        matches: |ty, _| matches!(ty, FieldType::Json),
        build: |_, _| Synthesizer::Json,
    },
];

/// Classify a field.
///
/// Returns `None` for relational fields, whose values come from existing
/// rows rather than from a synthesizer.
pub fn classify(field: &FieldDescriptor) -> Option<Classification> {
    let field_type = field.field_type.as_ref()?;
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(field_type, &field.validators))?;
    let constraints = FieldConstraints::extract(field);
    let synthesizer = (rule.build)(field_type, &constraints);

    if rule.name == "regex" {
        debug!(
            "Field '{}' has a regex validator; drawing plain strings and filtering",
            field.name
        );
    }
    Some(Classification {
        rule: rule.name,
        synthesizer,
    })
}
