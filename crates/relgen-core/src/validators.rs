//! Field validators.
//!
//! Validators carry both a predicate and the metadata the classifier reads to
//! pick a synthesizer and its bounds (allowed domains, schemes, length and
//! value limits, decimal precision, file extensions).
//!
//! # YAML Format
//!
//! ```yaml
//! validators:
//!   - type: email
//!     allowlist: [example.com]
//!   - type: min_value
//!     limit: 10
//!   - type: regex
//!     pattern: "^[A-Z]{3}$"
//! ```

use crate::values::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock, OnceLock};

/// Schemes accepted by a URL validator that declares none.
pub const DEFAULT_URL_SCHEMES: [&str; 4] = ["https", "http", "ftp", "ftps"];

static EMAIL_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+)*$")
        .expect("valid email user regex")
});

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}\.?$")
        .expect("valid domain regex")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<scheme>[a-z][a-z0-9.+-]*)://(?:[^\s:@/]+(?::[^\s:@/]*)?@)?(?P<host>localhost|(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\.?|\d{1,3}(?:\.\d{1,3}){3}|\[[0-9a-f:.]+\])(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .expect("valid url regex")
});

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

static INT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:,\d+)*$").expect("valid int list regex"));

static SIGNED_INT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:,-?\d+)*$").expect("valid int list regex"));

/// Named predicate registered programmatically.
#[derive(Clone)]
pub struct CustomValidator {
    /// Name reported in logs
    pub name: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl CustomValidator {
    /// Create a named validator from a predicate.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Run the predicate.
    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Validator attached to a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    /// Email address, optionally accepting extra domains verbatim
    Email {
        /// Domains accepted even if they are not fully qualified
        #[serde(default)]
        allowlist: Vec<String>,
    },

    /// URL with one of the given schemes
    Url {
        /// Accepted schemes (defaults to https, http, ftp, ftps)
        #[serde(default)]
        schemes: Option<Vec<String>>,
    },

    /// IPv4 address
    Ipv4,

    /// IPv6 address
    Ipv6,

    /// IPv4 or IPv6 address
    Ipv46,

    /// Letters, digits, underscores and hyphens
    Slug,

    /// Comma separated integers
    IntList {
        /// Accept negative members
        #[serde(default)]
        allow_negative: bool,
    },

    /// Text matching a regular expression
    Regex {
        /// Pattern searched in the value
        pattern: String,
        /// Accept values that do NOT match instead
        #[serde(default)]
        inverse_match: bool,
        #[serde(skip)]
        compiled: OnceLock<Result<Regex, regex::Error>>,
    },

    /// Minimum length in characters (or bytes for binary)
    MinLength {
        /// Inclusive limit
        limit: usize,
    },

    /// Maximum length in characters (or bytes for binary)
    MaxLength {
        /// Inclusive limit
        limit: usize,
    },

    /// Minimum numeric value
    MinValue {
        /// Inclusive limit
        limit: i64,
    },

    /// Maximum numeric value
    MaxValue {
        /// Inclusive limit
        limit: i64,
    },

    /// Numeric value must be a multiple of `step`
    StepValue {
        /// Step size
        step: i64,
    },

    /// Decimal precision
    Decimal {
        /// Maximum total number of digits
        max_digits: u8,
        /// Maximum digits after the decimal point
        decimal_places: u8,
    },

    /// File name extension
    FileExtension {
        /// Accepted extensions without the leading dot
        allowed: Vec<String>,
    },

    /// Programmatic predicate (never serialized)
    #[serde(skip)]
    Custom(CustomValidator),
}

impl Validator {
    /// Create a regex validator.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            inverse_match: false,
            compiled: OnceLock::new(),
        }
    }

    /// Create a programmatic validator.
    pub fn custom(
        name: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(CustomValidator::new(name, check))
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Email { .. } => "email",
            Self::Url { .. } => "url",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Ipv46 => "ipv46",
            Self::Slug => "slug",
            Self::IntList { .. } => "int_list",
            Self::Regex { .. } => "regex",
            Self::MinLength { .. } => "min_length",
            Self::MaxLength { .. } => "max_length",
            Self::MinValue { .. } => "min_value",
            Self::MaxValue { .. } => "max_value",
            Self::StepValue { .. } => "step_value",
            Self::Decimal { .. } => "decimal",
            Self::FileExtension { .. } => "file_extension",
            Self::Custom(custom) => &custom.name,
        }
    }

    /// Compiled pattern of a regex validator.
    ///
    /// Returns the compile error for a malformed pattern so schema loading can
    /// reject it; `Ok(None)` for every other validator.
    pub fn compiled_regex(&self) -> Result<Option<&Regex>, regex::Error> {
        match self {
            Self::Regex {
                pattern, compiled, ..
            } => compiled
                .get_or_init(|| Regex::new(pattern))
                .as_ref()
                .map(Some)
                .map_err(Clone::clone),
            _ => Ok(None),
        }
    }

    /// Check a value against this validator.
    ///
    /// Null always passes: nullability is enforced by the store, not by
    /// validators. A value of a kind the validator does not understand fails.
    pub fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }

        match self {
            Self::Email { allowlist } => value
                .as_str()
                .is_some_and(|text| is_valid_email(text, allowlist)),
            Self::Url { schemes } => value.as_str().is_some_and(|text| {
                let schemes: Vec<&str> = match schemes {
                    Some(schemes) => schemes.iter().map(String::as_str).collect(),
                    None => DEFAULT_URL_SCHEMES.to_vec(),
                };
                is_valid_url(text, &schemes)
            }),
            Self::Ipv4 => value
                .as_str()
                .is_some_and(|text| text.parse::<Ipv4Addr>().is_ok()),
            Self::Ipv6 => value
                .as_str()
                .is_some_and(|text| text.parse::<Ipv6Addr>().is_ok()),
            Self::Ipv46 => value.as_str().is_some_and(|text| {
                text.parse::<Ipv4Addr>().is_ok() || text.parse::<Ipv6Addr>().is_ok()
            }),
            Self::Slug => value.as_str().is_some_and(|text| SLUG.is_match(text)),
            Self::IntList { allow_negative } => value.as_str().is_some_and(|text| {
                if *allow_negative {
                    SIGNED_INT_LIST.is_match(text)
                } else {
                    INT_LIST.is_match(text)
                }
            }),
            Self::Regex { inverse_match, .. } => {
                let Some(text) = value.as_str() else {
                    return false;
                };
                match self.compiled_regex() {
                    Ok(Some(re)) => re.is_match(text) != *inverse_match,
                    _ => false,
                }
            }
            Self::MinLength { limit } => value.length().is_some_and(|len| len >= *limit),
            Self::MaxLength { limit } => value.length().is_some_and(|len| len <= *limit),
            Self::MinValue { limit } => value.as_f64().is_some_and(|x| x >= *limit as f64),
            Self::MaxValue { limit } => value.as_f64().is_some_and(|x| x <= *limit as f64),
            Self::StepValue { step } => {
                if *step == 0 {
                    return false;
                }
                match value {
                    Value::Int(i) => i % step == 0,
                    Value::Float(_) | Value::Decimal(_) => value
                        .as_f64()
                        .is_some_and(|x| (x / *step as f64).fract() == 0.0),
                    _ => false,
                }
            }
            Self::Decimal {
                max_digits,
                decimal_places,
            } => value
                .as_decimal()
                .is_some_and(|d| decimal_fits(d, *max_digits, *decimal_places)),
            Self::FileExtension { allowed } => value.as_str().is_some_and(|name| {
                let Some((_, ext)) = name.rsplit_once('.') else {
                    return false;
                };
                allowed
                    .iter()
                    .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
            }),
            Self::Custom(custom) => custom.check(value),
        }
    }
}

/// Run every validator; true when all pass.
pub fn validate_all(validators: &[Validator], value: &Value) -> bool {
    validators.iter().all(|validator| validator.validate(value))
}

fn is_valid_email(text: &str, allowlist: &[String]) -> bool {
    let Some((user, domain)) = text.rsplit_once('@') else {
        return false;
    };
    if user.is_empty() || text.len() > 320 || !EMAIL_USER.is_match(user) {
        return false;
    }
    allowlist.iter().any(|allowed| allowed == domain) || DOMAIN.is_match(domain)
}

fn is_valid_url(text: &str, schemes: &[&str]) -> bool {
    if text.len() > 2048 {
        return false;
    }
    let Some(captures) = URL.captures(text) else {
        return false;
    };
    captures.name("scheme").is_some_and(|scheme| {
        schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme.as_str()))
    })
}

/// Check total and fractional digit counts of a decimal.
pub fn decimal_fits(value: &rust_decimal::Decimal, max_digits: u8, decimal_places: u8) -> bool {
    let normalized = value.normalize();
    let scale = normalized.scale();
    let mantissa = normalized.mantissa().unsigned_abs();
    let digits = if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    };
    // Leading "0." of a pure fraction does not count as an integer digit
    let whole_digits = digits.saturating_sub(scale);
    let total = whole_digits + scale;
    scale <= u32::from(decimal_places)
        && total <= u32::from(max_digits)
        && whole_digits <= u32::from(max_digits.saturating_sub(decimal_places))
}
