//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - position of the value in the generated sequence
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number
//! - `{word}` - random dictionary word

use crate::context::SynthContext;
use crate::error::{Result, SynthError};
use crate::generators::uuid::generate_uuid_v4;
use rand::Rng;

/// One piece of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Index,
    Uuid,
    Word,
    Digits(usize),
}

/// A pattern parsed once and rendered many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    parts: Vec<Part>,
}

impl Pattern {
    /// Parse a pattern, rejecting unknown or unterminated placeholders.
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut rest = pattern;
        while let Some(start) = rest.find('{') {
            if start > 0 {
                parts.push(Part::Literal(rest[..start].to_string()));
            }
            let end = rest[start..].find('}').ok_or_else(|| {
                SynthError::invalid_override(
                    "pattern",
                    format!("unterminated placeholder in '{pattern}'"),
                )
            })? + start;
            let name = &rest[start + 1..end];
            let part = match name {
                "index" => Part::Index,
                "uuid" => Part::Uuid,
                "word" => Part::Word,
                _ => match name.strip_prefix("rand:").map(str::parse::<usize>) {
                    Some(Ok(digits)) => Part::Digits(digits),
                    _ => {
                        return Err(SynthError::invalid_override(
                            "pattern",
                            format!("unknown placeholder '{{{name}}}' in '{pattern}'"),
                        ))
                    }
                },
            };
            parts.push(part);
            rest = &rest[end + 1..];
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }
        Ok(Self { parts })
    }

    /// Render the pattern for the value at `index`.
    pub fn render<R: Rng + ?Sized>(&self, ctx: &SynthContext, rng: &mut R, index: u64) -> String {
        let mut result = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => result.push_str(text),
                Part::Index => result.push_str(&index.to_string()),
                Part::Uuid => result.push_str(&generate_uuid_v4(rng).to_string()),
                Part::Word => result.push_str(ctx.dictionary().any_word(rng)),
                Part::Digits(digits) => result.push_str(&generate_random_digits(rng, *digits)),
            }
        }
        result
    }
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng + ?Sized>(rng: &mut R, digits: usize) -> String {
    let mut result = String::with_capacity(digits);
    for idx in 0..digits {
        // No leading zero
        let lowest = if idx == 0 { 1 } else { 0 };
        let digit = rng.random_range(lowest..10u8);
        result.push(char::from(b'0' + digit));
    }
    result
}
