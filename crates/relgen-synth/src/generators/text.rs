//! Text value generators.
//!
//! Sentences are composed of dictionary words joined by separators and end
//! exactly at the requested length: when the remaining room is too small for
//! a word, raw lowercase letters fill it.

use crate::context::SynthContext;
use crate::error::{Result, SynthError};
use crate::words::MAX_WORD_LENGTH;
use rand::seq::IndexedRandom;
use rand::Rng;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Default bound for unbounded text fields.
pub const DEFAULT_TEXT_LENGTH: usize = 1000;

/// Characters a random string may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClasses {
    /// Lowercase ASCII letters
    pub lower: bool,
    /// Uppercase ASCII letters
    pub upper: bool,
    /// ASCII digits
    pub digits: bool,
    /// Extra characters
    pub special: String,
}

impl CharClasses {
    /// Letters, digits and ASCII punctuation.
    pub fn all() -> Self {
        Self {
            lower: true,
            upper: true,
            digits: true,
            special: PUNCTUATION.to_string(),
        }
    }

    /// Letters, digits, underscore and hyphen.
    pub fn slug() -> Self {
        Self {
            special: "_-".to_string(),
            ..Self::all()
        }
    }

    fn alphabet(&self) -> Vec<char> {
        let mut chars = Vec::new();
        if self.lower {
            chars.extend(LOWERCASE.chars());
        }
        if self.upper {
            chars.extend(UPPERCASE.chars());
        }
        if self.digits {
            chars.extend(DIGITS.chars());
        }
        chars.extend(self.special.chars());
        chars
    }
}

impl Default for CharClasses {
    fn default() -> Self {
        Self::all()
    }
}

fn check_lengths(kind: &str, min_length: usize, max_length: usize) -> Result<()> {
    if min_length > max_length {
        return Err(SynthError::inconsistent(format!(
            "{kind} minimum length {min_length} exceeds maximum length {max_length}"
        )));
    }
    Ok(())
}

fn random_char<R: Rng + ?Sized>(rng: &mut R, alphabet: &str) -> char {
    let idx = rng.random_range(0..alphabet.len());
    char::from(alphabet.as_bytes()[idx])
}

/// Generate a string of random characters from the given classes.
pub fn generate_string<R: Rng + ?Sized>(
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    classes: &CharClasses,
) -> Result<String> {
    check_lengths("string", min_length, max_length)?;
    let alphabet = classes.alphabet();
    if alphabet.is_empty() && max_length > 0 {
        return Err(SynthError::inconsistent("string alphabet is empty"));
    }
    let length = rng.random_range(min_length..=max_length);
    Ok((0..length)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect())
}

/// Generate a sentence of exactly `length` characters.
///
/// Words are separated by one character picked from `separators` and the
/// sentence is terminated by one character picked from `endchars` (nothing if
/// empty). The terminator counts towards the length.
pub fn generate_sentence<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    length: usize,
    separators: &str,
    endchars: &str,
) -> String {
    let end = if endchars.is_empty() || length == 0 {
        String::new()
    } else {
        random_char(rng, endchars).to_string()
    };
    let length = length - end.len();
    let sep_len = usize::from(!separators.is_empty());

    let mut res = String::with_capacity(length + 1);
    loop {
        let gap = if res.is_empty() { 0 } else { sep_len };
        if res.len() + gap >= length {
            break;
        }
        let max_word_len = length - res.len() - gap;
        if gap > 0 {
            res.push(random_char(rng, separators));
        }
        if max_word_len <= 2 {
            for _ in 0..max_word_len {
                res.push(random_char(rng, LOWERCASE));
            }
            break;
        }
        let word_len = rng.random_range(3..=max_word_len.min(MAX_WORD_LENGTH));
        res.push_str(ctx.dictionary().word(rng, word_len));
    }
    while res.len() < length {
        res.push(random_char(rng, LOWERCASE));
    }
    res.truncate(length);
    res.push_str(&end);
    res
}

/// Generate free text made of sentences joined by `sep`.
///
/// The result is between `min_length` and `max_length` characters long
/// (`max_length` defaults to 1000).
pub fn generate_text<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    max_length: Option<usize>,
    min_length: usize,
    sep: &str,
) -> Result<String> {
    let max_length = max_length.unwrap_or(DEFAULT_TEXT_LENGTH);
    check_lengths("text", min_length, max_length)?;
    if max_length <= 8 {
        let length = rng.random_range(min_length.max(1).min(max_length)..=max_length);
        return Ok(generate_sentence(ctx, rng, length, " ", "."));
    }

    let sentences = rng.random_range(1..=(max_length / (40 + sep.len())).max(1));
    let mut lengths: Vec<usize> = (0..sentences)
        .map(|_| rng.random_range(5..=max_length.min(40)))
        .collect();
    let total = lengths.iter().sum::<usize>() + (lengths.len() - 1) * sep.len();
    if total < min_length {
        if let Some(last) = lengths.last_mut() {
            *last += min_length - total;
        }
    }

    let res: Vec<String> = lengths
        .into_iter()
        .map(|length| generate_sentence(ctx, rng, length, " ", "."))
        .collect();
    Ok(res.join(sep))
}

/// Lowercase, drop everything but letters, digits, underscores, hyphens and
/// whitespace, then collapse whitespace and hyphen runs into single hyphens.
pub fn slugify(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !res.is_empty() {
                res.push('-');
            }
            pending_dash = false;
            res.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }
    res.trim_matches(|c: char| c == '-' || c == '_').to_string()
}

/// Generate a slug of letters, digits, underscores and hyphens.
pub fn generate_slug<R: Rng + ?Sized>(
    rng: &mut R,
    min_length: usize,
    max_length: usize,
) -> Result<String> {
    generate_string(rng, min_length.max(1), max_length, &CharClasses::slug())
}

/// Generate a list of integers joined by `sep`, exactly filling a random
/// length between `min_length` and `max_length`.
pub fn generate_integer_list<R: Rng + ?Sized>(
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    sep: char,
    allow_negative: bool,
) -> Result<String> {
    check_lengths("integer list", min_length.max(1), max_length)?;
    let length = rng.random_range(min_length.max(1)..=max_length);

    let mut res = String::with_capacity(length);
    while res.len() + 8 <= length {
        if !res.is_empty() {
            res.push(sep);
        }
        let number: i64 = if !allow_negative || rng.random_bool(0.5) {
            rng.random_range(0..=999_999)
        } else {
            rng.random_range(-999_999..=0)
        };
        res.push_str(&number.to_string());
    }

    match length - res.len() {
        0 => {}
        1 => res.push(random_char(rng, DIGITS)),
        _ => {
            if !res.is_empty() {
                res.push(sep);
            }
            let mut rem = (length - res.len()) as u32;
            if rem > 1 && allow_negative && rng.random_bool(0.5) {
                rem -= 1;
                res.push('-');
            }
            let number: u64 = if rem == 1 {
                rng.random_range(0..10)
            } else {
                rng.random_range(10u64.pow(rem - 1)..10u64.pow(rem))
            };
            res.push_str(&number.to_string());
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Dictionary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx() -> SynthContext {
        SynthContext::with_dictionary(Dictionary::builtin())
    }

    #[test]
    fn test_generate_string_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let classes = CharClasses {
            lower: true,
            upper: false,
            digits: false,
            special: String::new(),
        };
        for _ in 0..100 {
            let s = generate_string(&mut rng, 3, 10, &classes).unwrap();
            assert!((3..=10).contains(&s.len()));
            assert!(s.chars().all(|c| c.is_ascii_lowercase()));
        }
        assert!(generate_string(&mut rng, 5, 4, &classes).is_err());
    }

    #[test]
    fn test_generate_sentence_exact_length() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        for length in 0..80 {
            let sentence = generate_sentence(&ctx, &mut rng, length, " ", ".");
            assert_eq!(sentence.len(), length, "{sentence:?}");
            if length > 0 {
                assert!(sentence.ends_with('.'));
            }
        }
    }

    #[test]
    fn test_generate_sentence_without_end_or_separator() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let sentence = generate_sentence(&ctx, &mut rng, 20, "", "");
        assert_eq!(sentence.len(), 20);
        assert!(sentence.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_generate_text_bounds() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        for max in [1, 5, 8, 9, 40, 81, 200, 1000] {
            for _ in 0..20 {
                let text = generate_text(&ctx, &mut rng, Some(max), 0, " ").unwrap();
                assert!(text.len() <= max, "{} > {max}", text.len());
                assert!(!text.is_empty());
            }
        }
    }

    #[test]
    fn test_generate_text_min_length() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let text = generate_text(&ctx, &mut rng, Some(500), 300, "").unwrap();
            assert!((300..=500).contains(&text.len()), "{}", text.len());
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World."), "hello-world");
        assert_eq!(slugify("  multiple   spaces -- here "), "multiple-spaces-here");
        assert_eq!(slugify("keep_under_scores"), "keep_under_scores");
        assert_eq!(slugify("Ünïcode ok"), "ünïcode-ok");
        assert_eq!(slugify("..."), "");
    }

    #[test]
    fn test_generate_integer_list() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let list = generate_integer_list(&mut rng, 1, 40, ',', false).unwrap();
            assert!(!list.is_empty() && list.len() <= 40);
            assert!(list
                .split(',')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())));
        }
    }

    #[test]
    fn test_generate_integer_list_negative() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_negative = false;
        for _ in 0..200 {
            let list = generate_integer_list(&mut rng, 20, 30, ',', true).unwrap();
            assert!((20..=30).contains(&list.len()));
            for part in list.split(',') {
                assert!(part.parse::<i64>().is_ok(), "{part:?} in {list:?}");
                saw_negative |= part.starts_with('-');
            }
        }
        assert!(saw_negative);
    }

    #[test]
    fn test_generate_slug() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let slug = generate_slug(&mut rng, 0, 50).unwrap();
            assert!((1..=50).contains(&slug.len()));
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }
}
