//! File name, file path and file payload generators.

use crate::context::SynthContext;
use crate::error::{Result, SynthError};
use crate::generators::png::{generate_png, DEFAULT_IMAGE_SIDE};
use crate::generators::text::{generate_sentence, generate_text};
use rand::seq::IndexedRandom;
use rand::Rng;
use relgen_core::FilePayload;

/// Longest generated file name.
pub const MAX_FILE_NAME_LENGTH: usize = 15;

/// Generate a file name of words joined by `-` or `_`, ending with one of
/// `extensions` (which include their leading dot).
pub fn generate_file_name<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    extensions: &[String],
) -> Result<String> {
    let extension = extensions.choose(rng).map(String::as_str).unwrap_or("");
    let lo = min_length.saturating_sub(extension.len()).max(1);
    let hi = max_length.saturating_sub(extension.len());
    if lo > hi {
        return Err(SynthError::inconsistent(format!(
            "no room for a file name between {min_length} and {max_length} characters \
             with extension '{extension}'"
        )));
    }
    let length = rng.random_range(lo..=hi);
    let stem = generate_sentence(ctx, rng, length, "-_", "");
    Ok(format!("{stem}{extension}"))
}

/// Generate a relative path of lowercase words separated by `/`.
pub fn generate_file_path<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    min_length: usize,
    max_length: usize,
) -> Result<String> {
    let lo = min_length.max(1);
    if lo > max_length {
        return Err(SynthError::inconsistent(format!(
            "file path minimum length {lo} exceeds maximum length {max_length}"
        )));
    }
    let length = rng.random_range(lo..=max_length.min(lo.max(60)));
    Ok(generate_sentence(ctx, rng, length, "/", "").to_lowercase())
}

fn normalize_extensions(extensions: &[String], default: &str) -> Vec<String> {
    if extensions.is_empty() {
        return vec![default.to_string()];
    }
    extensions
        .iter()
        .map(|ext| format!(".{}", ext.trim_start_matches('.')))
        .collect()
}

/// Generate a text file.
///
/// The name is at most `max_name_length` characters long and ends with one
/// of `extensions` (`.txt` when none are given).
pub fn generate_text_file<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    max_name_length: usize,
    extensions: &[String],
) -> Result<FilePayload> {
    let extensions = normalize_extensions(extensions, ".txt");
    let name = generate_file_name(
        ctx,
        rng,
        6,
        max_name_length.min(MAX_FILE_NAME_LENGTH),
        &extensions,
    )?;
    let content = generate_text(ctx, rng, Some(max_name_length.max(1)), 0, " ")?;
    Ok(FilePayload {
        name,
        content: content.into_bytes(),
    })
}

/// Generate a PNG image file.
pub fn generate_image_file<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    max_name_length: usize,
) -> Result<FilePayload> {
    let name = generate_file_name(
        ctx,
        rng,
        6,
        max_name_length.min(MAX_FILE_NAME_LENGTH),
        &[".png".to_string()],
    )?;
    let content = generate_png(rng, DEFAULT_IMAGE_SIDE, DEFAULT_IMAGE_SIDE)?;
    Ok(FilePayload { name, content })
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
    fn test_generate_file_name() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let extensions = vec![".csv".to_string(), ".json".to_string()];
        for _ in 0..100 {
            let name = generate_file_name(&ctx, &mut rng, 6, 15, &extensions).unwrap();
            assert!((6..=15).contains(&name.len()), "{name}");
            assert!(name.ends_with(".csv") || name.ends_with(".json"));
        }
        assert!(generate_file_name(&ctx, &mut rng, 1, 4, &extensions).is_err());
    }

    #[test]
    fn test_generate_file_path() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let path = generate_file_path(&ctx, &mut rng, 1, 100).unwrap();
            assert!(!path.is_empty() && path.len() <= 100);
            assert!(!path.starts_with('/'));
        }
    }

    #[test]
    fn test_generate_text_file_extension() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let file = generate_text_file(&ctx, &mut rng, 100, &["md".to_string()]).unwrap();
        assert!(file.name.ends_with(".md"));
        assert!(!file.content.is_empty());

        let file = generate_text_file(&ctx, &mut rng, 100, &[]).unwrap();
        assert!(file.name.ends_with(".txt"));
    }

    #[test]
    fn test_generate_image_file() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let file = generate_image_file(&ctx, &mut rng, 100).unwrap();
        assert!(file.name.ends_with(".png"));
        assert!(file.content.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
