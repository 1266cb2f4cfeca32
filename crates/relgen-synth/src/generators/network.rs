//! Network-flavored text generators: IP addresses, domains, emails and URLs.

use crate::context::SynthContext;
use crate::error::{Result, SynthError};
use crate::generators::text::{generate_sentence, generate_text, slugify};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Shortest email the generator can compose.
pub const MIN_EMAIL_LENGTH: usize = 14;
/// Shortest URL the generator can compose.
pub const MIN_URL_LENGTH: usize = 16;
/// Shortest host a URL is composed with.
const MIN_DOMAIN_LENGTH: usize = 6;

const TOP_LEVEL_DOMAINS: [&str; 18] = [
    "com", "de", "it", "uk", "edu", "es", "fr", "eg", "ru", "pl", "org", "es", "pk", "jo", "fe",
    "se", "tr", "ch",
];

/// Generate an IPv4 or IPv6 address.
///
/// IPv6 groups are uppercase hexadecimal without zero compression.
pub fn generate_ip<R: Rng + ?Sized>(rng: &mut R, v4: bool, v6: bool) -> String {
    let use_v6 = match (v4, v6) {
        (true, true) => rng.random_bool(0.5),
        (false, true) => true,
        _ => false,
    };
    if use_v6 {
        (0..8)
            .map(|_| format!("{:X}", rng.random::<u16>()))
            .collect::<Vec<_>>()
            .join(":")
    } else {
        (0..4)
            .map(|_| rng.random::<u8>().to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Generate a domain name of at most `max_length` characters.
pub fn generate_domain_name<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    max_length: usize,
) -> String {
    let tld = TOP_LEVEL_DOMAINS.choose(rng).copied().unwrap_or("com");
    let room = max_length.saturating_sub(tld.len() + 1).max(2);
    let mut name = slugify(&generate_sentence(ctx, rng, room, "-", ".").to_lowercase());
    if name.is_empty() {
        name.push('x');
    }
    format!("{name}.{tld}")
}

/// Generate an email address.
///
/// The domain is drawn from `allowlist` when given, otherwise composed.
/// Fails when the bounds are below the shortest composable email or the
/// chosen domain leaves no room for a local part.
pub fn generate_email<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    allowlist: &[String],
) -> Result<String> {
    if min_length < MIN_EMAIL_LENGTH || max_length < min_length {
        return Err(SynthError::inconsistent(format!(
            "an email with the specified lengths is too short, should be \
             {MIN_EMAIL_LENGTH} <= min_length ({min_length}) <= max_length ({max_length})"
        )));
    }

    let domain = match allowlist.choose(rng) {
        Some(domain) => domain.clone(),
        None => generate_domain_name(ctx, rng, 9),
    };
    let reserved = domain.len() + 1;
    let max_local = max_length.saturating_sub(reserved);
    if max_local < 2 {
        return Err(SynthError::inconsistent(format!(
            "the domain '{domain}' leaves {max_local} characters for the local part"
        )));
    }
    let min_local = min_length.saturating_sub(reserved).clamp(2, max_local);

    let length = rng.random_range(min_local..=max_local);
    let mut local = slugify(&generate_sentence(ctx, rng, length, " ", ""));
    if local.is_empty() {
        local.push('x');
    }
    Ok(format!("{local}@{domain}"))
}

/// Generate a URL with one of the given schemes.
///
/// The URL has a composed host, optionally prefixed with `www.`, and a path
/// of slugified sentences filling the remaining length.
pub fn generate_url<R: Rng + ?Sized>(
    ctx: &SynthContext,
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    schemes: &[String],
) -> Result<String> {
    if min_length < MIN_URL_LENGTH || max_length < min_length {
        return Err(SynthError::inconsistent(format!(
            "a URL with the specified lengths is too short, should be \
             {MIN_URL_LENGTH} <= min_length ({min_length}) <= max_length ({max_length})"
        )));
    }

    let scheme = schemes.choose(rng).map(String::as_str).unwrap_or("https");
    let mut url = format!("{scheme}://");
    if max_length < url.len() + MIN_DOMAIN_LENGTH {
        return Err(SynthError::inconsistent(format!(
            "a URL with scheme '{scheme}' needs at least {} characters, max_length is {max_length}",
            url.len() + MIN_DOMAIN_LENGTH
        )));
    }

    let domain_length = rng.random_range(MIN_DOMAIN_LENGTH..=(max_length - url.len()).min(30));
    let mut domain = generate_domain_name(ctx, rng, domain_length);
    if url.len() + 4 + domain.len() < max_length && rng.random_bool(0.5) {
        domain.insert_str(0, "www.");
    }
    url.push_str(&domain);
    if url.len() >= max_length {
        return Ok(url);
    }

    let remaining = max_length - url.len();
    if remaining == 1 {
        url.push('/');
        return Ok(url);
    }
    let min_path = min_length.saturating_sub(url.len() + 1).min(remaining - 1);
    let text = generate_text(ctx, rng, Some(remaining - 1), min_path, "")?;
    let path: Vec<String> = text.split('.').map(slugify).collect();
    url.push('/');
    url.push_str(&path.join("/"));

    if url.len() < max_length && !url.ends_with('/') && rng.random_bool(0.5) {
        url.push('/');
    }
    Ok(url)
}
