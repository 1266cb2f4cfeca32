//! Date, time and duration generators.
//!
//! Timestamps are drawn backwards from the context's pinned "now" with the
//! same log-scale bias as integers: recent instants are far more likely than
//! ones three years back.

use crate::context::SynthContext;
use crate::generators::numeric::generate_positive_log;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use std::time::Duration;

/// How far back generated timestamps reach, in seconds.
pub const LOOKBACK_SECS: i64 = 3600 * 24 * 365 * 3;

/// Generate a timestamp at most three years before the context's now.
pub fn generate_date_time<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> DateTime<Utc> {
    let delta = generate_positive_log(rng, i128::from(LOOKBACK_SECS)) as i64;
    ctx.now() - ChronoDuration::seconds(delta)
}

/// Generate a date.
pub fn generate_date<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> NaiveDate {
    generate_date_time(ctx, rng).date_naive()
}

/// Generate a time of day.
pub fn generate_time<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> NaiveTime {
    generate_date_time(ctx, rng).time()
}

/// Generate the span between two generated timestamps.
pub fn generate_duration<R: Rng + ?Sized>(ctx: &SynthContext, rng: &mut R) -> Duration {
    let first = generate_date_time(ctx, rng);
    let second = generate_date_time(ctx, rng);
    (first - second).abs().to_std().unwrap_or_default()
}

/// Generate a random timestamp in the given range (inclusive).
pub fn generate_timestamp_range<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let start_ts = start.timestamp();
    let end_ts = end.timestamp();
    if start_ts >= end_ts {
        return start;
    }
    let random_ts = rng.random_range(start_ts..=end_ts);
    DateTime::from_timestamp(random_ts, 0).unwrap_or(start)
}

/// Parse a timestamp string in various formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Dictionary;
    use chrono::{Datelike, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx() -> SynthContext {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        SynthContext::with_dictionary(Dictionary::builtin()).with_now(now)
    }

    #[test]
    fn test_generate_date_time_within_lookback() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let earliest = ctx.now() - ChronoDuration::seconds(LOOKBACK_SECS);
        for _ in 0..1000 {
            let dt = generate_date_time(&ctx, &mut rng);
            assert!(dt <= ctx.now() && dt >= earliest, "{dt}");
        }
    }

    #[test]
    fn test_generate_date_and_time() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        let date = generate_date(&ctx, &mut rng);
        assert!((2021..=2024).contains(&date.year()));
        let _ = generate_time(&ctx, &mut rng);
    }

    #[test]
    fn test_generate_duration_bounded() {
        let ctx = ctx();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let duration = generate_duration(&ctx, &mut rng);
            assert!(duration.as_secs() <= LOOKBACK_SECS as u64);
        }
    }

    #[test]
    fn test_generate_timestamp_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = parse_timestamp("2020-01-01T00:00:00Z").unwrap();
        let end = parse_timestamp("2024-12-31T23:59:59Z").unwrap();

        for _ in 0..100 {
            let dt = generate_timestamp_range(&mut rng, start, end);
            assert!(dt.year() >= 2020 && dt.year() <= 2024);
        }
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2020-01-01").is_some());
        assert!(parse_timestamp("2020-01-01T10:00:00+02:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_deterministic_generation() {
        let ctx = ctx();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(
            generate_date_time(&ctx, &mut rng1),
            generate_date_time(&ctx, &mut rng2)
        );
    }
}
