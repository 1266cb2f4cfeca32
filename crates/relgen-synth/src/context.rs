//! Shared resources for synthesizers.

use crate::words::Dictionary;
use chrono::{DateTime, SubsecRound, Utc};

/// Immutable resources every synthesizer call reads.
///
/// Built once per generation run and passed by reference. Temporal values
/// are synthesized relative to the pinned `now`, so two runs with the same
/// seed and the same `now` produce identical data.
#[derive(Debug, Clone)]
pub struct SynthContext {
    dictionary: Dictionary,
    now: DateTime<Utc>,
}

impl SynthContext {
    /// Context with the system dictionary and the current time.
    pub fn new() -> Self {
        Self {
            dictionary: Dictionary::load(),
            now: Utc::now().trunc_subsecs(0),
        }
    }

    /// Context with the given dictionary and the current time.
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            now: Utc::now().trunc_subsecs(0),
        }
    }

    /// Pin the reference time.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Word dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Reference time for temporal values.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl Default for SynthContext {
    fn default() -> Self {
        Self::new()
    }
}
