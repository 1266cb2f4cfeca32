//! Word dictionary backing sentence synthesis.
//!
//! Words are bucketed by length (3 to 7 characters). The dictionary is read
//! from the system word list when one is installed, otherwise a built-in list
//! is used.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Shortest word length kept in the dictionary.
pub const MIN_WORD_LENGTH: usize = 3;
/// Longest word length kept in the dictionary.
pub const MAX_WORD_LENGTH: usize = 7;

const SYSTEM_WORD_LISTS: [&str; 2] = ["/usr/share/dict/words", "/usr/dict/words"];

const BUILTIN_WORDS: [&str; 164] = [
    "Aerope", "scowder", "towmast", "amla", "choaty", "Sosia", "pagus", "gasper", "mongery",
    "pewing", "chinkle", "knyazi", "darg", "pomfret", "inure", "reactor", "phulwa", "coseat",
    "allege", "attire", "hardish", "expel", "bounder", "side", "amidin", "fogdom", "chiefly",
    "pontage", "valved", "bib", "postil", "hominal", "basidia", "bobfly", "barring", "retral",
    "Laurus", "unbosom", "cooncan", "Ophitic", "lampers", "togate", "doltish", "awiggle",
    "Scilla", "lumbago", "mirrory", "alkamin", "tambour", "Paulus", "Succisa", "Grewia",
    "concha", "ripup", "alloxan", "eelfish", "skookum", "twee", "clubbed", "tow", "khoja",
    "glazing", "mulish", "egilops", "phallin", "Kubanka", "Kiowan", "becovet", "Janus",
    "incuse", "adonite", "mopus", "baybush", "proddle", "chol", "Lolium", "dull", "dixie",
    "becuna", "brother", "remould", "danger", "prancy", "collie", "Alumel", "admi", "knockup",
    "warsaw", "clue", "bail", "visaged", "begowk", "smiter", "cityish", "goli", "pokeout",
    "Jambos", "Dione", "Sabuja", "darter", "wasty", "insurge", "outre", "surmise", "Aniba",
    "unsoled", "grouper", "sell", "kickish", "pawkily", "cytost", "seraw", "kanat", "relish",
    "pegbox", "Sindhi", "Pravin", "duet", "uncost", "swungen", "hitchy", "nidana", "look",
    "Danny", "canhoop", "enhusk", "ferrado", "James", "zaptieh", "deva", "gaduin", "sneezer",
    "smout", "clapnet", "atter", "thermit", "Darin", "reif", "Fidac", "torpent", "Alawi",
    "prig", "uranous", "stenog", "datch", "rewet", "resaw", "cleg", "marcher", "suimate",
    "writhen", "ovology", "upwound", "myron", "Picus", "oration", "protium", "ambrite",
    "inflate", "townee", "octuple", "Delbert", "mix", "Antonia",
];

/// Length-bucketed word list.
#[derive(Debug, Clone)]
pub struct Dictionary {
    buckets: BTreeMap<usize, Vec<String>>,
}

impl Dictionary {
    /// Load the system word list, falling back to the built-in list.
    pub fn load() -> Self {
        for path in SYSTEM_WORD_LISTS {
            if let Some(dictionary) = Self::from_path(path) {
                debug!(path, words = dictionary.len(), "Loaded system word list");
                return dictionary;
            }
        }
        debug!("No usable system word list, using built-in words");
        Self::builtin()
    }

    /// Dictionary made of the built-in words only.
    pub fn builtin() -> Self {
        Self {
            buckets: bucketize(BUILTIN_WORDS.iter().copied()),
        }
    }

    /// Read a newline separated word list.
    ///
    /// Returns `None` when the file cannot be read or lacks words of some
    /// bucketed length.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        Self::from_words(content.lines())
    }

    /// Bucket the usable words of an iterator.
    ///
    /// Only ASCII alphabetic words of 3 to 7 characters are kept, so that
    /// byte and character lengths agree. Returns `None` if a bucket is empty.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let buckets = bucketize(words);
        if buckets.values().any(Vec::is_empty) {
            return None;
        }
        Some(Self { buckets })
    }

    /// Total number of words.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Words of exactly `length` characters.
    pub fn bucket(&self, length: usize) -> &[String] {
        self.buckets.get(&length).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Random word of exactly `length` characters.
    ///
    /// The length is clamped into the bucketed range.
    pub fn word<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> &str {
        let length = length.clamp(MIN_WORD_LENGTH, MAX_WORD_LENGTH);
        self.bucket(length)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("word")
    }

    /// Random word of random bucketed length.
    pub fn any_word<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let length = rng.random_range(MIN_WORD_LENGTH..=MAX_WORD_LENGTH);
        self.word(rng, length)
    }
}

fn bucketize<'a>(words: impl IntoIterator<Item = &'a str>) -> BTreeMap<usize, Vec<String>> {
    let mut buckets: BTreeMap<usize, Vec<String>> = (MIN_WORD_LENGTH..=MAX_WORD_LENGTH)
        .map(|len| (len, Vec::new()))
        .collect();
    for word in words {
        let word = word.trim();
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&word.len()) {
            bucket.push(word.to_string());
        }
    }
    buckets
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_covers_every_bucket() {
        let dictionary = Dictionary::builtin();
        for len in MIN_WORD_LENGTH..=MAX_WORD_LENGTH {
            assert!(!dictionary.bucket(len).is_empty(), "bucket {len} is empty");
            assert!(dictionary.bucket(len).iter().all(|w| w.len() == len));
        }
        assert_eq!(dictionary.len(), BUILTIN_WORDS.len());
    }

    #[test]
    fn test_from_words_filters_unusable_entries() {
        let words = ["cat", "dogs", "it's", "horse", "animal", "giraffe", "hippopotamus", "é"];
        let dictionary = Dictionary::from_words(words).unwrap();
        assert_eq!(dictionary.len(), 5);
        assert!(dictionary.bucket(3).contains(&"cat".to_string()));
    }

    #[test]
    fn test_from_words_requires_every_bucket() {
        assert!(Dictionary::from_words(["cat", "dogs"]).is_none());
    }

    #[test]
    fn test_word_length() {
        let dictionary = Dictionary::builtin();
        let mut rng = StdRng::seed_from_u64(42);
        for len in 0..10 {
            let word = dictionary.word(&mut rng, len);
            assert_eq!(word.len(), len.clamp(MIN_WORD_LENGTH, MAX_WORD_LENGTH));
        }
    }
}
