// Stopword set and the vocabulary/count store.
//
// Words are kept in first-seen order so every pass over the vocabulary
// (summaries, consistency checks) is deterministic. Stopwords only get a raw
// occurrence count. Modeled words also carry a dense per-topic count vector.

use std::collections::{HashMap, HashSet};

/// Words at or below this many characters are promoted to stopwords on sight.
pub const SHORT_WORD_MAX_CHARS: usize = 2;

/// Index of a modeled (non-stopword) word in the vocabulary.
pub type WordId = usize;

/// Set of words excluded from modeling. Matching is case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(words.into_iter().map(Into::into));
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Classify a token, promoting very short words into the set first.
    pub fn classify(&mut self, word: &str) -> bool {
        if word.chars().count() <= SHORT_WORD_MAX_CHARS && !self.words.contains(word) {
            self.words.insert(word.to_string());
        }
        self.words.contains(word)
    }
}

/// Per-word statistics for a modeled word.
#[derive(Debug, Clone)]
pub struct WordEntry {
    pub word: String,
    pub total_count: usize,
    pub topic_counts: Vec<usize>,
}

/// Raw word counts plus word-topic counts for modeled words.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    num_topics: usize,
    raw_counts: HashMap<String, usize>,
    entries: Vec<WordEntry>,
    index: HashMap<String, WordId>,
}

impl Vocabulary {
    pub fn new(num_topics: usize) -> Self {
        Self {
            num_topics,
            raw_counts: HashMap::new(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Change the width of the per-topic vectors. Only valid while empty.
    pub(crate) fn set_num_topics(&mut self, num_topics: usize) {
        debug_assert!(self.entries.is_empty());
        self.num_topics = num_topics;
    }

    /// Count one stopword occurrence.
    pub fn record_stopword(&mut self, word: &str) {
        *self.raw_counts.entry(word.to_string()).or_insert(0) += 1;
    }

    /// Count one modeled occurrence of `word` under `topic`, creating the
    /// entry on first sight.
    pub fn record_word(&mut self, word: &str, topic: usize) -> WordId {
        let id = match self.index.get(word) {
            Some(&id) => id,
            None => {
                let id = self.entries.len();
                self.entries.push(WordEntry {
                    word: word.to_string(),
                    total_count: 0,
                    topic_counts: vec![0; self.num_topics],
                });
                self.index.insert(word.to_string(), id);
                id
            }
        };
        let entry = &mut self.entries[id];
        entry.total_count += 1;
        entry.topic_counts[topic] += 1;
        *self.raw_counts.entry(word.to_string()).or_insert(0) += 1;
        id
    }

    /// Number of distinct modeled words (V in the sampling formula).
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.index.get(word).copied()
    }

    pub fn entry(&self, id: WordId) -> &WordEntry {
        &self.entries[id]
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.id_of(word).map(|id| &self.entries[id])
    }

    /// All modeled words in first-seen order.
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// Raw occurrence count for any word, stopword or not.
    pub fn raw_count(&self, word: &str) -> usize {
        self.raw_counts.get(word).copied().unwrap_or(0)
    }

    pub(crate) fn topic_counts_mut(&mut self, id: WordId) -> &mut [usize] {
        &mut self.entries[id].topic_counts
    }
}
