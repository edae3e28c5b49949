// TopicModel: the state object for one LDA model.
//
// Owns the stopword set, vocabulary, documents, global per-topic totals and
// the random source. Nothing here is shared between instances, so several
// models can live side by side without interfering.
//
// Lifecycle: configure (topic count, requested sweeps) -> process_corpus once
// -> sweep repeatedly -> query summaries and correlations at any point.

use anyhow::Result;
use tracing::{debug, info};

use super::document::{split_fields, Document, Token};
use super::tokenizer::tokenize;
use super::traits::{RandomSource, StdRandom};
use super::vocabulary::{StopwordSet, Vocabulary};
use super::summary::WordCount;

/// Topic-word smoothing (beta).
pub const TOPIC_WORD_SMOOTHING: f64 = 0.01;
/// Document-topic smoothing (alpha).
pub const DOCUMENT_TOPIC_SMOOTHING: f64 = 0.1;
/// A topic must have at least this many tokens in a document to count as
/// present there for correlation analysis.
pub const CORRELATION_MIN_TOKENS: f64 = 2.0;
/// ...and at least this share of the document's tokens.
pub const CORRELATION_MIN_PROPORTION: f64 = 0.05;
pub const DEFAULT_NUM_TOPICS: usize = 10;

pub struct TopicModel {
    pub(crate) num_topics: usize,
    pub(crate) stopwords: StopwordSet,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) documents: Vec<Document>,
    pub(crate) tokens_per_topic: Vec<usize>,
    pub(crate) topic_words: Vec<Vec<WordCount>>,
    pub(crate) complete_sweeps: u64,
    pub(crate) requested_sweeps: u64,
    pub(crate) correlation_min_tokens: f64,
    pub(crate) correlation_min_proportion: f64,
    pub(crate) rng: Box<dyn RandomSource>,
    parsed: bool,
}

impl Default for TopicModel {
    fn default() -> Self {
        Self::new(Box::new(StdRandom::from_entropy()))
    }
}

impl TopicModel {
    /// Create an empty model with the default topic count.
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            num_topics: DEFAULT_NUM_TOPICS,
            stopwords: StopwordSet::new(),
            vocabulary: Vocabulary::new(DEFAULT_NUM_TOPICS),
            documents: Vec::new(),
            tokens_per_topic: vec![0; DEFAULT_NUM_TOPICS],
            topic_words: vec![Vec::new(); DEFAULT_NUM_TOPICS],
            complete_sweeps: 0,
            requested_sweeps: 0,
            correlation_min_tokens: CORRELATION_MIN_TOKENS,
            correlation_min_proportion: CORRELATION_MIN_PROPORTION,
            rng,
            parsed: false,
        }
    }

    /// Create an empty model whose sweeps replay exactly for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(StdRandom::seeded(seed)))
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Resize every per-topic structure. Only allowed before any document
    /// has been parsed; afterwards the counts would no longer line up.
    pub fn set_num_topics(&mut self, num_topics: usize) -> Result<()> {
        if num_topics == 0 {
            anyhow::bail!("Number of topics must be at least 1");
        }
        if self.parsed || !self.documents.is_empty() {
            anyhow::bail!(
                "Cannot change the number of topics from {} to {} after the corpus has been parsed",
                self.num_topics,
                num_topics
            );
        }
        self.num_topics = num_topics;
        self.vocabulary.set_num_topics(num_topics);
        self.tokens_per_topic = vec![0; num_topics];
        self.topic_words = vec![Vec::new(); num_topics];
        Ok(())
    }

    pub fn complete_sweeps(&self) -> u64 {
        self.complete_sweeps
    }

    pub fn requested_sweeps(&self) -> u64 {
        self.requested_sweeps
    }

    /// Number of sweeps after which topic word lists are re-sorted
    /// automatically. Purely advisory.
    pub fn set_requested_sweeps(&mut self, requested: u64) {
        self.requested_sweeps = requested;
    }

    /// Override the correlation presence thresholds.
    pub fn set_correlation_thresholds(&mut self, min_tokens: f64, min_proportion: f64) {
        self.correlation_min_tokens = min_tokens;
        self.correlation_min_proportion = min_proportion;
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn tokens_per_topic(&self) -> &[usize] {
        &self.tokens_per_topic
    }

    /// Add words to the stopword set. Only affects documents parsed later.
    pub fn add_stopwords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(words);
    }

    /// Build the model from a stopword list and raw corpus lines.
    ///
    /// Can only run once per model. Lines without any word tokens are
    /// dropped and don't consume an auto-assigned id.
    pub fn process_corpus<S: AsRef<str>>(&mut self, stopwords: &[S], lines: &[S]) -> Result<()> {
        if self.parsed {
            anyhow::bail!("Corpus already processed; build a new model to parse another corpus");
        }

        self.add_stopwords(stopwords.iter().map(|w| w.as_ref().to_string()));

        let mut dropped = 0usize;
        for line in lines {
            if !self.parse_line(line.as_ref()) {
                dropped += 1;
            }
        }
        self.sort_topic_words();
        self.parsed = true;

        info!(
            documents = self.documents.len(),
            dropped_lines = dropped,
            vocabulary = self.vocabulary.size(),
            stopwords = self.stopwords.len(),
            topics = self.num_topics,
            "Parsed corpus"
        );
        Ok(())
    }

    /// Parse a single corpus line into a document.
    ///
    /// Returns false when the line produced no document (empty, or no
    /// word tokens).
    pub fn parse_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }

        let fields = split_fields(line);
        let words = tokenize(fields.text);
        if words.is_empty() {
            debug!(line = %crate::output::truncate_chars(line, 60), "No word tokens, dropping line");
            return false;
        }

        let original_order = self.documents.len();
        let id = fields
            .id
            .map(str::to_string)
            .unwrap_or_else(|| original_order.to_string());

        let mut topic_counts = vec![0usize; self.num_topics];
        let mut tokens = Vec::with_capacity(words.len());

        for word in words {
            let topic = self.rng.next_index(self.num_topics);
            let is_stopword = self.stopwords.classify(&word);

            let word_id = if is_stopword {
                self.vocabulary.record_stopword(&word);
                None
            } else {
                let id = self.vocabulary.record_word(&word, topic);
                topic_counts[topic] += 1;
                self.tokens_per_topic[topic] += 1;
                Some(id)
            };

            tokens.push(Token {
                word,
                topic,
                is_stopword,
                word_id,
            });
        }

        self.documents.push(Document {
            id,
            date: fields.date.to_string(),
            original_text: fields.text.to_string(),
            original_order,
            tokens,
            topic_counts,
        });
        true
    }

    /// Recompute every count from the token assignments and compare with
    /// the running totals. Returns the first mismatch found.
    pub fn verify_counts(&self) -> Result<()> {
        let k = self.num_topics;
        let mut per_topic = vec![0usize; k];
        let mut per_word = vec![vec![0usize; k]; self.vocabulary.size()];

        for doc in &self.documents {
            let mut doc_counts = vec![0usize; k];
            for token in doc.tokens.iter().filter(|t| !t.is_stopword) {
                if token.topic >= k {
                    anyhow::bail!(
                        "Document {}: token '{}' has topic {} outside 0..{}",
                        doc.id,
                        token.word,
                        token.topic,
                        k
                    );
                }
                let Some(word_id) = token.word_id else {
                    anyhow::bail!("Document {}: modeled token '{}' has no vocabulary entry", doc.id, token.word);
                };
                doc_counts[token.topic] += 1;
                per_topic[token.topic] += 1;
                per_word[word_id][token.topic] += 1;
            }
            if doc_counts != doc.topic_counts {
                anyhow::bail!(
                    "Document {}: topic counts {:?} disagree with token assignments {:?}",
                    doc.id,
                    doc.topic_counts,
                    doc_counts
                );
            }
        }

        if per_topic != self.tokens_per_topic {
            anyhow::bail!(
                "Tokens per topic {:?} disagree with document tokens {:?}",
                self.tokens_per_topic,
                per_topic
            );
        }

        let mut from_vocabulary = vec![0usize; k];
        for (entry, expected) in self.vocabulary.entries().iter().zip(&per_word) {
            if &entry.topic_counts != expected {
                anyhow::bail!(
                    "Word '{}': topic counts {:?} disagree with token assignments {:?}",
                    entry.word,
                    entry.topic_counts,
                    expected
                );
            }
            let sum: usize = entry.topic_counts.iter().sum();
            if sum != entry.total_count {
                anyhow::bail!(
                    "Word '{}': topic counts sum to {} but total count is {}",
                    entry.word,
                    sum,
                    entry.total_count
                );
            }
            for (t, c) in entry.topic_counts.iter().enumerate() {
                from_vocabulary[t] += c;
            }
        }

        if from_vocabulary != self.tokens_per_topic {
            anyhow::bail!(
                "Tokens per topic {:?} disagree with vocabulary totals {:?}",
                self.tokens_per_topic,
                from_vocabulary
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(lines: &[&str]) -> TopicModel {
        let mut model = TopicModel::seeded(42);
        model.process_corpus(&[], lines).unwrap();
        model
    }

    #[test]
    fn test_auto_ids_skip_dropped_lines() {
        let model = parsed(&["first line here", "", "42", "second line here"]);
        let ids: Vec<&str> = model.documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
        assert_eq!(model.documents()[1].original_order, 1);
    }

    #[test]
    fn test_counts_consistent_after_parse() {
        let model = parsed(&[
            "apples and oranges are fruit",
            "oranges grow on trees in groves",
            "d9\t1999\tfruit trees need water",
        ]);
        model.verify_counts().unwrap();
        let total: usize = model.tokens_per_topic().iter().sum();
        let modeled: usize = model.documents().iter().map(|d| d.modeled_token_count()).sum();
        assert_eq!(total, modeled);
    }

    #[test]
    fn test_set_num_topics_before_parse() {
        let mut model = TopicModel::seeded(1);
        model.set_num_topics(4).unwrap();
        model.process_corpus(&[], &["alpha beta gamma delta"]).unwrap();
        assert_eq!(model.tokens_per_topic().len(), 4);
        assert_eq!(model.documents()[0].topic_counts.len(), 4);
        assert!(model.documents()[0].tokens.iter().all(|t| t.topic < 4));
    }

    #[test]
    fn test_set_num_topics_after_parse_fails() {
        let mut model = parsed(&["alpha beta gamma"]);
        assert!(model.set_num_topics(5).is_err());
        assert_eq!(model.num_topics(), DEFAULT_NUM_TOPICS);
    }

    #[test]
    fn test_zero_topics_rejected() {
        let mut model = TopicModel::seeded(1);
        assert!(model.set_num_topics(0).is_err());
    }

    #[test]
    fn test_second_process_corpus_fails() {
        let mut model = parsed(&["alpha beta gamma"]);
        assert!(model.process_corpus(&[], &["more text"]).is_err());
        assert_eq!(model.documents().len(), 1);
    }

    #[test]
    fn test_stopword_tokens_kept_but_not_counted() {
        let mut model = TopicModel::seeded(3);
        model
            .process_corpus(&["the"], &["the cat sat on the mat"])
            .unwrap();
        let doc = &model.documents()[0];
        let words: Vec<&str> = doc.tokens.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["the", "cat", "sat", "on", "the", "mat"]);
        assert_eq!(doc.modeled_token_count(), 3);
        assert_eq!(doc.topic_counts.iter().sum::<usize>(), 3);
        assert_eq!(model.vocabulary().raw_count("the"), 2);
        assert_eq!(model.vocabulary().raw_count("on"), 1);
        assert!(model.vocabulary().get("on").is_none());
        assert_eq!(model.vocabulary().size(), 3);
    }
}
