// Documents and tokens.
//
// A corpus line is either plain text or `id<TAB>date<TAB>text`. Anything else
// is read as plain text using its first field; lines are never rejected for a
// bad field count. The date is kept verbatim and never parsed.

use serde::{Deserialize, Serialize};

use super::vocabulary::WordId;

/// One word occurrence inside a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    /// Current topic assignment. Rewritten by every sweep.
    pub topic: usize,
    pub is_stopword: bool,
    #[serde(skip)]
    pub(crate) word_id: Option<WordId>,
}

/// A parsed document with its tokens and per-topic counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub date: String,
    pub original_text: String,
    /// Position at which the document was stored (dropped lines don't count).
    pub original_order: usize,
    pub tokens: Vec<Token>,
    /// Non-stopword tokens per topic; always sums to `modeled_token_count()`.
    pub topic_counts: Vec<usize>,
}

impl Document {
    /// Number of tokens that take part in sampling.
    pub fn modeled_token_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_stopword).count()
    }

    /// Topic with the most tokens in this document (lowest index on ties),
    /// or `None` if every token is a stopword.
    pub fn dominant_topic(&self) -> Option<usize> {
        let (topic, &count) = self
            .topic_counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, &c)| c)?;
        (count > 0).then_some(topic)
    }
}

/// The fields of one corpus line, before tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields<'a> {
    /// `None` means the id is assigned from the document count.
    pub id: Option<&'a str>,
    pub date: &'a str,
    pub text: &'a str,
}

/// Split a corpus line into `(id, date, text)`.
pub fn split_fields(line: &str) -> LineFields<'_> {
    let fields: Vec<&str> = line.split('\t').collect();
    if let &[id, date, text] = fields.as_slice() {
        LineFields {
            id: Some(id),
            date,
            text,
        }
    } else {
        LineFields {
            id: None,
            date: "",
            text: fields[0],
        }
    }
}
