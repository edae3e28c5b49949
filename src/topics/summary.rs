// Per-topic word lists, sorted by count.

use serde::{Deserialize, Serialize};

use super::model::TopicModel;

/// A word and how many of its tokens are assigned to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

impl TopicModel {
    /// Rebuild every topic's `(word, count)` list, highest count first.
    ///
    /// Equal counts keep the vocabulary's first-seen order.
    pub fn sort_topic_words(&mut self) {
        let mut lists: Vec<Vec<WordCount>> = vec![Vec::new(); self.num_topics];

        for entry in self.vocabulary.entries() {
            for (topic, &count) in entry.topic_counts.iter().enumerate() {
                if count > 0 {
                    lists[topic].push(WordCount {
                        word: entry.word.clone(),
                        count,
                    });
                }
            }
        }

        for list in &mut lists {
            list.sort_by(|a, b| b.count.cmp(&a.count));
        }
        self.topic_words = lists;
    }

    /// Sorted word list for a topic, as of the last re-sort.
    pub fn topic_words(&self, topic: usize) -> &[WordCount] {
        self.topic_words
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first `n` words of a topic's sorted list.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<&str> {
        self.topic_words(topic)
            .iter()
            .take(n)
            .map(|wc| wc.word.as_str())
            .collect()
    }
}
