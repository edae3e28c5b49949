// Topic correlations.
//
// LDA has no parameter for how topics relate to each other, so we estimate it
// from the documents: a topic is "present" in a document when it holds a
// non-trivial share of the document's tokens, and two topics are correlated
// when they are present together more often than their individual document
// frequencies predict.
//
//   score[i][j] = ln( N * together[i][j] / (docs_with[i] * docs_with[j]) )
//
// Positive scores mean the pair co-occurs more than chance; pairs that never
// co-occur, or involve a topic present nowhere, score negative infinity.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::TopicModel;

/// Raw co-occurrence counts before the log-ratio transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooccurrence {
    /// `counts[i][j]`: documents where both topics are present. Symmetric,
    /// zero diagonal.
    pub counts: Vec<Vec<u32>>,
    /// Documents in which each topic is present.
    pub doc_frequency: Vec<u32>,
    pub num_documents: usize,
}

/// K x K association scores. The diagonal is unused and left at 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn num_topics(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub topic_id: usize,
    pub top_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Topics as nodes, correlated pairs as directed links (both directions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Number of words used to label each graph node.
pub const NODE_LABEL_WORDS: usize = 3;

/// Log-ratio association score, guarding the zero-frequency case.
pub fn association_score(num_documents: usize, together: u32, freq_i: u32, freq_j: u32) -> f64 {
    if freq_i == 0 || freq_j == 0 {
        return f64::NEG_INFINITY;
    }
    ((num_documents as f64 * together as f64) / (freq_i as f64 * freq_j as f64)).ln()
}

impl TopicModel {
    /// Count, for every pair of topics, the documents where both are present.
    pub fn cooccurrence(&self) -> Cooccurrence {
        let k = self.num_topics;
        let mut counts = vec![vec![0u32; k]; k];
        let mut doc_frequency = vec![0u32; k];

        for doc in &self.documents {
            let cutoff = self
                .correlation_min_tokens
                .max(self.correlation_min_proportion * doc.tokens.len() as f64);

            let present: Vec<usize> = (0..k)
                .filter(|&t| doc.topic_counts[t] as f64 >= cutoff)
                .collect();

            for &t in &present {
                doc_frequency[t] += 1;
            }
            for (a, &i) in present.iter().enumerate() {
                for &j in &present[a + 1..] {
                    counts[i][j] += 1;
                    counts[j][i] += 1;
                }
            }
        }

        Cooccurrence {
            counts,
            doc_frequency,
            num_documents: self.documents.len(),
        }
    }

    /// Pairwise topic association scores for the current assignments.
    pub fn topic_correlations(&self) -> CorrelationMatrix {
        let co = self.cooccurrence();
        let k = self.num_topics;
        let mut values = vec![vec![0.0f64; k]; k];

        for i in 0..k {
            for j in 0..k {
                if i != j {
                    values[i][j] = association_score(
                        co.num_documents,
                        co.counts[i][j],
                        co.doc_frequency[i],
                        co.doc_frequency[j],
                    );
                }
            }
        }

        debug!(
            documents = co.num_documents,
            present_topics = co.doc_frequency.iter().filter(|&&f| f > 0).count(),
            "Computed topic correlations"
        );
        CorrelationMatrix { values }
    }

    /// Project a correlation matrix into a graph, keeping pairs above `cutoff`.
    pub fn correlation_graph(&self, matrix: &CorrelationMatrix, cutoff: f64) -> CorrelationGraph {
        let k = self.num_topics.min(matrix.num_topics());

        let nodes = (0..k)
            .map(|topic| GraphNode {
                topic_id: topic,
                top_words: self
                    .top_words(topic, NODE_LABEL_WORDS)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        let mut links = Vec::new();
        for source in 0..k {
            for target in 0..k {
                let weight = matrix.get(source, target);
                if source != target && weight > cutoff {
                    links.push(GraphLink {
                        source,
                        target,
                        weight,
                    });
                }
            }
        }

        CorrelationGraph { nodes, links }
    }
}
