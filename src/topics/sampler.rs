// Collapsed Gibbs sampling sweep.
//
// For every non-stopword token, in document order then token order:
//
//   1. remove the token from its topic's counts
//   2. weight[t] = (alpha + doc[t]) * (beta + word[t]) / (V*beta + total[t])
//   3. draw a topic proportionally to the weights (inverse CDF)
//   4. add the token back under the drawn topic
//
// The per-topic denominators are kept as reciprocals and refreshed only for
// the topic whose total just changed.

use std::time::{Duration, Instant};

use tracing::debug;

use super::model::{TopicModel, DOCUMENT_TOPIC_SMOOTHING, TOPIC_WORD_SMOOTHING};

/// What a single sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepStats {
    /// Non-stopword tokens visited.
    pub tokens_resampled: usize,
    /// Tokens whose topic differs from before the sweep.
    pub topics_changed: usize,
    pub elapsed: Duration,
}

/// Reciprocal denominators `1 / (V*beta + tokens_per_topic[t])`.
#[derive(Debug, Clone)]
pub struct TopicNormalizers {
    smoothing_mass: f64,
    values: Vec<f64>,
}

impl TopicNormalizers {
    pub fn new(vocabulary_size: usize, beta: f64, tokens_per_topic: &[usize]) -> Self {
        let smoothing_mass = vocabulary_size as f64 * beta;
        let values = tokens_per_topic
            .iter()
            .map(|&n| 1.0 / (smoothing_mass + n as f64))
            .collect();
        Self {
            smoothing_mass,
            values,
        }
    }

    /// Refresh topic `t` after its total changed to `tokens`.
    pub fn update(&mut self, topic: usize, tokens: usize) {
        self.values[topic] = 1.0 / (self.smoothing_mass + tokens as f64);
    }

    pub fn get(&self, topic: usize) -> f64 {
        self.values[topic]
    }
}

/// Fill `weights` with the unnormalized conditional for each topic and
/// return their sum.
pub fn topic_weights(
    doc_topic_counts: &[usize],
    word_topic_counts: &[usize],
    normalizers: &TopicNormalizers,
    alpha: f64,
    beta: f64,
    weights: &mut [f64],
) -> f64 {
    let mut sum = 0.0;
    for (t, weight) in weights.iter_mut().enumerate() {
        *weight = (alpha + doc_topic_counts[t] as f64)
            * (beta + word_topic_counts[t] as f64)
            * normalizers.get(t);
        debug_assert!(*weight > 0.0, "topic weight must be positive, got {weight}");
        sum += *weight;
    }
    sum
}

/// Inverse-CDF draw from unnormalized weights.
///
/// `sample` is a uniform value already scaled to `[0, sum)`. Weights are
/// subtracted from topic 0 upward until the remainder is no longer positive.
/// Falls back to the last topic if round-off leaves a positive remainder.
pub fn sample_topic(weights: &[f64], sample: f64) -> usize {
    let mut remaining = sample - weights[0];
    let mut topic = 0;
    while remaining > 0.0 && topic + 1 < weights.len() {
        topic += 1;
        remaining -= weights[topic];
    }
    topic
}

impl TopicModel {
    /// Run one full Gibbs sweep over every modeled token.
    ///
    /// A model with no documents or no modeled words sweeps zero tokens;
    /// the sweep still counts toward `complete_sweeps`.
    pub fn sweep(&mut self) -> SweepStats {
        let start = Instant::now();
        let k = self.num_topics;
        let alpha = DOCUMENT_TOPIC_SMOOTHING;
        let beta = TOPIC_WORD_SMOOTHING;

        let mut normalizers =
            TopicNormalizers::new(self.vocabulary.size(), beta, &self.tokens_per_topic);
        let mut weights = vec![0.0f64; k];
        let mut stats = SweepStats::default();

        let Self {
            documents,
            vocabulary,
            tokens_per_topic,
            rng,
            ..
        } = self;

        for doc in documents.iter_mut() {
            let doc_topic_counts = &mut doc.topic_counts;

            for token in doc.tokens.iter_mut() {
                let Some(word_id) = token.word_id else {
                    continue;
                };
                let word_topic_counts = vocabulary.topic_counts_mut(word_id);
                let old_topic = token.topic;

                tokens_per_topic[old_topic] -= 1;
                word_topic_counts[old_topic] -= 1;
                doc_topic_counts[old_topic] -= 1;
                normalizers.update(old_topic, tokens_per_topic[old_topic]);

                let sum = topic_weights(
                    doc_topic_counts,
                    word_topic_counts,
                    &normalizers,
                    alpha,
                    beta,
                    &mut weights,
                );
                let new_topic = sample_topic(&weights, sum * rng.next_f64());

                token.topic = new_topic;
                tokens_per_topic[new_topic] += 1;
                word_topic_counts[new_topic] += 1;
                doc_topic_counts[new_topic] += 1;
                normalizers.update(new_topic, tokens_per_topic[new_topic]);

                stats.tokens_resampled += 1;
                if new_topic != old_topic {
                    stats.topics_changed += 1;
                }
            }
        }

        self.complete_sweeps += 1;
        if self.complete_sweeps >= self.requested_sweeps {
            self.sort_topic_words();
        }

        stats.elapsed = start.elapsed();
        debug!(
            sweep = self.complete_sweeps,
            tokens = stats.tokens_resampled,
            changed = stats.topics_changed,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Sweep complete"
        );
        stats
    }

    /// Run `n` sweeps back to back, calling `on_sweep` after each one.
    pub fn sweep_n<F: FnMut(&SweepStats)>(&mut self, n: u64, mut on_sweep: F) {
        for _ in 0..n {
            let stats = self.sweep();
            on_sweep(&stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_topic_walks_cdf() {
        let weights = [1.0, 2.0, 3.0];
        assert_eq!(sample_topic(&weights, 0.0), 0);
        assert_eq!(sample_topic(&weights, 0.5), 0);
        // remainder hits exactly zero at the boundary: stays on topic 0
        assert_eq!(sample_topic(&weights, 1.0), 0);
        assert_eq!(sample_topic(&weights, 1.5), 1);
        assert_eq!(sample_topic(&weights, 3.5), 2);
    }

    #[test]
    fn test_sample_topic_clamps_round_off() {
        let weights = [0.1, 0.1];
        assert_eq!(sample_topic(&weights, 0.2 + 1e-12), 1);
    }

    #[test]
    fn test_topic_weights_formula() {
        let normalizers = TopicNormalizers::new(100, 0.01, &[10, 0]);
        let mut weights = [0.0; 2];
        let sum = topic_weights(&[3, 0], &[2, 0], &normalizers, 0.1, 0.01, &mut weights);

        let expected0 = (0.1 + 3.0) * (0.01 + 2.0) / (100.0 * 0.01 + 10.0);
        let expected1 = 0.1 * 0.01 / (100.0 * 0.01);
        assert!((weights[0] - expected0).abs() < 1e-12);
        assert!((weights[1] - expected1).abs() < 1e-12);
        assert!((sum - expected0 - expected1).abs() < 1e-12);
    }

    #[test]
    fn test_weights_positive_with_empty_counts() {
        let normalizers = TopicNormalizers::new(1, 0.01, &[0, 0, 0]);
        let mut weights = [0.0; 3];
        let sum = topic_weights(&[0, 0, 0], &[0, 0, 0], &normalizers, 0.1, 0.01, &mut weights);
        assert!(weights.iter().all(|&w| w > 0.0));
        assert!(sum > 0.0);
    }

    #[test]
    fn test_normalizer_update() {
        let mut normalizers = TopicNormalizers::new(10, 0.5, &[5]);
        assert!((normalizers.get(0) - 1.0 / 10.0).abs() < 1e-12);
        normalizers.update(0, 15);
        assert!((normalizers.get(0) - 1.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_on_empty_model_is_noop() {
        let mut model = TopicModel::seeded(5);
        let stats = model.sweep();
        assert_eq!(stats.tokens_resampled, 0);
        assert_eq!(model.complete_sweeps(), 1);
        model.verify_counts().unwrap();
    }

    #[test]
    fn test_sweep_preserves_counts() {
        let mut model = TopicModel::seeded(11);
        model
            .process_corpus(
                &["and"],
                &[
                    "cats and dogs chase mice",
                    "dogs bark at cats and mailmen",
                    "mice eat cheese and crumbs",
                ],
            )
            .unwrap();
        for _ in 0..20 {
            model.sweep();
            model.verify_counts().unwrap();
        }
        assert_eq!(model.complete_sweeps(), 20);
    }
}
