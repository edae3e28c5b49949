// Unit tests for the Gibbs sweep.
//
// Tests the count invariants across many sweeps, determinism under a fixed
// seed, the exact inverse-CDF path with a scripted random source, and the
// sweep counters.

use std::collections::VecDeque;

use topical::topics::model::{DOCUMENT_TOPIC_SMOOTHING, TOPIC_WORD_SMOOTHING};
use topical::topics::sampler::{sample_topic, topic_weights, TopicNormalizers};
use topical::topics::{RandomSource, TopicModel};

const CORPUS: &[&str] = &[
    "stocks bonds markets investors trading volatility",
    "investors fear volatility in bond markets",
    "football season starts with the championship match",
    "the championship match drew record football crowds",
    "markets rallied as investors bought stocks",
    "crowds cheered the football team after the match",
];

/// Replays a fixed list of uniform draws, then repeats the last one.
struct Scripted {
    values: VecDeque<f64>,
    last: f64,
}

impl Scripted {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            last: values.last().copied().unwrap_or(0.0),
        }
    }
}

impl RandomSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        match self.values.pop_front() {
            Some(v) => {
                self.last = v;
                v
            }
            None => self.last,
        }
    }
}

fn trained(seed: u64, topics: usize, sweeps: u64) -> TopicModel {
    let mut model = TopicModel::seeded(seed);
    model.set_num_topics(topics).unwrap();
    model.process_corpus(&["the", "with", "after"], CORPUS).unwrap();
    model.set_requested_sweeps(sweeps);
    model.sweep_n(sweeps, |_| {});
    model
}

fn assignments(model: &TopicModel) -> Vec<Vec<usize>> {
    model
        .documents()
        .iter()
        .map(|d| d.tokens.iter().map(|t| t.topic).collect())
        .collect()
}

// ============================================================
// Invariants
// ============================================================

#[test]
fn counts_conserved_across_sweeps() {
    let mut model = TopicModel::seeded(99);
    model.set_num_topics(4).unwrap();
    model.process_corpus(&["the"], CORPUS).unwrap();

    let modeled: usize = model.documents().iter().map(|d| d.modeled_token_count()).sum();

    for sweep in 0..50 {
        model.sweep();
        assert_eq!(
            model.tokens_per_topic().iter().sum::<usize>(),
            modeled,
            "token total drifted on sweep {sweep}"
        );
        model.verify_counts().unwrap();
    }
}

#[test]
fn stopword_tokens_never_change_topic() {
    let mut model = TopicModel::seeded(5);
    model.process_corpus(&["the"], CORPUS).unwrap();
    let before: Vec<usize> = model
        .documents()
        .iter()
        .flat_map(|d| d.tokens.iter().filter(|t| t.is_stopword).map(|t| t.topic))
        .collect();

    model.sweep_n(10, |_| {});

    let after: Vec<usize> = model
        .documents()
        .iter()
        .flat_map(|d| d.tokens.iter().filter(|t| t.is_stopword).map(|t| t.topic))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn sweep_visits_every_modeled_token() {
    let mut model = TopicModel::seeded(3);
    model.process_corpus(&["the"], CORPUS).unwrap();
    let modeled: usize = model.documents().iter().map(|d| d.modeled_token_count()).sum();
    let stats = model.sweep();
    assert_eq!(stats.tokens_resampled, modeled);
    assert!(stats.topics_changed <= modeled);
}

#[test]
fn all_stopword_corpus_sweeps_nothing() {
    let mut model = TopicModel::seeded(3);
    model.process_corpus(&[], &["ok no so", "we do it"]).unwrap();
    assert_eq!(model.vocabulary().size(), 0);
    let stats = model.sweep();
    assert_eq!(stats.tokens_resampled, 0);
    model.verify_counts().unwrap();
}

#[test]
fn weights_stay_positive_for_real_counts() {
    let model = trained(17, 3, 5);
    let normalizers = TopicNormalizers::new(
        model.vocabulary().size(),
        TOPIC_WORD_SMOOTHING,
        model.tokens_per_topic(),
    );
    let mut weights = vec![0.0; model.num_topics()];

    for doc in model.documents() {
        for token in doc.tokens.iter().filter(|t| !t.is_stopword) {
            let word = model.vocabulary().get(&token.word).unwrap();
            let sum = topic_weights(
                &doc.topic_counts,
                &word.topic_counts,
                &normalizers,
                DOCUMENT_TOPIC_SMOOTHING,
                TOPIC_WORD_SMOOTHING,
                &mut weights,
            );
            assert!(sum > 0.0);
            assert!(weights.iter().all(|&w| w > 0.0), "{weights:?}");
        }
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn same_seed_same_assignments() {
    let a = trained(1234, 5, 25);
    let b = trained(1234, 5, 25);
    assert_eq!(assignments(&a), assignments(&b));
    assert_eq!(a.tokens_per_topic(), b.tokens_per_topic());
    for topic in 0..5 {
        assert_eq!(a.topic_words(topic), b.topic_words(topic));
    }
}

#[test]
fn different_seeds_usually_differ() {
    let a = trained(1, 5, 10);
    let b = trained(2, 5, 10);
    assert_ne!(assignments(&a), assignments(&b));
}

// ============================================================
// Exact sampling path
// ============================================================

#[test]
fn scripted_source_drives_exact_topics() {
    // Two topics, one document, two distinct words.
    // Init draws: 0.1 -> topic 0, 0.9 -> topic 1.
    // Sweep draw 0.0 always lands on topic 0 (first weight is positive).
    let mut model = TopicModel::new(Box::new(Scripted::new(&[0.1, 0.9, 0.0])));
    model.set_num_topics(2).unwrap();
    model.process_corpus(&[], &["alpha beta"]).unwrap();

    let topics: Vec<usize> = model.documents()[0].tokens.iter().map(|t| t.topic).collect();
    assert_eq!(topics, vec![0, 1]);
    assert_eq!(model.tokens_per_topic(), &[1, 1]);

    model.sweep();
    let topics: Vec<usize> = model.documents()[0].tokens.iter().map(|t| t.topic).collect();
    assert_eq!(topics, vec![0, 0]);
    assert_eq!(model.tokens_per_topic(), &[2, 0]);
    assert_eq!(model.documents()[0].topic_counts, vec![2, 0]);
    model.verify_counts().unwrap();
}

#[test]
fn scripted_draw_near_one_picks_last_topic() {
    let mut model = TopicModel::new(Box::new(Scripted::new(&[0.0, 0.0, 0.999_999])));
    model.set_num_topics(3).unwrap();
    model.process_corpus(&[], &["alpha beta"]).unwrap();
    model.sweep();
    assert!(model.documents()[0].tokens.iter().all(|t| t.topic == 2));
}

#[test]
fn sample_topic_matches_manual_cdf() {
    let weights = [0.2, 0.3, 0.5];
    let sum: f64 = weights.iter().sum();
    assert_eq!(sample_topic(&weights, 0.1 * sum), 0);
    assert_eq!(sample_topic(&weights, 0.4 * sum), 1);
    assert_eq!(sample_topic(&weights, 0.9 * sum), 2);
}

// ============================================================
// Sweep counters and re-sorting
// ============================================================

#[test]
fn complete_sweeps_counts_up() {
    let mut model = TopicModel::seeded(4);
    model.process_corpus(&[], CORPUS).unwrap();
    assert_eq!(model.complete_sweeps(), 0);
    model.sweep_n(3, |_| {});
    assert_eq!(model.complete_sweeps(), 3);
}

#[test]
fn summaries_resort_once_requested_sweeps_reached() {
    let mut model = TopicModel::seeded(21);
    model.set_num_topics(3).unwrap();
    model.process_corpus(&["the"], CORPUS).unwrap();
    model.set_requested_sweeps(5);

    let at_parse: Vec<_> = (0..3).map(|t| model.topic_words(t).to_vec()).collect();
    model.sweep_n(4, |_| {});
    let before_target: Vec<_> = (0..3).map(|t| model.topic_words(t).to_vec()).collect();
    assert_eq!(at_parse, before_target, "summary changed before the requested sweep count");

    model.sweep();
    for topic in 0..3 {
        let listed: usize = model.topic_words(topic).iter().map(|w| w.count).sum();
        assert_eq!(listed, model.tokens_per_topic()[topic]);
    }
}
