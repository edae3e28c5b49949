// Topic modeling: LDA via collapsed Gibbs sampling, plus summaries and
// topic-correlation analysis over the sampled state.

pub mod correlation;
pub mod document;
pub mod model;
pub mod sampler;
pub mod summary;
pub mod tokenizer;
pub mod traits;
pub mod vocabulary;

pub use model::TopicModel;
pub use traits::{RandomSource, StdRandom};
