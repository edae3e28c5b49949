// Topical: incremental LDA topic modeling with collapsed Gibbs sampling.
//
// This is the library root. `topics` holds the model and sampler; the other
// modules are the plumbing the CLI needs around it.

pub mod config;
pub mod corpus;
pub mod output;
pub mod topics;
