use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use crate::topics::model::DEFAULT_NUM_TOPICS;

/// Sweeps run by the CLI when neither the flag nor TOPICAL_SWEEPS is given.
pub const DEFAULT_SWEEPS: u64 = 100;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Every value has a default,
/// and CLI flags override whatever is set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of topics (TOPICAL_NUM_TOPICS)
    pub num_topics: usize,
    /// Sweeps to run before summarizing (TOPICAL_SWEEPS)
    pub sweeps: u64,
    /// Fixed seed for reproducible runs (TOPICAL_SEED); unset means random
    pub seed: Option<u64>,
    /// Stopword file, one word per line (TOPICAL_STOPWORDS)
    pub stopwords_path: Option<PathBuf>,
    /// Minimum association score for a graph link (TOPICAL_CORRELATION_CUTOFF)
    pub correlation_cutoff: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_topics: DEFAULT_NUM_TOPICS,
            sweeps: DEFAULT_SWEEPS,
            seed: None,
            stopwords_path: None,
            correlation_cutoff: 0.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let num_topics = parse_var(&lookup, "TOPICAL_NUM_TOPICS")?.unwrap_or(defaults.num_topics);
        if num_topics == 0 {
            anyhow::bail!("TOPICAL_NUM_TOPICS must be at least 1");
        }

        Ok(Self {
            num_topics,
            sweeps: parse_var(&lookup, "TOPICAL_SWEEPS")?.unwrap_or(defaults.sweeps),
            seed: parse_var(&lookup, "TOPICAL_SEED")?,
            stopwords_path: lookup("TOPICAL_STOPWORDS")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            correlation_cutoff: parse_var(&lookup, "TOPICAL_CORRELATION_CUTOFF")?
                .unwrap_or(defaults.correlation_cutoff),
        })
    }
}

/// Parse an optional variable, naming it in the error if it's malformed.
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(e) => anyhow::bail!("{key} has an invalid value '{raw}': {e}"),
        },
        _ => Ok(None),
    }
}
