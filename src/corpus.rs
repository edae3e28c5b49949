// Corpus and stopword file reading.
//
// A corpus file is one document per line. A stopword file is one word per
// line; blank lines and lines starting with '#' are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};

/// Read a whole file and split it into lines (a trailing '\r' is stripped).
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    Ok(split_lines(&data))
}

/// Read a stopword list, one word per line.
pub fn read_stopwords(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stopword file: {}", path.display()))?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// The English stopword list shipped with the `stop-words` crate.
pub fn default_stopwords() -> Vec<String> {
    get(LANGUAGE::English)
}

fn split_lines(data: &str) -> Vec<String> {
    data.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
