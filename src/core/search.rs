//! Approximate text matching for catalog search
//!
//! Scores are distances in `[0, 1]`: 0 is a perfect match, 1 is nothing in
//! common. Every query token must find a name or description token within
//! the threshold; the entry's score is the mean of those best distances.
//! Token distance is the normalized Levenshtein distance, either against the
//! whole field token or, for queries of at least `MIN_PARTIAL_LEN` chars,
//! against its closest substring of similar length. Misspellings ("piza")
//! and fragments ("rgher") are found while short queries stay strict.

use crate::config::StoreConfig;

/// Distance for a query token equal to a field token
const EXACT: f64 = 0.0;

/// Distance for a query token that starts a field token
const PREFIX: f64 = 0.05;

/// Distance for a query token found inside a field token
const INFIX: f64 = 0.1;

/// Extra distance for matching against part of a token instead of all of it
const PARTIAL_PENALTY: f64 = 0.05;

/// Shortest query token that may match part of a longer token with edits
const MIN_PARTIAL_LEN: usize = 5;

/// Extra distance applied to description matches so name hits rank first
const DESCRIPTION_PENALTY: f64 = 0.1;

/// Lowercases and splits text into alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Pre-tokenized searchable fields of one catalog entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFields {
    /// Tokens of the item name
    pub name: Vec<String>,
    /// Tokens of the item description
    pub description: Vec<String>,
}

impl SearchFields {
    /// Tokenizes a name and description
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: tokenize(name),
            description: tokenize(description),
        }
    }
}

/// Fuzzy matcher with a fixed acceptance threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self { threshold: 0.4 }
    }
}

impl FuzzyMatcher {
    /// Creates a matcher; the threshold is clamped to `[0, 1]`
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Builds the matcher from the store configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.search_threshold)
    }

    /// Maximum accepted distance
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores a tokenized query against an entry, `None` when above the threshold
    pub fn score(&self, query: &[String], fields: &SearchFields) -> Option<f64> {
        if query.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for token in query {
            let name = best_distance(token, &fields.name);
            let description =
                (best_distance(token, &fields.description) + DESCRIPTION_PENALTY).min(1.0);
            let distance = name.min(description);
            if distance > self.threshold {
                return None;
            }
            total += distance;
        }

        Some(total / query.len() as f64)
    }
}

/// Best distance from a query token to any token of a field (1 if empty)
fn best_distance(query: &str, field: &[String]) -> f64 {
    field
        .iter()
        .map(|token| token_distance(query, token))
        .fold(1.0, f64::min)
}

/// Distance between a query token and a single field token
fn token_distance(query: &str, token: &str) -> f64 {
    if query == token {
        return EXACT;
    }
    if token.starts_with(query) {
        return PREFIX;
    }
    if token.contains(query) {
        return INFIX;
    }

    let whole = 1.0 - strsim::normalized_levenshtein(query, token);
    whole.min(window_distance(query, token))
}

/// Best distance between the query and any substring of the token that is
/// as long as the query or one character longer
fn window_distance(query: &str, token: &str) -> f64 {
    let query_len = query.chars().count();
    // Byte offset of every char boundary, including the end of the string
    let bounds: Vec<usize> = token
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(token.len()))
        .collect();
    let token_len = bounds.len() - 1;

    if query_len < MIN_PARTIAL_LEN || token_len <= query_len {
        return 1.0;
    }

    let mut best = 1.0;
    for width in query_len..=(query_len + 1).min(token_len) {
        for start in 0..=(token_len - width) {
            let window = &token[bounds[start]..bounds[start + width]];
            let edits = strsim::levenshtein(query, window) as f64;
            let distance = (edits / query_len as f64 + PARTIAL_PENALTY).min(1.0);
            if distance < best {
                best = distance;
            }
        }
    }
    best
}
