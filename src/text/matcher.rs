use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;

use crate::core::error::{OntoRankError, Result};

/// Whole-word concept matcher.
///
/// Matching is purely lexical: a concept name matches a sentence when it
/// occurs as a case-insensitive, word-boundary-delimited phrase inside the
/// sentence's normalized text. Compiled patterns are cached per name so the
/// O(sentences × concepts) attachment scan compiles each concept once.
pub struct ConceptMatcher {
    patterns: Mutex<LruCache<String, Regex>>,
}

impl ConceptMatcher {
    pub fn new(capacity: usize) -> Self {
        Self {
            patterns: Mutex::new(LruCache::new(capacity.try_into().unwrap())),
        }
    }

    /// Number of whole-word occurrences of `name` in `text`.
    pub fn count_occurrences(&self, name: &str, text: &str) -> Result<usize> {
        let mut patterns = self.patterns.lock();
        if let Some(pattern) = patterns.get(name) {
            return Ok(pattern.find_iter(text).count());
        }

        let pattern = Self::compile(name)?;
        let count = pattern.find_iter(text).count();
        patterns.put(name.to_string(), pattern);
        Ok(count)
    }

    /// Whether `name` occurs at least once as a whole word in `text`.
    pub fn is_in_text(&self, name: &str, text: &str) -> Result<bool> {
        Ok(self.count_occurrences(name, text)? > 0)
    }

    fn compile(name: &str) -> Result<Regex> {
        let source = format!(r"(?i)\b{}\b", regex::escape(name));
        Regex::new(&source)
            .map_err(|e| OntoRankError::Validation(format!("bad concept pattern {name:?}: {e}")))
    }
}

impl Default for ConceptMatcher {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PATTERN_CACHE_SIZE)
    }
}
