use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

use crate::core::error::{OntoRankError, Result};
use crate::text::stopwords::is_stop_word;
use crate::utils::remove_punctuation;

/// Sentence-level text normalizer.
///
/// Splitting and stemming are pure: the same input text always yields the
/// same token sequences for a given language.
pub struct TextNormalizer {
    stemmer: Stemmer,
}

impl TextNormalizer {
    pub fn new(language: &str) -> Result<Self> {
        let algorithm = match language.to_lowercase().as_str() {
            "english" | "en" => Algorithm::English,
            "russian" | "ru" => Algorithm::Russian,
            "german" | "de" => Algorithm::German,
            "french" | "fr" => Algorithm::French,
            "spanish" | "es" => Algorithm::Spanish,
            other => {
                return Err(OntoRankError::Config(format!(
                    "unsupported stemmer language: {other}"
                )));
            }
        };
        Ok(Self {
            stemmer: Stemmer::create(algorithm),
        })
    }

    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Splits raw text into sentences on `.`/`!`/`?` boundaries.
    pub fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for (i, c) in text.char_indices() {
            if c == '.' || c == '!' || c == '?' {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }

        let remaining = text[start..].trim();
        if !remaining.is_empty() {
            sentences.push(remaining);
        }

        sentences
    }

    /// Lowercases and stems a single word. Stop-words pass through
    /// lowercased but unstemmed.
    pub fn normalize_word(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        if is_stop_word(&lowered) {
            lowered
        } else {
            self.stemmer.stem(&lowered).into_owned()
        }
    }

    /// Normalized token sequence for one sentence: punctuation stripped,
    /// every token lowercased and stemmed.
    pub fn normalize_sentence(&self, sentence: &str) -> Vec<String> {
        remove_punctuation(sentence)
            .split_whitespace()
            .map(|word| self.normalize_word(word))
            .collect()
    }

    /// Normalized matching form of a concept label: the label's words
    /// stemmed and re-joined with single spaces.
    pub fn normalize_label(&self, label: &str) -> String {
        let normalized = self.normalize_sentence(label).join(" ");
        debug!(label, normalized = %normalized, "normalized concept label");
        normalized
    }
}
