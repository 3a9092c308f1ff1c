use serde::{Deserialize, Serialize};

/// Engine-level defaults. Every threshold can still be passed explicitly
/// to [`crate::Document::rank`]; the config only supplies the values used
/// by callers that do not care to pick their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Stemmer language for text normalization.
    pub language: String,

    /// Maximum path length `n` for ontology path counting.
    pub max_path_length: i64,

    /// Historical threshold `k`, threaded through ranking but not consumed.
    pub k: i64,

    /// Co-occurrence threshold `b` for connectivity degrees.
    pub co_occurrence_threshold: i64,

    /// Capacity of the compiled-pattern cache used by the concept matcher.
    pub pattern_cache_size: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            language: crate::DEFAULT_LANGUAGE.to_string(),
            max_path_length: 3,
            k: 1,
            co_occurrence_threshold: 1,
            pattern_cache_size: crate::DEFAULT_PATTERN_CACHE_SIZE,
        }
    }
}

impl RankerConfig {
    /// Builds a config from `ONTORANK_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(language) = std::env::var("ONTORANK_LANGUAGE") {
            config.language = language;
        }
        if let Some(n) = parse_env("ONTORANK_MAX_PATH_LENGTH") {
            config.max_path_length = n;
        }
        if let Some(k) = parse_env("ONTORANK_K") {
            config.k = k;
        }
        if let Some(b) = parse_env("ONTORANK_CO_OCCURRENCE_THRESHOLD") {
            config.co_occurrence_threshold = b;
        }
        if let Some(size) = parse_env("ONTORANK_PATTERN_CACHE_SIZE") {
            config.pattern_cache_size = size;
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
