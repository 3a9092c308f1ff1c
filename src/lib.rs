pub mod core;
pub mod document;
pub mod highlight;
pub mod ontology;
pub mod text;
pub mod utils;

pub use utils::{safe_truncate, safe_truncate_ellipsis};

pub use crate::core::cache::CacheStats;
pub use crate::core::config::RankerConfig;
pub use crate::core::error::{OntoRankError, Result};
pub use document::{Document, Metric, MetricMap, Sentence};
pub use highlight::{ColorPalette, HighlightSpan};
pub use ontology::{ConceptId, ConceptNode, GraphQuery, InMemoryOntology, OntologyFragment};
pub use text::{ConceptMatcher, TextNormalizer};

pub const DEFAULT_LANGUAGE: &str = "english";

pub const DEFAULT_PATTERN_CACHE_SIZE: usize = 1024;
