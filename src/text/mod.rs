pub mod matcher;
pub mod normalizer;
pub mod stopwords;

pub use matcher::ConceptMatcher;
pub use normalizer::TextNormalizer;
