use crate::core::error::Result;
use crate::ontology::models::{ConceptId, ConceptNode, OntologyFragment};

/// The narrow interface the scoring engine consumes from the ontology
/// graph collaborator. Query failures propagate to the caller unmodified;
/// the engine never retries.
pub trait GraphQuery: Send + Sync {
    /// All concept records, in a stable iteration order.
    fn concepts(&self) -> Vec<ConceptNode>;

    /// Human-readable label for a concept id.
    fn display_name(&self, id: &str) -> Result<String>;

    /// Number of directed paths of length at most `max_length` between two
    /// concepts. Returns 0, not an error, when no path exists or the ids
    /// are identical.
    fn path_count(&self, from: &str, to: &str, max_length: i64) -> Result<u64>;

    /// Induced sub-graph over the given concept ids.
    fn sub_graph(&self, ids: &[ConceptId]) -> Result<OntologyFragment>;
}
