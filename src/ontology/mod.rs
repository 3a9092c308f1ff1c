pub mod graph;
pub mod memory;
pub mod models;

pub use graph::GraphQuery;
pub use memory::InMemoryOntology;
pub use models::{ConceptId, ConceptNode, ConceptRelation, OntologyFragment, RelationType};
