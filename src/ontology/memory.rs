use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{OntoRankError, Result};
use crate::ontology::graph::GraphQuery;
use crate::ontology::models::{ConceptId, ConceptNode, ConceptRelation, OntologyFragment, RelationType};
use crate::text::TextNormalizer;

/// In-memory directed concept graph.
///
/// Reference implementation of [`GraphQuery`] used by the CLI and the test
/// suite; a production deployment would put a dedicated graph engine behind
/// the same trait. Path counting enumerates simple paths (no repeated
/// nodes) up to the length bound.
#[derive(Default)]
pub struct InMemoryOntology {
    nodes: Vec<ConceptNode>,
    index: HashMap<ConceptId, usize>,
    relations: Vec<ConceptRelation>,
    adjacency: HashMap<ConceptId, Vec<ConceptId>>,
}

#[derive(Deserialize)]
struct OntologyFile {
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    relations: Vec<RelationSpec>,
}

#[derive(Deserialize)]
struct NodeSpec {
    id: ConceptId,
    display_name: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RelationSpec {
    from: ConceptId,
    to: ConceptId,
    #[serde(default)]
    relation_type: RelationType,
}

impl InMemoryOntology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an ontology from its JSON form. Nodes without an explicit
    /// normalized `name` get one derived from `display_name` with the given
    /// normalizer, so matching stays aligned with document normalization.
    pub fn from_json(json: &str, normalizer: &TextNormalizer) -> Result<Self> {
        let file: OntologyFile = serde_json::from_str(json)?;

        let mut ontology = Self::new();
        for spec in file.nodes {
            let name = match spec.name {
                Some(name) => name,
                None => normalizer.normalize_label(&spec.display_name),
            };
            ontology.add_concept(ConceptNode::new(spec.id, name, spec.display_name))?;
        }
        for spec in file.relations {
            ontology.add_relation(&spec.from, &spec.to, spec.relation_type)?;
        }

        debug!(
            nodes = ontology.nodes.len(),
            relations = ontology.relations.len(),
            "loaded ontology"
        );
        Ok(ontology)
    }

    pub fn add_concept(&mut self, node: ConceptNode) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(OntoRankError::Validation(format!(
                "duplicate concept id: {}",
                node.id
            )));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_relation(&mut self, from: &str, to: &str, relation_type: RelationType) -> Result<()> {
        for id in [from, to] {
            if !self.index.contains_key(id) {
                return Err(OntoRankError::Validation(format!(
                    "relation endpoint is not a known concept: {id}"
                )));
            }
        }
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
        self.relations
            .push(ConceptRelation::new(from, to, relation_type));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn count_paths(
        &self,
        current: &str,
        target: &str,
        remaining: i64,
        visited: &mut HashSet<ConceptId>,
    ) -> u64 {
        if remaining <= 0 {
            return 0;
        }
        let Some(successors) = self.adjacency.get(current) else {
            return 0;
        };

        let mut total = 0;
        for next in successors {
            if next == target {
                total += 1;
            } else if !visited.contains(next.as_str()) {
                visited.insert(next.clone());
                total += self.count_paths(next, target, remaining - 1, visited);
                visited.remove(next.as_str());
            }
        }
        total
    }
}

impl GraphQuery for InMemoryOntology {
    fn concepts(&self) -> Vec<ConceptNode> {
        self.nodes.clone()
    }

    fn display_name(&self, id: &str) -> Result<String> {
        self.index
            .get(id)
            .map(|&i| self.nodes[i].display_name.clone())
            .ok_or_else(|| OntoRankError::ConceptNotFound(id.to_string()))
    }

    fn path_count(&self, from: &str, to: &str, max_length: i64) -> Result<u64> {
        if from == to || !self.index.contains_key(from) || !self.index.contains_key(to) {
            return Ok(0);
        }
        let mut visited = HashSet::from([from.to_string()]);
        Ok(self.count_paths(from, to, max_length, &mut visited))
    }

    fn sub_graph(&self, ids: &[ConceptId]) -> Result<OntologyFragment> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let nodes = self
            .nodes
            .iter()
            .filter(|n| wanted.contains(n.id.as_str()))
            .cloned()
            .collect();
        let relations = self
            .relations
            .iter()
            .filter(|r| wanted.contains(r.from.as_str()) && wanted.contains(r.to.as_str()))
            .cloned()
            .collect();

        Ok(OntologyFragment { nodes, relations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> InMemoryOntology {
        // a -> b -> d, a -> c -> d, plus a direct a -> d edge.
        let mut onto = InMemoryOntology::new();
        for id in ["a", "b", "c", "d"] {
            onto.add_concept(ConceptNode::new(id, id, id.to_uppercase())).unwrap();
        }
        onto.add_relation("a", "b", RelationType::RelatedTo).unwrap();
        onto.add_relation("a", "c", RelationType::RelatedTo).unwrap();
        onto.add_relation("b", "d", RelationType::RelatedTo).unwrap();
        onto.add_relation("c", "d", RelationType::RelatedTo).unwrap();
        onto.add_relation("a", "d", RelationType::RelatedTo).unwrap();
        onto
    }

    #[test]
    fn test_path_count_respects_length_bound() {
        let onto = diamond();
        assert_eq!(onto.path_count("a", "d", 1).unwrap(), 1);
        assert_eq!(onto.path_count("a", "d", 2).unwrap(), 3);
        assert_eq!(onto.path_count("a", "d", 0).unwrap(), 0);
    }

    #[test]
    fn test_path_count_identical_or_unknown_ids() {
        let onto = diamond();
        assert_eq!(onto.path_count("a", "a", 5).unwrap(), 0);
        assert_eq!(onto.path_count("a", "zzz", 5).unwrap(), 0);
    }

    #[test]
    fn test_path_count_no_reverse_paths() {
        let onto = diamond();
        assert_eq!(onto.path_count("d", "a", 5).unwrap(), 0);
    }

    #[test]
    fn test_cycles_do_not_loop_forever() {
        let mut onto = InMemoryOntology::new();
        for id in ["x", "y"] {
            onto.add_concept(ConceptNode::new(id, id, id)).unwrap();
        }
        onto.add_relation("x", "y", RelationType::RelatedTo).unwrap();
        onto.add_relation("y", "x", RelationType::RelatedTo).unwrap();
        assert_eq!(onto.path_count("x", "y", 10).unwrap(), 1);
    }

    #[test]
    fn test_sub_graph_is_induced() {
        let onto = diamond();
        let fragment = onto
            .sub_graph(&["a".to_string(), "b".to_string(), "d".to_string()])
            .unwrap();
        assert_eq!(fragment.nodes.len(), 3);
        // a->b, b->d, a->d survive; anything touching c is dropped.
        assert_eq!(fragment.relations.len(), 3);
    }

    #[test]
    fn test_duplicate_concept_rejected() {
        let mut onto = InMemoryOntology::new();
        onto.add_concept(ConceptNode::new("a", "a", "A")).unwrap();
        assert!(onto.add_concept(ConceptNode::new("a", "a", "A")).is_err());
    }

    #[test]
    fn test_relation_endpoints_validated() {
        let mut onto = InMemoryOntology::new();
        onto.add_concept(ConceptNode::new("a", "a", "A")).unwrap();
        assert!(onto.add_relation("a", "ghost", RelationType::IsA).is_err());
    }

    #[test]
    fn test_from_json_derives_missing_names() {
        let json = r#"{
            "nodes": [
                {"id": "c1", "display_name": "Running"},
                {"id": "c2", "display_name": "Graph", "name": "graph"}
            ],
            "relations": [{"from": "c1", "to": "c2"}]
        }"#;
        let onto = InMemoryOntology::from_json(json, &TextNormalizer::english()).unwrap();
        let concepts = onto.concepts();
        assert_eq!(concepts[0].name, "run");
        assert_eq!(concepts[1].name, "graph");
        assert_eq!(onto.display_name("c1").unwrap(), "Running");
    }
}
