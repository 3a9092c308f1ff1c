use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

pub type ConceptId = String;

/// A named concept owned by the ontology.
///
/// `name` is the normalized (lowercased, stemmed) label used for matching
/// against normalized document text; `display_name` is the human-readable
/// label. The engine depends on nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptNode {
    pub id: ConceptId,
    pub name: String,
    pub display_name: String,
}

impl ConceptNode {
    pub fn new(
        id: impl Into<ConceptId>,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, EnumString, IntoStaticStr, PartialEq, Eq)]
pub enum RelationType {
    #[strum(serialize = "IS_A")]
    IsA,
    #[strum(serialize = "PART_OF")]
    PartOf,
    #[default]
    #[strum(serialize = "RELATED_TO")]
    RelatedTo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptRelation {
    pub from: ConceptId,
    pub to: ConceptId,
    pub relation_type: RelationType,
}

impl ConceptRelation {
    pub fn new(from: impl Into<ConceptId>, to: impl Into<ConceptId>, relation_type: RelationType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type,
        }
    }
}

/// Serializable induced sub-graph over a set of concept ids. Produced for
/// export only; the scoring path never reads one back.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OntologyFragment {
    pub nodes: Vec<ConceptNode>,
    pub relations: Vec<ConceptRelation>,
}

impl OntologyFragment {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
