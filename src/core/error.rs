use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntoRankError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ontology is not attached to document: {0}")]
    OntologyNotSet(String),

    #[error("Graph query error: {0}")]
    Graph(String),

    #[error("Concept not found: {0}")]
    ConceptNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OntoRankError>;
