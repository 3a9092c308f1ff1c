pub mod attach;
pub mod metrics;
pub mod ranking;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::core::cache::{CacheStats, MetricCache};
use crate::core::error::{OntoRankError, Result};
use crate::ontology::graph::GraphQuery;
use crate::ontology::models::{ConceptId, ConceptNode, OntologyFragment};
use crate::text::TextNormalizer;

pub use metrics::Metric;

/// Immutable position in the document's sentence order, holding the
/// original tokens for display and the normalized tokens for matching.
/// Created once at construction; only the attached-concepts list changes
/// afterwards, and only during attachment.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub index: usize,
    pub source_tokens: Vec<String>,
    pub normalized_tokens: Vec<String>,
    pub attached_nodes: Vec<ConceptNode>,
}

impl Sentence {
    pub fn source_text(&self) -> String {
        self.source_tokens.join(" ")
    }

    pub fn normalized_text(&self) -> String {
        self.normalized_tokens.join(" ")
    }

    pub fn has_attachments(&self) -> bool {
        !self.attached_nodes.is_empty()
    }

    pub(crate) fn contains_concept(&self, id: &str) -> bool {
        self.attached_nodes.iter().any(|n| n.id == id)
    }
}

/// Pairwise metric map: one entry per ordered pair of distinct attached
/// concept ids.
pub type MetricMap = HashMap<(ConceptId, ConceptId), Metric>;

/// A document being scored against an ontology.
///
/// Attachment state, metrics, rank and the memoization cache are all
/// derived from the `(document, ontology)` pairing and reset together
/// whenever the document is re-attached.
pub struct Document {
    filename: String,
    text: String,
    sentences: Vec<Sentence>,
    ontology: Option<Arc<dyn GraphQuery>>,
    attached_nodes: Vec<ConceptNode>,
    node_counts: HashMap<ConceptId, u64>,
    metrics: Option<MetricMap>,
    rank: Option<f64>,
    cache: MetricCache,
}

impl Document {
    /// Constructs and normalizes a document with the default English
    /// normalizer.
    pub fn from_text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_normalizer(filename, text, &TextNormalizer::english())
    }

    pub fn with_normalizer(
        filename: impl Into<String>,
        text: impl Into<String>,
        normalizer: &TextNormalizer,
    ) -> Self {
        let filename = filename.into();
        let text = text.into();

        let sentences = TextNormalizer::split_sentences(&text)
            .into_iter()
            .enumerate()
            .map(|(index, sentence)| Sentence {
                index,
                source_tokens: sentence.split_whitespace().map(str::to_string).collect(),
                normalized_tokens: normalizer.normalize_sentence(sentence),
                attached_nodes: Vec::new(),
            })
            .collect::<Vec<_>>();

        debug!(filename = %filename, sentences = sentences.len(), "normalized document");

        Self {
            filename,
            text,
            sentences,
            ontology: None,
            attached_nodes: Vec::new(),
            node_counts: HashMap::new(),
            metrics: None,
            rank: None,
            cache: MetricCache::new(),
        }
    }

    /// Reads and normalizes a document from disk, using the file name as
    /// the document name.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(filename, text))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_text(&self) -> &str {
        &self.text
    }

    /// Normalized sentences re-joined with `". "` and a trailing period.
    pub fn normalized_text(&self) -> String {
        let sentences: Vec<String> = self.sentences.iter().map(Sentence::normalized_text).collect();
        format!("{}.", sentences.join(". "))
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Concepts attached by the last attachment pass, in first-encountered
    /// order.
    pub fn attached_nodes(&self) -> &[ConceptNode] {
        &self.attached_nodes
    }

    /// Document-level occurrence count per attached concept id.
    pub fn node_counts(&self) -> &HashMap<ConceptId, u64> {
        &self.node_counts
    }

    /// The metric map produced by the last [`Document::rank`] call.
    pub fn metrics(&self) -> Option<&MetricMap> {
        self.metrics.as_ref()
    }

    /// The unrounded rank produced by the last [`Document::rank`] call.
    pub fn rank_value(&self) -> Option<f64> {
        self.rank
    }

    pub fn is_attached(&self) -> bool {
        self.ontology.is_some()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolves a concept id to its display name through the attached
    /// ontology.
    pub fn node_display_name(&self, id: &str) -> Result<String> {
        self.require_ontology()?.display_name(id)
    }

    /// Induced ontology sub-graph over the attached concepts.
    pub fn export_fragment(&self) -> Result<OntologyFragment> {
        let ontology = self.require_ontology()?;
        let ids: Vec<ConceptId> = self.attached_nodes.iter().map(|n| n.id.clone()).collect();
        ontology.sub_graph(&ids)
    }

    pub(crate) fn require_ontology(&self) -> Result<&Arc<dyn GraphQuery>> {
        self.ontology
            .as_ref()
            .ok_or_else(|| OntoRankError::OntologyNotSet(self.filename.clone()))
    }

    pub(crate) fn cache(&self) -> &MetricCache {
        &self.cache
    }

    pub(crate) fn set_attachment(
        &mut self,
        ontology: Arc<dyn GraphQuery>,
        attached_nodes: Vec<ConceptNode>,
        node_counts: HashMap<ConceptId, u64>,
        sentence_attachments: Vec<Vec<ConceptNode>>,
    ) {
        for (sentence, attached) in self.sentences.iter_mut().zip(sentence_attachments) {
            sentence.attached_nodes = attached;
        }
        self.ontology = Some(ontology);
        self.attached_nodes = attached_nodes;
        self.node_counts = node_counts;
    }

    pub(crate) fn reset_attachment(&mut self) {
        for sentence in &mut self.sentences {
            sentence.attached_nodes.clear();
        }
        self.ontology = None;
        self.attached_nodes.clear();
        self.node_counts.clear();
        self.metrics = None;
        self.rank = None;
        self.cache.clear();
    }

    pub(crate) fn store_ranking(&mut self, metrics: MetricMap, rank: f64) {
        self.metrics = Some(metrics);
        self.rank = Some(rank);
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document(filename=\"{}\")", self.filename)
    }
}
