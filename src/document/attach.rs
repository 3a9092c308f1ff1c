use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::error::Result;
use crate::document::Document;
use crate::ontology::graph::GraphQuery;
use crate::ontology::models::{ConceptId, ConceptNode};
use crate::text::ConceptMatcher;
use crate::utils::safe_truncate;

impl Document {
    /// Attaches ontology concepts to this document with a one-off matcher.
    pub fn attach(&mut self, ontology: Arc<dyn GraphQuery>) -> Result<()> {
        self.attach_with(ontology, &ConceptMatcher::default())
    }

    /// Attaches ontology concepts to this document.
    ///
    /// Every concept whose normalized name occurs as a whole word in a
    /// sentence's normalized text is appended to that sentence and counted
    /// at document level. All previously attached and derived state
    /// (counts, metrics, rank, memoized intermediates) is discarded first;
    /// attaching twice against the same ontology is idempotent.
    ///
    /// This is the O(sentences × concepts) scan; matching is purely
    /// lexical.
    pub fn attach_with(
        &mut self,
        ontology: Arc<dyn GraphQuery>,
        matcher: &ConceptMatcher,
    ) -> Result<()> {
        self.reset_attachment();

        let concepts = ontology.concepts();
        let mut attached_nodes: Vec<ConceptNode> = Vec::new();
        let mut node_counts: HashMap<ConceptId, u64> = HashMap::new();
        let mut sentence_attachments: Vec<Vec<ConceptNode>> = Vec::new();

        for sentence in self.sentences() {
            let text = sentence.normalized_text();
            let mut attached_here: Vec<ConceptNode> = Vec::new();

            for concept in &concepts {
                let count = matcher.count_occurrences(&concept.name, &text)? as u64;
                if count == 0 {
                    continue;
                }
                let entry = node_counts.entry(concept.id.clone()).or_insert(0);
                if *entry == 0 {
                    attached_nodes.push(concept.clone());
                }
                *entry += count;
                attached_here.push(concept.clone());

                debug!(
                    concept = %concept.id,
                    sentence = sentence.index,
                    count,
                    text = %safe_truncate(&text, 40),
                    "attached concept"
                );
            }

            sentence_attachments.push(attached_here);
        }

        info!(
            filename = %self.filename(),
            concepts = concepts.len(),
            attached = attached_nodes.len(),
            "attached document to ontology"
        );

        self.set_attachment(ontology, attached_nodes, node_counts, sentence_attachments);
        Ok(())
    }
}
