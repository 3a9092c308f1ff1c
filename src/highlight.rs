use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::document::Document;
use crate::ontology::models::ConceptId;
use crate::text::TextNormalizer;
use crate::utils::extract_ngrams;

/// Seedable highlight color source. A fixed seed yields a stable color
/// assignment.
pub struct ColorPalette {
    rng: ChaCha8Rng,
}

impl ColorPalette {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_hex(&mut self) -> String {
        format!("#{:06X}", self.rng.gen_range(0..=0xFF_FFFFu32))
    }
}

/// Byte range of `text` to tint with `color` for one attached concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub concept_id: ConceptId,
    pub start: usize,
    pub len: usize,
    pub color: String,
}

/// Computes highlight spans for a block of raw text against the
/// document's attached concepts.
///
/// Concepts are processed longest display name first so multi-word
/// phrases win over their constituent words. For each concept, every
/// n-gram of the text (n = word count of the concept's normalized name)
/// is stemmed and compared against the name; matching n-grams are located
/// back in the raw text by substring search.
pub fn highlight_spans(
    document: &Document,
    text: &str,
    normalizer: &TextNormalizer,
    palette: &mut ColorPalette,
) -> Vec<HighlightSpan> {
    let mut nodes = document.attached_nodes().to_vec();
    nodes.sort_by(|a, b| b.display_name.len().cmp(&a.display_name.len()));

    let mut spans = Vec::new();
    for node in &nodes {
        let color = palette.next_hex();
        let n = node.name.split_whitespace().count();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for ngram in extract_ngrams(text, n) {
            let normalized = ngram
                .split_whitespace()
                .map(|word| normalizer.normalize_word(word))
                .collect::<Vec<_>>()
                .join(" ");
            if normalized != node.name {
                continue;
            }
            for (start, matched) in text.match_indices(&ngram) {
                if seen.insert((start, matched.len())) {
                    spans.push(HighlightSpan {
                        concept_id: node.id.clone(),
                        start,
                        len: matched.len(),
                        color: color.clone(),
                    });
                }
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testutil::{sample_document, sample_ontology};

    #[test]
    fn test_palette_is_deterministic() {
        let mut a = ColorPalette::seeded(7);
        let mut b = ColorPalette::seeded(7);
        assert_eq!(a.next_hex(), b.next_hex());
        assert_eq!(a.next_hex(), b.next_hex());
    }

    #[test]
    fn test_palette_hex_format() {
        let mut palette = ColorPalette::seeded(1);
        let color = palette.next_hex();
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_spans_cover_attached_words() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();

        let normalizer = TextNormalizer::english();
        let text = "the graph links to the node here";
        let mut palette = ColorPalette::seeded(42);
        let spans = highlight_spans(&doc, text, &normalizer, &mut palette);

        let graph_span = spans.iter().find(|s| s.concept_id == "c-graph").unwrap();
        assert_eq!(&text[graph_span.start..graph_span.start + graph_span.len], "graph");
        let node_span = spans.iter().find(|s| s.concept_id == "c-node").unwrap();
        assert_eq!(&text[node_span.start..node_span.start + node_span.len], "node");
    }

    #[test]
    fn test_spans_are_seed_stable() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        let normalizer = TextNormalizer::english();
        let text = "a node and a graph";

        let mut p1 = ColorPalette::seeded(3);
        let mut p2 = ColorPalette::seeded(3);
        let a = highlight_spans(&doc, text, &normalizer, &mut p1);
        let b = highlight_spans(&doc, text, &normalizer, &mut p2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_attachments_no_spans() {
        let doc = sample_document();
        let normalizer = TextNormalizer::english();
        let mut palette = ColorPalette::seeded(0);
        assert!(highlight_spans(&doc, "any text", &normalizer, &mut palette).is_empty());
    }

    #[test]
    fn test_stemmed_variants_highlighted() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        let normalizer = TextNormalizer::english();
        let mut palette = ColorPalette::seeded(9);

        // "graphs" stems to the concept name "graph".
        let text = "many graphs here";
        let spans = highlight_spans(&doc, text, &normalizer, &mut palette);
        let span = spans.iter().find(|s| s.concept_id == "c-graph").unwrap();
        assert_eq!(&text[span.start..span.start + span.len], "graphs");
    }
}
