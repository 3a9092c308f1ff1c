use tracing::trace;

use crate::core::error::Result;
use crate::document::{Document, MetricMap};
use crate::ontology::graph::GraphQuery;

/// Pairwise relatedness metrics for one ordered pair of distinct attached
/// concepts. Written once per rank computation; `s_ij_norm` is filled in by
/// the normalization pass and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metric {
    /// Directed ontology paths of bounded length between the pair.
    pub p_ij: u64,
    /// Sentences in which both concepts are attached.
    pub e_ij: u64,
    /// Out-connectivity degree of the first concept.
    pub b_i: u64,
    /// In-connectivity degree of the second concept.
    pub b_j: u64,
    /// Mean connectivity degree across all attached concepts.
    pub u_b: f64,
    pub p_ij_sqrt: f64,
    /// Raw composite relatedness score.
    pub s_ij: f64,
    /// Min-shifted, max-scaled score.
    pub s_ij_norm: f64,
}

/// The composite score. Pairs that are graph-reachable and textually
/// co-occurring score high; pairs whose endpoints are already hubs are
/// damped by the `b_i + b_j` denominator.
pub(crate) fn composite_score(p: u64, e: u64, b_i: u64, b_j: u64, u: f64) -> (f64, f64) {
    let sqrt_p = if p > 0 { (p as f64).sqrt() } else { 0.0 };
    let s = if b_i + b_j != 0 {
        sqrt_p * (2.0 * u * e as f64) / ((b_i + b_j) as f64)
    } else {
        0.0
    };
    (sqrt_p, s)
}

impl Document {
    /// Number of sentences whose attached-concepts list contains both ids.
    /// Symmetric in value, cached independently per ordered key.
    pub(crate) fn co_occurrence(&self, i: &str, j: &str) -> u64 {
        if let Some(cached) = self.cache().co_occurrence(i, j) {
            return cached;
        }
        let count = self
            .sentences()
            .iter()
            .filter(|s| s.contains_concept(i) && s.contains_concept(j))
            .count() as u64;
        self.cache().store_co_occurrence(i, j, count);
        count
    }

    /// Bounded-length path count, delegated to the graph collaborator. The
    /// collaborator is treated as an expensive oracle: once a `(i, j, n)`
    /// key is cached it is never queried again for the document's lifetime.
    pub(crate) fn path_count(
        &self,
        graph: &dyn GraphQuery,
        i: &str,
        j: &str,
        n: i64,
    ) -> Result<u64> {
        if let Some(cached) = self.cache().path_count(i, j, n) {
            return Ok(cached);
        }
        let count = graph.path_count(i, j, n)?;
        self.cache().store_path_count(i, j, n, count);
        Ok(count)
    }

    /// Out-degree: other attached concepts co-occurring with `i` at least
    /// `b` times.
    pub(crate) fn connectivity(&self, i: &str, b: i64) -> u64 {
        if let Some(cached) = self.cache().out_degree(i, b) {
            return cached;
        }
        let degree = self
            .attached_nodes()
            .iter()
            .filter(|n| n.id != i)
            .filter(|n| self.co_occurrence(i, &n.id) as i64 >= b)
            .count() as u64;
        self.cache().store_out_degree(i, b, degree);
        degree
    }

    /// In-degree over the mirrored argument position. Reduces to the same
    /// value as [`Document::connectivity`] because co-occurrence is
    /// symmetric, but is cached under its own key space to match its call
    /// site.
    pub(crate) fn connectivity_in(&self, j: &str, b: i64) -> u64 {
        if let Some(cached) = self.cache().in_degree(j, b) {
            return cached;
        }
        let degree = self
            .attached_nodes()
            .iter()
            .filter(|n| n.id != j)
            .filter(|n| self.co_occurrence(&n.id, j) as i64 >= b)
            .count() as u64;
        self.cache().store_in_degree(j, b, degree);
        degree
    }

    /// Arithmetic mean of the out-connectivity over all attached concepts;
    /// 0 when nothing is attached.
    pub(crate) fn mean_connectivity(&self, b: i64) -> f64 {
        if let Some(cached) = self.cache().mean_degree(b) {
            return cached;
        }
        let attached = self.attached_nodes();
        let mean = if attached.is_empty() {
            0.0
        } else {
            let total: u64 = attached.iter().map(|n| self.connectivity(&n.id, b)).sum();
            total as f64 / attached.len() as f64
        };
        self.cache().store_mean_degree(b, mean);
        mean
    }

    /// Builds the full pairwise metric map for thresholds `n` and `b`.
    /// Raw scores only; normalization happens in the ranking pass.
    pub(crate) fn compute_metrics(&self, graph: &dyn GraphQuery, n: i64, b: i64) -> Result<MetricMap> {
        let mut metrics = MetricMap::new();

        for node_i in self.attached_nodes() {
            for node_j in self.attached_nodes() {
                if node_i.id == node_j.id {
                    continue;
                }

                let p_ij = self.path_count(graph, &node_i.id, &node_j.id, n)?;
                let e_ij = self.co_occurrence(&node_i.id, &node_j.id);
                let b_i = self.connectivity(&node_i.id, b);
                let b_j = self.connectivity_in(&node_j.id, b);
                let u_b = self.mean_connectivity(b);
                let (p_ij_sqrt, s_ij) = composite_score(p_ij, e_ij, b_i, b_j, u_b);

                trace!(
                    i = %node_i.id,
                    j = %node_j.id,
                    p_ij,
                    e_ij,
                    s_ij,
                    "computed pair metric"
                );

                metrics.insert(
                    (node_i.id.clone(), node_j.id.clone()),
                    Metric {
                        p_ij,
                        e_ij,
                        b_i,
                        b_j,
                        u_b,
                        p_ij_sqrt,
                        s_ij,
                        s_ij_norm: 0.0,
                    },
                );
            }
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::core::error::Result;
    use crate::document::testutil::{sample_document, sample_ontology};
    use crate::ontology::memory::InMemoryOntology;
    use crate::ontology::models::{ConceptId, ConceptNode, OntologyFragment};

    /// Graph double that counts how often the path oracle is consulted.
    struct CountingGraph {
        inner: Arc<InMemoryOntology>,
        calls: AtomicUsize,
    }

    impl CountingGraph {
        fn new(inner: Arc<InMemoryOntology>) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl GraphQuery for CountingGraph {
        fn concepts(&self) -> Vec<ConceptNode> {
            self.inner.concepts()
        }

        fn display_name(&self, id: &str) -> Result<String> {
            self.inner.display_name(id)
        }

        fn path_count(&self, from: &str, to: &str, max_length: i64) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.path_count(from, to, max_length)
        }

        fn sub_graph(&self, ids: &[ConceptId]) -> Result<OntologyFragment> {
            self.inner.sub_graph(ids)
        }
    }

    #[test]
    fn test_composite_score_worked_example() {
        // p=4, e=3, b_i=1, b_j=2, u=1.5 => sqrt(4) * (2*1.5*3) / 3 = 6.
        let (sqrt_p, s) = composite_score(4, 3, 1, 2, 1.5);
        assert!((sqrt_p - 2.0).abs() < 1e-12);
        assert!((s - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_composite_score_zero_paths() {
        // Attached but never reachable: sqrt_p = 0 forces s = 0 regardless
        // of the connectivity denominator.
        let (sqrt_p, s) = composite_score(0, 0, 1, 2, 1.5);
        assert_eq!(sqrt_p, 0.0);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_composite_score_zero_connectivity_sum() {
        let (_, s) = composite_score(4, 3, 0, 0, 1.5);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_metric_map_covers_all_ordered_pairs() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        doc.rank(2, 1, 1).unwrap();

        let metrics = doc.metrics().unwrap();
        let attached = doc.attached_nodes().len();
        assert_eq!(metrics.len(), attached * (attached - 1));
        assert!(metrics.keys().all(|(i, j)| i != j));
    }

    #[test]
    fn test_co_occurrence_is_symmetric_in_value() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        doc.rank(2, 1, 1).unwrap();

        let metrics = doc.metrics().unwrap();
        for ((i, j), metric) in metrics {
            let mirrored = &metrics[&(j.clone(), i.clone())];
            assert_eq!(metric.e_ij, mirrored.e_ij);
        }
    }

    #[test]
    fn test_pair_metrics_against_hand_computation() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        doc.rank(2, 1, 1).unwrap();

        let metrics = doc.metrics().unwrap();
        let gn = &metrics[&("c-graph".to_string(), "c-node".to_string())];
        assert_eq!(gn.p_ij, 1);
        assert_eq!(gn.e_ij, 2);
        assert_eq!(gn.b_i, 1);
        assert_eq!(gn.b_j, 2);
        assert!((gn.u_b - 4.0 / 3.0).abs() < 1e-12);
        assert!((gn.s_ij - 16.0 / 9.0).abs() < 1e-12);

        // p(c-graph, c-data) = 1 via c-node, but e = 0 kills the score.
        let gd = &metrics[&("c-graph".to_string(), "c-data".to_string())];
        assert_eq!(gd.p_ij, 1);
        assert_eq!(gd.e_ij, 0);
        assert_eq!(gd.s_ij, 0.0);

        // No reverse paths.
        let ng = &metrics[&("c-node".to_string(), "c-graph".to_string())];
        assert_eq!(ng.p_ij, 0);
        assert_eq!(ng.s_ij, 0.0);
    }

    #[test]
    fn test_path_oracle_called_once_per_key() {
        let graph = Arc::new(CountingGraph::new(sample_ontology()));
        let mut doc = sample_document();
        doc.attach(graph.clone()).unwrap();

        doc.rank(2, 1, 1).unwrap();
        let pairs = doc.attached_nodes().len() * (doc.attached_nodes().len() - 1);
        assert_eq!(graph.calls.load(Ordering::SeqCst), pairs);

        // Same thresholds again: everything served from the document cache.
        doc.rank(2, 1, 1).unwrap();
        assert_eq!(graph.calls.load(Ordering::SeqCst), pairs);

        // A new length bound is a new key space.
        doc.rank(3, 1, 1).unwrap();
        assert_eq!(graph.calls.load(Ordering::SeqCst), 2 * pairs);
    }

    #[test]
    fn test_memoized_values_are_stable() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();

        let first = doc.co_occurrence("c-graph", "c-node");
        let second = doc.co_occurrence("c-graph", "c-node");
        assert_eq!(first, second);
        assert_eq!(doc.mean_connectivity(1), doc.mean_connectivity(1));
        assert!(doc.cache_stats().hits >= 2);
    }

    #[test]
    fn test_negative_threshold_accepted() {
        let mut doc = sample_document();
        doc.attach(sample_ontology()).unwrap();
        // b = -1: every pair passes the threshold, degrees saturate.
        assert_eq!(doc.connectivity("c-graph", -1), 2);
        // n = 0: the oracle reports no paths at all.
        doc.rank(0, 1, 1).unwrap();
        assert!(doc.metrics().unwrap().values().all(|m| m.p_ij == 0));
    }
}
