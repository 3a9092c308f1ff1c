use tracing::info;

use crate::core::error::Result;
use crate::document::{Document, MetricMap};

/// Min-shift/max-scale pass over the raw scores.
///
/// The denominator is `max_S`, not the range `max_S - min_S`, so values
/// can land outside `[0, 1]` when min and max differ in sign.
pub(crate) fn normalize_scores(metrics: &mut MetricMap) {
    if metrics.is_empty() {
        return;
    }

    let mut min_s = f64::INFINITY;
    let mut max_s = f64::NEG_INFINITY;
    for metric in metrics.values() {
        min_s = min_s.min(metric.s_ij);
        max_s = max_s.max(metric.s_ij);
    }

    for metric in metrics.values_mut() {
        metric.s_ij_norm = if max_s != 0.0 {
            (metric.s_ij - min_s) / max_s
        } else {
            0.0
        };
    }
}

/// Mean of the normalized scores.
pub(crate) fn aggregate(metrics: &MetricMap) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.values().map(|m| m.s_ij_norm).sum::<f64>() / metrics.len() as f64
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl Document {
    /// Ranks the document against its attached ontology.
    ///
    /// `n` bounds the ontology path length, `b` is the co-occurrence
    /// threshold for connectivity degrees. `k` is accepted for interface
    /// compatibility but no metric consumes it.
    ///
    /// Returns the rank rounded to three decimals; populates the metric
    /// map as a side effect. An empty attachment set yields an empty map
    /// and rank 0.
    pub fn rank(&mut self, n: i64, k: i64, b: i64) -> Result<f64> {
        let _ = k;

        let graph = self.require_ontology()?.clone();
        let mut metrics = self.compute_metrics(graph.as_ref(), n, b)?;

        let rank = if metrics.is_empty() {
            0.0
        } else {
            normalize_scores(&mut metrics);
            aggregate(&metrics)
        };

        info!(
            filename = %self.filename(),
            pairs = metrics.len(),
            rank,
            "ranked document"
        );

        self.store_ranking(metrics, rank);
        Ok(round3(rank))
    }
}
