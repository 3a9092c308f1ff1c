use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::ontology::models::ConceptId;

/// Per-document memoization store for the metric engine.
///
/// Each sub-computation has its own key space. Entries are unbounded and
/// live until the document is re-attached, which drops the whole store;
/// the pair-wise loop asks for the same keys Θ(concepts²) times.
#[derive(Default)]
pub struct MetricCache {
    co_occurrence: Mutex<HashMap<(ConceptId, ConceptId), u64>>,
    path_counts: Mutex<HashMap<(ConceptId, ConceptId, i64), u64>>,
    out_degrees: Mutex<HashMap<(ConceptId, i64), u64>>,
    in_degrees: Mutex<HashMap<(ConceptId, i64), u64>>,
    mean_degrees: Mutex<HashMap<i64, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl MetricCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn co_occurrence(&self, i: &str, j: &str) -> Option<u64> {
        let value = self
            .co_occurrence
            .lock()
            .get(&(i.to_string(), j.to_string()))
            .copied();
        self.record(value.is_some());
        value
    }

    pub fn store_co_occurrence(&self, i: &str, j: &str, value: u64) {
        self.co_occurrence
            .lock()
            .insert((i.to_string(), j.to_string()), value);
    }

    pub fn path_count(&self, i: &str, j: &str, n: i64) -> Option<u64> {
        let value = self
            .path_counts
            .lock()
            .get(&(i.to_string(), j.to_string(), n))
            .copied();
        self.record(value.is_some());
        value
    }

    pub fn store_path_count(&self, i: &str, j: &str, n: i64, value: u64) {
        self.path_counts
            .lock()
            .insert((i.to_string(), j.to_string(), n), value);
    }

    pub fn out_degree(&self, id: &str, b: i64) -> Option<u64> {
        let value = self.out_degrees.lock().get(&(id.to_string(), b)).copied();
        self.record(value.is_some());
        value
    }

    pub fn store_out_degree(&self, id: &str, b: i64, value: u64) {
        self.out_degrees.lock().insert((id.to_string(), b), value);
    }

    pub fn in_degree(&self, id: &str, b: i64) -> Option<u64> {
        let value = self.in_degrees.lock().get(&(id.to_string(), b)).copied();
        self.record(value.is_some());
        value
    }

    pub fn store_in_degree(&self, id: &str, b: i64, value: u64) {
        self.in_degrees.lock().insert((id.to_string(), b), value);
    }

    pub fn mean_degree(&self, b: i64) -> Option<f64> {
        let value = self.mean_degrees.lock().get(&b).copied();
        self.record(value.is_some());
        value
    }

    pub fn store_mean_degree(&self, b: i64, value: f64) {
        self.mean_degrees.lock().insert(b, value);
    }

    pub fn stats(&self) -> CacheStats {
        let size = self.co_occurrence.lock().len()
            + self.path_counts.lock().len()
            + self.out_degrees.lock().len()
            + self.in_degrees.lock().len()
            + self.mean_degrees.lock().len();

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size,
        }
    }

    pub fn clear(&self) {
        self.co_occurrence.lock().clear();
        self.path_counts.lock().clear();
        self.out_degrees.lock().clear();
        self.in_degrees.lock().clear();
        self.mean_degrees.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}
