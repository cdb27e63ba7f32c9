//! The k nearest samples

use std::sync::Arc;

use spotfield_core::{Error, Result, ValueElement};

use super::{store_query, NeighborSearch};
use crate::index::{KdTree, Neighbor};

/// Finds the `k` samples closest to the query, ascending by distance.
///
/// Fewer than `k` hits are returned only when the tree holds fewer samples.
#[derive(Debug, Clone)]
pub struct KnnSearch<T> {
    tree: Arc<KdTree<T>>,
    k: usize,
    query: Vec<f64>,
    results: Vec<Neighbor>,
}

impl<T: ValueElement> KnnSearch<T> {
    /// Create a k-nearest search; `k` must be at least 1.
    pub fn new(tree: Arc<KdTree<T>>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::invalid_parameter("k", k, "must be >= 1"));
        }
        Ok(Self {
            tree,
            k,
            query: Vec::new(),
            results: Vec::with_capacity(k + 1),
        })
    }

    /// Nearest-sample search (k = 1).
    pub fn nearest(tree: Arc<KdTree<T>>) -> Self {
        Self {
            tree,
            k: 1,
            query: Vec::new(),
            results: Vec::with_capacity(2),
        }
    }

    /// Number of neighbors requested
    pub fn k(&self) -> usize {
        self.k
    }
}

impl<T: ValueElement> NeighborSearch<T> for KnnSearch<T> {
    fn search(&mut self, query: &[f64]) -> Result<()> {
        store_query(&mut self.query, self.tree.dims(), query)?;
        self.tree.k_nearest_into(query, self.k, &mut self.results)
    }

    fn tree(&self) -> &KdTree<T> {
        &self.tree
    }

    fn query(&self) -> &[f64] {
        &self.query
    }

    fn neighbors(&self) -> &[Neighbor] {
        &self.results
    }
}
