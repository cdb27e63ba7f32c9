//! Nearest-sample filter

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use crate::index::KdTree;
use crate::search::{check_radius, BoundedSearch, KnnSearch, NeighborSearch};

/// Copies the value of the nearest sample, or the out-of-bounds value when
/// no sample lies within `radius`.
#[derive(Debug, Clone)]
pub struct NearestFilter<T> {
    search: BoundedSearch<T, KnnSearch<T>>,
}

impl<T: ValueElement> NearestFilter<T> {
    pub fn new(tree: Arc<KdTree<T>>, radius: f64, out_of_bounds: T) -> Result<Self> {
        let radius = check_radius("radius", radius)?;
        Ok(Self {
            search: BoundedSearch::new(KnnSearch::nearest(tree), radius, out_of_bounds)?,
        })
    }

    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        self.search.search(position)?;
        Ok(self.search.nearest_value())
    }

    /// The underlying bounded search
    pub fn search(&self) -> &BoundedSearch<T, KnnSearch<T>> {
        &self.search
    }
}
