//! Mean filter

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use super::{cast_or, value_f64};
use crate::index::KdTree;
use crate::search::{NeighborSearch, RadiusSearch};

/// Arithmetic mean of all sample values within `radius`.
#[derive(Debug, Clone)]
pub struct MeanFilter<T> {
    search: RadiusSearch<T>,
    out_of_bounds: T,
}

impl<T: ValueElement> MeanFilter<T> {
    pub fn new(tree: Arc<KdTree<T>>, radius: f64, out_of_bounds: T) -> Result<Self> {
        Ok(Self {
            search: RadiusSearch::new(tree, radius)?,
            out_of_bounds,
        })
    }

    /// The underlying radius search
    pub fn search(&self) -> &RadiusSearch<T> {
        &self.search
    }

    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        self.search.search(position)?;
        let n = self.search.len();
        if n == 0 {
            return Ok(self.out_of_bounds);
        }
        let sum: f64 = (0..n).map(|i| value_f64(&self.search, i)).sum();
        Ok(cast_or(sum / n as f64, self.out_of_bounds))
    }
}
