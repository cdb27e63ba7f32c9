//! Isolated sample suppression

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use crate::index::KdTree;
use crate::search::{NeighborSearch, RadiusSearch};

/// Keeps a sample's own value only if at least one other sample lies within
/// `radius`; isolated samples (and queries not located on a sample) yield
/// the out-of-bounds value.
///
/// Meant to be evaluated at sample positions, e.g. when filtering a point set.
#[derive(Debug, Clone)]
pub struct SingleSpotRemovalFilter<T> {
    search: RadiusSearch<T>,
    out_of_bounds: T,
}

impl<T: ValueElement> SingleSpotRemovalFilter<T> {
    pub fn new(tree: Arc<KdTree<T>>, radius: f64, out_of_bounds: T) -> Result<Self> {
        Ok(Self {
            search: RadiusSearch::new(tree, radius)?.excluding_query(),
            out_of_bounds,
        })
    }

    /// The underlying radius search
    pub fn search(&self) -> &RadiusSearch<T> {
        &self.search
    }

    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        self.search.search(position)?;
        match self.search.excluded() {
            Some(own) if !self.search.is_empty() => Ok(self.search.tree().value(own)),
            _ => Ok(self.out_of_bounds),
        }
    }
}
