//! Median filter

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use super::{cast_or, value_f64};
use crate::index::KdTree;
use crate::search::{NeighborSearch, RadiusSearch};

/// Median of all sample values within `radius`.
///
/// A single neighbor is returned unchanged; an even count averages the two
/// central values.
#[derive(Debug, Clone)]
pub struct MedianFilter<T> {
    search: RadiusSearch<T>,
    out_of_bounds: T,
    scratch: Vec<f64>,
}

impl<T: ValueElement> MedianFilter<T> {
    pub fn new(tree: Arc<KdTree<T>>, radius: f64, out_of_bounds: T) -> Result<Self> {
        Ok(Self {
            search: RadiusSearch::new(tree, radius)?,
            out_of_bounds,
            scratch: Vec::new(),
        })
    }

    /// The underlying radius search
    pub fn search(&self) -> &RadiusSearch<T> {
        &self.search
    }

    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        self.search.search(position)?;
        let n = self.search.len();
        match n {
            0 => return Ok(self.out_of_bounds),
            1 => return Ok(self.search.value(0)),
            _ => {}
        }

        self.scratch.clear();
        self.scratch.extend((0..n).map(|i| value_f64(&self.search, i)));
        self.scratch.sort_unstable_by(f64::total_cmp);

        let mid = n / 2;
        let median = if n % 2 == 0 {
            (self.scratch[mid - 1] + self.scratch[mid]) / 2.0
        } else {
            self.scratch[mid]
        };
        Ok(cast_or(median, self.out_of_bounds))
    }
}
