//! Sample density filter

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use super::cast_or;
use crate::index::KdTree;
use crate::search::{NeighborSearch, RadiusSearch};

/// Number of samples within `radius`, ignoring their values.
///
/// An empty neighborhood yields the out-of-bounds value like every other
/// filter; use zero as the out-of-bounds value for a plain count.
#[derive(Debug, Clone)]
pub struct DensityFilter<T> {
    search: RadiusSearch<T>,
    out_of_bounds: T,
}

impl<T: ValueElement> DensityFilter<T> {
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
        match self.search.len() {
            0 => Ok(self.out_of_bounds),
            n => Ok(cast_or(n as f64, self.out_of_bounds)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotfield_core::PointSet;

    #[test]
    fn test_counts_neighbors() {
        let set = PointSet::from_parts(
            2,
            vec![0.0, 0.0, 0.5, 0.0, 0.0, 0.5, 3.0, 3.0],
            vec![100u8, 200, 250, 1],
        )
        .unwrap();
        let mut f = DensityFilter::new(Arc::new(KdTree::build(set)), 1.0, 0).unwrap();
        assert_eq!(f.filter(&[0.0, 0.0]).unwrap(), 3);
        assert_eq!(f.filter(&[3.0, 3.5]).unwrap(), 1);
        assert_eq!(f.filter(&[-5.0, 0.0]).unwrap(), 0);
    }
}
