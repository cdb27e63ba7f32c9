//! Max-distance bounded searches

use spotfield_core::{Error, Result, ValueElement};

use super::NeighborSearch;
use crate::index::{KdTree, Neighbor};

/// Wraps a search and reports "out of bounds" when its nearest hit is
/// farther than `max_distance`.
///
/// An out-of-bounds search exposes no hits, and [`BoundedSearch::nearest_value`]
/// yields the designated out-of-bounds value instead of the true nearest
/// sample. This renders gaps in the data as "no data" rather than
/// extrapolating across them.
#[derive(Debug, Clone)]
pub struct BoundedSearch<T, S> {
    inner: S,
    max_distance: f64,
    max_distance_sq: f64,
    out_of_bounds: T,
    nearest: Option<Neighbor>,
}

impl<T: ValueElement, S: NeighborSearch<T>> BoundedSearch<T, S> {
    /// Bound `inner` at `max_distance` (finite, >= 0).
    pub fn new(inner: S, max_distance: f64, out_of_bounds: T) -> Result<Self> {
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(Error::invalid_parameter(
                "max_distance",
                max_distance,
                "must be finite and >= 0",
            ));
        }
        Ok(Self {
            inner,
            max_distance,
            max_distance_sq: max_distance * max_distance,
            out_of_bounds,
            nearest: None,
        })
    }

    /// Whether the last search found nothing within `max_distance`
    pub fn is_out_of_bounds(&self) -> bool {
        self.nearest.is_none()
    }

    /// Nearest in-bounds hit of the last search
    pub fn nearest(&self) -> Option<Neighbor> {
        self.nearest
    }

    /// Value of the nearest hit, or the out-of-bounds value
    pub fn nearest_value(&self) -> T {
        match self.nearest {
            Some(n) => self.inner.tree().value(n.index),
            None => self.out_of_bounds,
        }
    }

    /// Maximum accepted distance
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Value reported when out of bounds
    pub fn out_of_bounds(&self) -> T {
        self.out_of_bounds
    }

    /// The wrapped search
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<T: ValueElement, S: NeighborSearch<T>> NeighborSearch<T> for BoundedSearch<T, S> {
    fn search(&mut self, query: &[f64]) -> Result<()> {
        self.inner.search(query)?;
        self.nearest = self
            .inner
            .neighbors()
            .iter()
            .copied()
            .min_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq))
            .filter(|n| n.distance_sq <= self.max_distance_sq);
        Ok(())
    }

    fn tree(&self) -> &KdTree<T> {
        self.inner.tree()
    }

    fn query(&self) -> &[f64] {
        self.inner.query()
    }

    fn neighbors(&self) -> &[Neighbor] {
        if self.nearest.is_some() {
            self.inner.neighbors()
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{KnnSearch, RadiusSearch};
    use spotfield_core::PointSet;
    use std::sync::Arc;

    fn tree() -> Arc<KdTree<f32>> {
        let set = PointSet::from_parts(2, vec![0.0, 0.0, 10.0, 0.0], vec![1.0, 2.0]).unwrap();
        Arc::new(KdTree::build(set))
    }

    #[test]
    fn test_within_bound() {
        let mut search = BoundedSearch::new(KnnSearch::nearest(tree()), 2.0, -1.0).unwrap();
        search.search(&[1.0, 1.0]).unwrap();
        assert!(!search.is_out_of_bounds());
        assert_eq!(search.nearest_value(), 1.0);
        assert_eq!(search.len(), 1);
    }

    #[test]
    fn test_beyond_bound() {
        let mut search = BoundedSearch::new(KnnSearch::nearest(tree()), 2.0, -1.0).unwrap();
        search.search(&[5.0, 0.0]).unwrap();
        assert!(search.is_out_of_bounds());
        assert_eq!(search.nearest_value(), -1.0);
        assert!(search.is_empty());
        assert_eq!(search.inner().len(), 1);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let mut search = BoundedSearch::new(KnnSearch::nearest(tree()), 5.0, -1.0).unwrap();
        search.search(&[5.0, 0.0]).unwrap();
        assert!(!search.is_out_of_bounds());
    }

    #[test]
    fn test_wraps_radius_search() {
        let radius = RadiusSearch::new(tree(), 20.0).unwrap();
        let mut search = BoundedSearch::new(radius, 3.0, 0.0).unwrap();
        search.search(&[8.0, 0.0]).unwrap();
        assert_eq!(search.nearest_value(), 2.0);
        assert_eq!(search.len(), 2);

        search.search(&[5.0, 5.0]).unwrap();
        assert!(search.is_out_of_bounds());
    }

    #[test]
    fn test_invalid_bound() {
        assert!(BoundedSearch::new(KnnSearch::nearest(tree()), -1.0, 0.0).is_err());
        assert!(BoundedSearch::new(KnnSearch::nearest(tree()), f64::NAN, 0.0).is_err());
    }
}
