//! All samples within a radius

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use super::{check_radius, store_query, NeighborSearch};
use crate::index::{KdTree, Neighbor};

/// Finds every sample within `radius` of the query, boundary inclusive.
///
/// Hits are unordered. With [`RadiusSearch::excluding_query`], one sample
/// sitting exactly on the query position is left out of the hits and
/// remembered in [`RadiusSearch::excluded`]; further samples at the same
/// position still count as neighbors.
#[derive(Debug, Clone)]
pub struct RadiusSearch<T> {
    tree: Arc<KdTree<T>>,
    radius: f64,
    exclude_query: bool,
    excluded: Option<usize>,
    query: Vec<f64>,
    results: Vec<Neighbor>,
}

impl<T: ValueElement> RadiusSearch<T> {
    /// Create a radius search; `radius` must be finite and > 0.
    pub fn new(tree: Arc<KdTree<T>>, radius: f64) -> Result<Self> {
        let radius = check_radius("radius", radius)?;
        Ok(Self {
            tree,
            radius,
            exclude_query: false,
            excluded: None,
            query: Vec::new(),
            results: Vec::new(),
        })
    }

    /// Leave the sample located at the query position out of the hits.
    pub fn excluding_query(mut self) -> Self {
        self.exclude_query = true;
        self
    }

    /// Search radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius for subsequent searches.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.radius = check_radius("radius", radius)?;
        Ok(())
    }

    /// Sample index removed from the last search's hits, if any.
    pub fn excluded(&self) -> Option<usize> {
        self.excluded
    }
}

impl<T: ValueElement> NeighborSearch<T> for RadiusSearch<T> {
    fn search(&mut self, query: &[f64]) -> Result<()> {
        store_query(&mut self.query, self.tree.dims(), query)?;
        self.tree.within_radius_into(query, self.radius, &mut self.results)?;

        self.excluded = None;
        if self.exclude_query
            && let Some(i) = self.results.iter().position(|n| n.distance_sq == 0.0)
        {
            self.excluded = Some(self.results.swap_remove(i).index);
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use spotfield_core::PointSet;

    fn line_tree() -> Arc<KdTree<f64>> {
        let set = PointSet::from_parts(
            1,
            vec![0.0, 1.0, 2.0, 3.0, 3.0],
            vec![10.0, 11.0, 12.0, 13.0, 14.0],
        )
        .unwrap();
        Arc::new(KdTree::build(set))
    }

    #[test]
    fn test_radius_hits() {
        let mut search = RadiusSearch::new(line_tree(), 1.0).unwrap();
        search.search(&[1.0]).unwrap();
        assert_eq!(search.len(), 3);
        let mut values: Vec<f64> = (0..search.len()).map(|i| search.value(i)).collect();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, vec![10.0, 11.0, 12.0]);
        assert_eq!(search.query(), &[1.0]);
    }

    #[test]
    fn test_invalid_radius() {
        assert!(RadiusSearch::new(line_tree(), 0.0).is_err());
        assert!(RadiusSearch::new(line_tree(), -1.0).is_err());
        assert!(RadiusSearch::new(line_tree(), f64::NAN).is_err());
        let mut search = RadiusSearch::new(line_tree(), 1.0).unwrap();
        assert!(search.set_radius(f64::INFINITY).is_err());
        assert_eq!(search.radius(), 1.0);
    }

    #[test]
    fn test_excluding_query() {
        let mut search = RadiusSearch::new(line_tree(), 0.5).unwrap().excluding_query();
        search.search(&[0.0]).unwrap();
        assert!(search.is_empty());
        assert_eq!(search.excluded(), Some(0));

        // Duplicate position: one is excluded, the other remains a neighbor
        search.search(&[3.0]).unwrap();
        assert_eq!(search.len(), 1);
        assert!(search.excluded().is_some());

        // Off-sample query excludes nothing
        search.search(&[0.25]).unwrap();
        assert_eq!(search.len(), 1);
        assert_eq!(search.excluded(), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = RadiusSearch::new(line_tree(), 1.0).unwrap();
        a.search(&[0.0]).unwrap();
        let mut b = a.clone();
        assert_eq!(b.query(), &[0.0]);
        assert_eq!(b.len(), a.len());

        b.search(&[3.0]).unwrap();
        assert_eq!(a.query(), &[0.0]);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut search = RadiusSearch::new(line_tree(), 1.0).unwrap();
        assert!(search.search(&[0.0, 1.0]).is_err());
    }
}
