//! Spatial index over sample positions

mod kdtree;

pub use kdtree::KdTree;

/// One search hit: the sample index within the tree and its squared distance
/// to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance_sq: f64,
}

impl Neighbor {
    /// Euclidean distance to the query
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}
