//! n-dimensional k-d tree for spatial indexing
//!
//! Nodes live in a flat arena addressed by index, so a built tree is plain
//! immutable data: share it behind an `Arc` and let any number of searches
//! traverse it concurrently.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use spotfield_core::point::dist_sq;
use spotfield_core::{Error, PointSet, RealInterval, Result, Sample, ValueElement};
use tracing::debug;

use super::Neighbor;

/// A k-d tree over the samples of a [`PointSet`].
#[derive(Debug, Clone)]
pub struct KdTree<T> {
    nodes: Vec<KdNode>,
    /// Owned copy of the indexed samples, in original order
    points: PointSet<T>,
    depth: usize,
}

#[derive(Debug, Clone, Copy)]
struct KdNode {
    /// Index into `points`
    point_idx: usize,
    /// Split dimension
    split_dim: usize,
    /// Left child index (None = leaf)
    left: Option<usize>,
    /// Right child index (None = leaf)
    right: Option<usize>,
}

impl<T: ValueElement> KdTree<T> {
    /// Build a k-d tree from a point set.
    ///
    /// Splits at the median coordinate along rotating dimensions, giving a
    /// balanced tree of depth ⌈log2(n + 1)⌉. Construction is O(n log n).
    pub fn build(points: PointSet<T>) -> Self {
        let n = points.len();
        let mut nodes = Vec::with_capacity(n);
        let mut depth = 0;

        if n > 0 {
            let mut indices: Vec<usize> = (0..n).collect();
            build_recursive(&points, &mut indices, 0, &mut nodes, &mut depth);
        }

        debug!(points = n, dims = points.dims(), depth, "built k-d tree");

        Self {
            nodes,
            points,
            depth,
        }
    }

    /// Number of samples in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of the indexed positions.
    pub fn dims(&self) -> usize {
        self.points.dims()
    }

    /// Number of levels (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The indexed samples in their original order.
    pub fn points(&self) -> &PointSet<T> {
        &self.points
    }

    /// Position of sample `index`
    #[inline]
    pub fn position(&self, index: usize) -> &[f64] {
        self.points.position(index)
    }

    /// Value of sample `index`
    #[inline]
    pub fn value(&self, index: usize) -> T {
        self.points.value(index)
    }

    /// Bounding interval of all indexed positions.
    pub fn interval(&self) -> Option<RealInterval> {
        self.points.bounds()
    }

    /// Walk every node and return its sample.
    ///
    /// The result holds exactly the indexed multiset of samples, in tree order.
    pub fn samples(&self) -> Vec<Sample<T>> {
        let mut out = Vec::with_capacity(self.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut stack = vec![0usize];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            out.push(self.points.sample(node.point_idx));
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }
        out
    }

    /// Find the single nearest sample to `query`.
    ///
    /// Returns `Ok(None)` if the tree is empty.
    pub fn nearest(&self, query: &[f64]) -> Result<Option<Neighbor>> {
        Error::check_dims(self.dims(), query.len())?;
        if self.nodes.is_empty() {
            return Ok(None);
        }

        let mut best = Neighbor {
            index: 0,
            distance_sq: f64::INFINITY,
        };
        self.nearest_recursive(0, query, &mut best);
        Ok(Some(best))
    }

    /// Find up to `k` nearest samples, sorted by ascending distance.
    pub fn k_nearest(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>> {
        let mut out = Vec::with_capacity(k.min(self.len()));
        self.k_nearest_into(query, k, &mut out)?;
        Ok(out)
    }

    /// Like [`KdTree::k_nearest`], reusing `out` as the result buffer.
    ///
    /// Ties keep the sample reached first in traversal order.
    pub fn k_nearest_into(&self, query: &[f64], k: usize, out: &mut Vec<Neighbor>) -> Result<()> {
        Error::check_dims(self.dims(), query.len())?;
        out.clear();
        if self.nodes.is_empty() || k == 0 {
            return Ok(());
        }
        self.knn_recursive(0, query, k, out);
        Ok(())
    }

    /// Find all samples within `radius` of `query` (boundary inclusive).
    ///
    /// Returns results in no particular order.
    pub fn within_radius(&self, query: &[f64], radius: f64) -> Result<Vec<Neighbor>> {
        let mut out = Vec::new();
        self.within_radius_into(query, radius, &mut out)?;
        Ok(out)
    }

    /// Like [`KdTree::within_radius`], reusing `out` as the result buffer.
    pub fn within_radius_into(
        &self,
        query: &[f64],
        radius: f64,
        out: &mut Vec<Neighbor>,
    ) -> Result<()> {
        Error::check_dims(self.dims(), query.len())?;
        out.clear();
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 {
            return Ok(());
        }
        self.radius_recursive(0, query, radius * radius, out);
        Ok(())
    }

    fn nearest_recursive(&self, node_idx: usize, query: &[f64], best: &mut Neighbor) {
        let node = &self.nodes[node_idx];
        let p = self.points.position(node.point_idx);

        let d2 = dist_sq(query, p);
        if d2 < best.distance_sq {
            *best = Neighbor {
                index: node.point_idx,
                distance_sq: d2,
            };
        }

        // Search the closer side first
        let diff = query[node.split_dim] - p[node.split_dim];
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.nearest_recursive(child, query, best);
        }

        if diff * diff < best.distance_sq
            && let Some(child) = second
        {
            self.nearest_recursive(child, query, best);
        }
    }

    fn knn_recursive(&self, node_idx: usize, query: &[f64], k: usize, heap: &mut Vec<Neighbor>) {
        let node = &self.nodes[node_idx];
        let p = self.points.position(node.point_idx);
        let d2 = dist_sq(query, p);

        // `heap` is kept sorted ascending; the last entry is the k-th best
        if heap.len() < k || d2 < heap[heap.len() - 1].distance_sq {
            if heap.len() >= k {
                heap.pop();
            }
            let pos = heap.partition_point(|n| n.distance_sq <= d2);
            heap.insert(
                pos,
                Neighbor {
                    index: node.point_idx,
                    distance_sq: d2,
                },
            );
        }

        let diff = query[node.split_dim] - p[node.split_dim];
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.knn_recursive(child, query, k, heap);
        }

        let threshold = if heap.len() >= k {
            heap[heap.len() - 1].distance_sq
        } else {
            f64::INFINITY
        };

        if diff * diff < threshold
            && let Some(child) = second
        {
            self.knn_recursive(child, query, k, heap);
        }
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        query: &[f64],
        radius_sq: f64,
        out: &mut Vec<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let p = self.points.position(node.point_idx);
        let d2 = dist_sq(query, p);

        if d2 <= radius_sq {
            out.push(Neighbor {
                index: node.point_idx,
                distance_sq: d2,
            });
        }

        // Left holds coordinates <= split, right holds >= split
        let diff = query[node.split_dim] - p[node.split_dim];
        let plane_in_range = diff * diff <= radius_sq;

        if let Some(left) = node.left
            && (diff <= 0.0 || plane_in_range)
        {
            self.radius_recursive(left, query, radius_sq, out);
        }

        if let Some(right) = node.right
            && (diff >= 0.0 || plane_in_range)
        {
            self.radius_recursive(right, query, radius_sq, out);
        }
    }
}

/// Recursively build the k-d tree, returning the index of the subtree root.
fn build_recursive<T: ValueElement>(
    points: &PointSet<T>,
    indices: &mut [usize],
    level: usize,
    nodes: &mut Vec<KdNode>,
    depth: &mut usize,
) -> usize {
    let split_dim = level % points.dims();
    *depth = (*depth).max(level + 1);

    // Partition around the median along the split dimension
    let median = indices.len() / 2;
    indices.select_nth_unstable_by(median, |&a, &b| {
        points.position(a)[split_dim].total_cmp(&points.position(b)[split_dim])
    });
    let point_idx = indices[median];

    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx,
        split_dim,
        left: None,
        right: None,
    });

    let (left, rest) = indices.split_at_mut(median);
    let right = &mut rest[1..];

    if !left.is_empty() {
        let left_idx = build_recursive(points, left, level + 1, nodes, depth);
        nodes[node_idx].left = Some(left_idx);
    }

    if !right.is_empty() {
        let right_idx = build_recursive(points, right, level + 1, nodes, depth);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> PointSet<f64> {
        PointSet::from_parts(
            2,
            vec![
                2.0, 3.0, 5.0, 4.0, 9.0, 6.0, 4.0, 7.0, 8.0, 1.0, 7.0, 2.0, 1.0, 8.0, 6.0, 5.0,
            ],
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0],
        )
        .unwrap()
    }

    fn scattered(n: usize, dims: usize) -> PointSet<f64> {
        let mut set = PointSet::with_capacity(dims, n).unwrap();
        let mut pos = vec![0.0; dims];
        for i in 0..n {
            for (d, p) in pos.iter_mut().enumerate() {
                *p = ((i * (7 + 4 * d) + 13 * (d + 1)) % 100) as f64 * 0.37;
            }
            set.push(&pos, i as f64).unwrap();
        }
        set
    }

    fn brute_force(set: &PointSet<f64>, query: &[f64]) -> Vec<f64> {
        let mut d: Vec<f64> = set.iter().map(|(p, _)| dist_sq(p, query)).collect();
        d.sort_by(f64::total_cmp);
        d
    }

    #[test]
    fn test_build_and_size() {
        let tree = KdTree::build(sample_points());
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.dims(), 2);
        assert!(!tree.is_empty());
        // 8 points → 4 levels
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn test_balanced_depth() {
        for n in [1usize, 2, 3, 7, 8, 100, 1023, 1024] {
            let tree = KdTree::build(scattered(n, 3));
            let expected = (usize::BITS - n.leading_zeros()) as usize;
            assert_eq!(tree.depth(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree: KdTree<f64> = KdTree::build(PointSet::new(2).unwrap());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.nearest(&[0.0, 0.0]).unwrap().is_none());
        assert!(tree.k_nearest(&[0.0, 0.0], 3).unwrap().is_empty());
        assert!(tree.within_radius(&[0.0, 0.0], 10.0).unwrap().is_empty());
        assert!(tree.samples().is_empty());
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let tree = KdTree::build(sample_points());
        assert!(matches!(
            tree.nearest(&[1.0, 2.0, 3.0]),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(tree.within_radius(&[1.0], 1.0).is_err());
        assert!(tree.k_nearest(&[1.0], 1).is_err());
    }

    #[test]
    fn test_nearest_exact() {
        let tree = KdTree::build(sample_points());
        let result = tree.nearest(&[5.0, 4.0]).unwrap().unwrap();
        assert!(result.distance_sq < 1e-10);
        assert_eq!(tree.value(result.index), 20.0);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let set = scattered(500, 2);
        let tree = KdTree::build(set.clone());

        for qx in 0..20 {
            for qy in 0..20 {
                let q = [qx as f64 * 2.0 + 0.3, qy as f64 * 2.0 + 0.7];
                let result = tree.nearest(&q).unwrap().unwrap();
                let bf = brute_force(&set, &q)[0];
                assert!(
                    (result.distance_sq - bf).abs() < 1e-10,
                    "Mismatch at {:?}: tree={:.4}, bf={:.4}",
                    q,
                    result.distance_sq,
                    bf
                );
            }
        }
    }

    #[test]
    fn test_k_nearest_matches_brute_force() {
        let set = scattered(400, 3);
        let tree = KdTree::build(set.clone());

        for i in 0..25 {
            let q = [i as f64 * 1.3, 30.0 - i as f64, (i % 5) as f64 * 7.0];
            let results = tree.k_nearest(&q, 7).unwrap();
            assert_eq!(results.len(), 7);

            let bf = brute_force(&set, &q);
            for (j, r) in results.iter().enumerate() {
                assert!(
                    (r.distance_sq - bf[j]).abs() < 1e-10,
                    "k={}: tree={:.4}, bf={:.4}",
                    j,
                    r.distance_sq,
                    bf[j]
                );
            }
            for w in results.windows(2) {
                assert!(w[1].distance_sq >= w[0].distance_sq);
            }
        }
    }

    #[test]
    fn test_k_nearest_more_than_points() {
        let tree = KdTree::build(sample_points());
        let results = tree.k_nearest(&[5.0, 5.0], 100).unwrap();
        assert_eq!(results.len(), 8);
    }

    #[test]
    fn test_within_radius_matches_brute_force() {
        let set = scattered(600, 2);
        let tree = KdTree::build(set.clone());

        for radius in [0.1, 1.0, 2.5, 10.0, 100.0] {
            for i in 0..15 {
                let q = [i as f64 * 2.4, 36.0 - i as f64 * 2.0];
                let results = tree.within_radius(&q, radius).unwrap();
                for r in &results {
                    assert!(r.distance_sq <= radius * radius);
                }
                let bf_count = brute_force(&set, &q)
                    .iter()
                    .filter(|&&d| d <= radius * radius)
                    .count();
                assert_eq!(results.len(), bf_count, "radius {} query {:?}", radius, q);
            }
        }
    }

    #[test]
    fn test_within_radius_inclusive_boundary() {
        let set = PointSet::from_parts(1, vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let tree = KdTree::build(set);
        let results = tree.within_radius(&[1.0], 1.0).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_within_radius_zero() {
        let tree = KdTree::build(sample_points());
        let results = tree.within_radius(&[5.0, 5.0], 0.0).unwrap();
        assert!(results.is_empty());
        let exact = tree.within_radius(&[5.0, 4.0], 0.0).unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn test_samples_recover_point_set() {
        let set = scattered(257, 3);
        let tree = KdTree::build(set.clone());

        let mut recovered = tree.samples();
        let mut original: Vec<Sample<f64>> = (0..set.len()).map(|i| set.sample(i)).collect();
        let key = |s: &Sample<f64>| s.value;
        recovered.sort_by(|a, b| key(a).total_cmp(&key(b)));
        original.sort_by(|a, b| key(a).total_cmp(&key(b)));
        assert_eq!(recovered, original);
    }

    #[test]
    fn test_collinear_points() {
        let set = PointSet::from_parts(
            2,
            (0..10).flat_map(|i| [i as f64, 0.0]).collect(),
            (0..10).map(|i| i as f64).collect(),
        )
        .unwrap();
        let tree = KdTree::build(set);

        let result = tree.nearest(&[4.5, 0.0]).unwrap().unwrap();
        assert!(result.distance_sq <= 0.25 + 1e-10);

        let knn = tree.k_nearest(&[4.5, 0.0], 3).unwrap();
        assert_eq!(knn.len(), 3);
    }

    #[test]
    fn test_duplicate_positions() {
        let set = PointSet::from_parts(2, vec![1.0; 20], (0..10).map(|i| i as f64).collect())
            .unwrap();
        let tree = KdTree::build(set);
        assert_eq!(tree.within_radius(&[1.0, 1.0], 0.0).unwrap().len(), 10);
        assert_eq!(tree.k_nearest(&[0.0, 0.0], 4).unwrap().len(), 4);
    }
}
