//! Stateful neighbor searches over a shared [`KdTree`]
//!
//! A search owns only its last query and a reusable result buffer; the tree
//! is shared read-only through an `Arc`. Cloning a search is cheap and
//! yields an independent cursor positioned at the same last query, which is
//! how each worker thread gets its own.
//!
//! - [`RadiusSearch`]: every sample within a radius, optionally excluding the
//!   sample at the query position
//! - [`KnnSearch`]: the k nearest samples, ascending by distance
//! - [`BoundedSearch`]: wraps either and reports "out of bounds" when the
//!   nearest hit is farther than a maximum distance

mod bounded;
mod knn;
mod radius;

pub use bounded::BoundedSearch;
pub use knn::KnnSearch;
pub use radius::RadiusSearch;

use spotfield_core::{Error, Result, ValueElement};

use crate::index::{KdTree, Neighbor};

/// Common interface of all neighbor searches.
///
/// Implementations are not meant to be shared between threads while
/// searching; clone one per thread instead.
pub trait NeighborSearch<T: ValueElement>: Clone + Send {
    /// Run a search at `query`, replacing the previous results.
    fn search(&mut self, query: &[f64]) -> Result<()>;

    /// The tree being searched
    fn tree(&self) -> &KdTree<T>;

    /// Last query position (empty before the first search)
    fn query(&self) -> &[f64];

    /// Hits of the last search
    fn neighbors(&self) -> &[Neighbor];

    /// Number of hits
    fn len(&self) -> usize {
        self.neighbors().len()
    }

    /// Whether the last search found nothing
    fn is_empty(&self) -> bool {
        self.neighbors().is_empty()
    }

    /// Value of hit `i`
    #[inline]
    fn value(&self, i: usize) -> T {
        self.tree().value(self.neighbors()[i].index)
    }

    /// Position of hit `i`
    #[inline]
    fn position(&self, i: usize) -> &[f64] {
        self.tree().position(self.neighbors()[i].index)
    }

    /// Squared distance of hit `i`
    #[inline]
    fn distance_sq(&self, i: usize) -> f64 {
        self.neighbors()[i].distance_sq
    }

    /// Distance of hit `i`
    #[inline]
    fn distance(&self, i: usize) -> f64 {
        self.neighbors()[i].distance()
    }
}

/// Reject radii that are not finite and strictly positive.
pub(crate) fn check_radius(name: &'static str, radius: f64) -> Result<f64> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::invalid_parameter(name, radius, "must be finite and > 0"));
    }
    Ok(radius)
}

/// Copy `query` into the reusable `buffer` after checking its length.
pub(crate) fn store_query(buffer: &mut Vec<f64>, dims: usize, query: &[f64]) -> Result<()> {
    Error::check_dims(dims, query.len())?;
    buffer.clear();
    buffer.extend_from_slice(query);
    Ok(())
}
