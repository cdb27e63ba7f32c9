//! # spotfield Algorithms
//!
//! Spatial indexing and neighborhood filtering over scattered samples.
//!
//! ## Modules
//!
//! - **index**: balanced k-d tree over a `PointSet`
//! - **search**: radius, k-nearest and distance-bounded neighbor searches
//! - **filter**: nearest, mean, median, Gaussian, density and single-spot
//!   removal filters, created through a `FilterFactory`
//! - **field**: continuous fields evaluating a filter at any position
//!
//! The tree is built once and shared through an `Arc`; searches, filters and
//! fields carry their own scratch buffers and are cloned per thread.

pub mod field;
pub mod filter;
pub mod index;
pub mod search;

pub use field::{ContinuousField, Evaluate, Interpolation};
pub use filter::{Filter, FilterFactory, FilterParams, FilterType, WeightMode};
pub use index::{KdTree, Neighbor};
pub use search::{BoundedSearch, KnnSearch, NeighborSearch, RadiusSearch};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::field::{ContinuousField, Evaluate, Interpolation};
    pub use crate::filter::{Filter, FilterFactory, FilterParams, FilterType, WeightMode};
    pub use crate::index::{KdTree, Neighbor};
    pub use crate::search::{BoundedSearch, KnnSearch, NeighborSearch, RadiusSearch};
    pub use spotfield_core::prelude::*;
}
