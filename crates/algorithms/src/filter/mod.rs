//! Neighborhood filters
//!
//! Each filter runs a neighbor search at the query position and aggregates
//! the hits into one output value:
//! - Nearest: value of the closest sample within the radius
//! - Mean: arithmetic mean within the radius
//! - Median: median within the radius
//! - Gaussian: Gaussian-weighted sum within the radius, see [`WeightMode`]
//! - Density: number of samples within the radius
//! - SingleSpotRemoval: own value of a sample that has company
//!
//! An empty neighborhood is never an error: every filter falls back to its
//! out-of-bounds value. Filters are created by a [`FilterFactory`], which
//! snapshots its parameters into each new filter.

mod density;
mod factory;
mod gaussian;
mod mean;
mod median;
mod nearest;
mod params;
mod single_spot;

pub use density::DensityFilter;
pub use factory::FilterFactory;
pub use gaussian::GaussianFilter;
pub use mean::MeanFilter;
pub use median::MedianFilter;
pub use nearest::NearestFilter;
pub use params::{FilterParams, FilterType, WeightMode};
pub use single_spot::SingleSpotRemovalFilter;

use spotfield_core::{Result, ValueElement};

use crate::index::KdTree;
use crate::search::NeighborSearch;

/// A filter instance: exclusively owned search state plus the parameters it
/// was created with.
///
/// Clone a filter (or create a new one from the factory) for each thread.
#[derive(Debug, Clone)]
pub enum Filter<T> {
    Nearest(NearestFilter<T>),
    Mean(MeanFilter<T>),
    Median(MedianFilter<T>),
    Gaussian(GaussianFilter<T>),
    Density(DensityFilter<T>),
    SingleSpotRemoval(SingleSpotRemovalFilter<T>),
}

impl<T: ValueElement> Filter<T> {
    /// Evaluate the filter at `position`.
    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        match self {
            Filter::Nearest(f) => f.filter(position),
            Filter::Mean(f) => f.filter(position),
            Filter::Median(f) => f.filter(position),
            Filter::Gaussian(f) => f.filter(position),
            Filter::Density(f) => f.filter(position),
            Filter::SingleSpotRemoval(f) => f.filter(position),
        }
    }

    /// Evaluate the filter at `position`, writing into `output`.
    pub fn filter_into(&mut self, position: &[f64], output: &mut T) -> Result<()> {
        *output = self.filter(position)?;
        Ok(())
    }

    /// The tree this filter searches
    pub fn tree(&self) -> &KdTree<T> {
        match self {
            Filter::Nearest(f) => f.search().tree(),
            Filter::Mean(f) => f.search().tree(),
            Filter::Median(f) => f.search().tree(),
            Filter::Gaussian(f) => f.search().tree(),
            Filter::Density(f) => f.search().tree(),
            Filter::SingleSpotRemoval(f) => f.search().tree(),
        }
    }

    /// Which filter this is
    pub fn filter_type(&self) -> FilterType {
        match self {
            Filter::Nearest(_) => FilterType::Nearest,
            Filter::Mean(_) => FilterType::Mean,
            Filter::Median(_) => FilterType::Median,
            Filter::Gaussian(_) => FilterType::Gaussian,
            Filter::Density(_) => FilterType::Density,
            Filter::SingleSpotRemoval(_) => FilterType::SingleSpotRemoval,
        }
    }
}

/// Value of search hit `i` as f64 (NaN if not representable).
#[inline]
pub(crate) fn value_f64<T: ValueElement, S: NeighborSearch<T>>(search: &S, i: usize) -> f64 {
    search.value(i).as_f64().unwrap_or(f64::NAN)
}

/// Convert an aggregate back to `T`, falling back when out of range.
#[inline]
pub(crate) fn cast_or<T: ValueElement>(value: f64, fallback: T) -> T {
    T::from_f64(value).unwrap_or(fallback)
}
