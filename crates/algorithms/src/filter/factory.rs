//! Filter factory: shared configuration, independent instances

use std::sync::Arc;

use spotfield_core::{Error, PointSet, Result, ValueElement};
use tracing::debug;

use super::params::check_sigma;
use super::{
    DensityFilter, Filter, FilterParams, FilterType, GaussianFilter, MeanFilter, MedianFilter,
    NearestFilter, SingleSpotRemovalFilter, WeightMode,
};
use crate::index::KdTree;
use crate::search::check_radius;

/// Builds fresh [`Filter`] instances over a shared [`KdTree`].
///
/// The factory holds the tunable parameters (radius, sigma, weight mode,
/// out-of-bounds value). Every created filter takes a snapshot of them:
/// changing the factory afterwards only affects filters created later.
/// Setters take `&mut self`, so the factory cannot be reconfigured while
/// other threads are creating filters from it.
#[derive(Debug, Clone)]
pub struct FilterFactory<T> {
    filter_type: FilterType,
    params: FilterParams,
    out_of_bounds: T,
}

impl<T: ValueElement> FilterFactory<T> {
    /// Factory with default parameters ([`FilterParams::gaussian`] for the
    /// Gaussian type, [`FilterParams::default`] otherwise).
    pub fn new(filter_type: FilterType, out_of_bounds: T) -> Self {
        let params = match filter_type {
            FilterType::Gaussian => FilterParams::gaussian(1.0),
            _ => FilterParams::default(),
        };
        Self {
            filter_type,
            params,
            out_of_bounds,
        }
    }

    /// Factory with explicit, validated parameters.
    pub fn with_params(
        filter_type: FilterType,
        params: FilterParams,
        out_of_bounds: T,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            filter_type,
            params,
            out_of_bounds,
        })
    }

    /// Which filter this factory creates
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Current parameters
    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Current radius
    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    /// Set the radius for filters created from now on.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.params.radius = check_radius("radius", radius)?;
        Ok(())
    }

    /// Current Gaussian sigma
    pub fn sigma(&self) -> f64 {
        self.params.sigma
    }

    /// Set sigma for Gaussian filters created from now on.
    ///
    /// Only valid on a Gaussian factory. The radius is left unchanged.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        self.require_gaussian("sigma", sigma)?;
        self.params.sigma = check_sigma(sigma)?;
        Ok(())
    }

    /// Current Gaussian weight mode
    pub fn weight_mode(&self) -> WeightMode {
        self.params.weight_mode
    }

    /// Set the weight mode for Gaussian filters created from now on.
    pub fn set_weight_mode(&mut self, weight_mode: WeightMode) -> Result<()> {
        self.require_gaussian("weight_mode", format!("{weight_mode:?}"))?;
        self.params.weight_mode = weight_mode;
        Ok(())
    }

    /// Value produced where a neighborhood is empty
    pub fn out_of_bounds(&self) -> T {
        self.out_of_bounds
    }

    /// Set the out-of-bounds value for filters created from now on.
    pub fn set_out_of_bounds(&mut self, out_of_bounds: T) {
        self.out_of_bounds = out_of_bounds;
    }

    fn require_gaussian(&self, name: &'static str, value: impl ToString) -> Result<()> {
        if self.filter_type != FilterType::Gaussian {
            return Err(Error::invalid_parameter(
                name,
                value,
                format!("only applies to gaussian filters, not {}", self.filter_type.name()),
            ));
        }
        Ok(())
    }

    /// Create a new, independent filter over an existing tree.
    pub fn create_filter(&self, tree: &Arc<KdTree<T>>) -> Result<Filter<T>> {
        let tree = Arc::clone(tree);
        let p = &self.params;
        let oob = self.out_of_bounds;

        debug!(
            filter = self.filter_type.name(),
            radius = p.radius,
            sigma = p.sigma,
            points = tree.len(),
            "creating filter"
        );

        let filter = match self.filter_type {
            FilterType::Nearest => Filter::Nearest(NearestFilter::new(tree, p.radius, oob)?),
            FilterType::Mean => Filter::Mean(MeanFilter::new(tree, p.radius, oob)?),
            FilterType::Median => Filter::Median(MedianFilter::new(tree, p.radius, oob)?),
            FilterType::Gaussian => Filter::Gaussian(GaussianFilter::new(
                tree,
                p.radius,
                p.sigma,
                p.weight_mode,
                oob,
            )?),
            FilterType::Density => Filter::Density(DensityFilter::new(tree, p.radius, oob)?),
            FilterType::SingleSpotRemoval => Filter::SingleSpotRemoval(
                SingleSpotRemovalFilter::new(tree, p.radius, oob)?,
            ),
        };
        Ok(filter)
    }

    /// Build a tree over `points` and create a filter on it.
    pub fn create_filter_for(&self, points: PointSet<T>) -> Result<Filter<T>> {
        let tree = Arc::new(KdTree::build(points));
        self.create_filter(&tree)
    }
}
