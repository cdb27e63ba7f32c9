//! Gaussian-weighted filter
//!
//! ```text
//! w(d)  = exp(-d² / (2σ²))
//! z(x)  = Σ(vi * w(di)) / norm
//! ```
//!
//! where `norm` depends on the [`WeightMode`].

use std::sync::Arc;

use spotfield_core::{Result, ValueElement};

use super::params::check_sigma;
use super::{cast_or, value_f64, WeightMode};
use crate::index::KdTree;
use crate::search::{NeighborSearch, RadiusSearch};

/// Gaussian-weighted aggregate of all sample values within `radius`.
#[derive(Debug, Clone)]
pub struct GaussianFilter<T> {
    search: RadiusSearch<T>,
    out_of_bounds: T,
    sigma: f64,
    two_sigma_sq: f64,
    weight_mode: WeightMode,
}

impl<T: ValueElement> GaussianFilter<T> {
    pub fn new(
        tree: Arc<KdTree<T>>,
        radius: f64,
        sigma: f64,
        weight_mode: WeightMode,
        out_of_bounds: T,
    ) -> Result<Self> {
        let sigma = check_sigma(sigma)?;
        Ok(Self {
            search: RadiusSearch::new(tree, radius)?,
            out_of_bounds,
            sigma,
            two_sigma_sq: 2.0 * sigma * sigma,
            weight_mode,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn weight_mode(&self) -> WeightMode {
        self.weight_mode
    }

    /// The underlying radius search
    pub fn search(&self) -> &RadiusSearch<T> {
        &self.search
    }

    pub fn filter(&mut self, position: &[f64]) -> Result<T> {
        self.search.search(position)?;
        let n = self.search.len();
        if n == 0 {
            return Ok(self.out_of_bounds);
        }

        let mut sum_w = 0.0;
        let mut sum_wv = 0.0;
        for i in 0..n {
            let w = (-self.search.distance_sq(i) / self.two_sigma_sq).exp();
            sum_w += w;
            sum_wv += w * value_f64(&self.search, i);
        }

        let value = match self.weight_mode {
            WeightMode::None => sum_wv,
            WeightMode::BySumOfWeights => {
                // every weight underflowed
                if sum_w <= 0.0 {
                    return Ok(self.out_of_bounds);
                }
                sum_wv / sum_w
            }
            WeightMode::BySumOfSamples => sum_wv / n as f64,
            WeightMode::PartialBySumOfWeights => sum_wv / sum_w.max(1.0),
        };
        Ok(cast_or(value, self.out_of_bounds))
    }
}
