//! Filter configuration

use serde::{Deserialize, Serialize};
use spotfield_core::{Error, Result};

use crate::search::check_radius;

/// Available neighborhood filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Value of the nearest sample within the radius
    Nearest,
    /// Arithmetic mean of all samples within the radius
    Mean,
    /// Median of all samples within the radius
    Median,
    /// Gaussian-weighted sum of all samples within the radius
    Gaussian,
    /// Number of samples within the radius
    Density,
    /// Own value of a sample if any other sample lies within the radius
    SingleSpotRemoval,
}

impl FilterType {
    /// Short lowercase name, used in log events
    pub fn name(&self) -> &'static str {
        match self {
            FilterType::Nearest => "nearest",
            FilterType::Mean => "mean",
            FilterType::Median => "median",
            FilterType::Gaussian => "gaussian",
            FilterType::Density => "density",
            FilterType::SingleSpotRemoval => "single_spot_removal",
        }
    }
}

/// Normalization of the Gaussian-weighted sum Σ(value·weight)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMode {
    /// Raw weighted sum
    None,
    /// Divide by Σ(weight): a weighted mean
    #[default]
    BySumOfWeights,
    /// Divide by the number of samples in range
    BySumOfSamples,
    /// Divide by Σ(weight) only once it exceeds 1, so sparse regions fade
    /// out instead of being amplified
    PartialBySumOfWeights,
}

/// Tunable parameters shared by every filter a factory creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Search radius (default: 1.0)
    pub radius: f64,
    /// Gaussian standard deviation (default: 1.0)
    pub sigma: f64,
    /// Gaussian normalization (default: by sum of weights)
    pub weight_mode: WeightMode,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            sigma: 1.0,
            weight_mode: WeightMode::default(),
        }
    }
}

impl FilterParams {
    /// Parameters with the given radius
    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    /// Gaussian parameters; the radius covers three standard deviations.
    pub fn gaussian(sigma: f64) -> Self {
        Self {
            radius: 3.0 * sigma,
            sigma,
            ..Default::default()
        }
    }

    /// Check that radius and sigma are finite and positive.
    pub fn validate(&self) -> Result<()> {
        check_radius("radius", self.radius)?;
        check_sigma(self.sigma)?;
        Ok(())
    }
}

pub(crate) fn check_sigma(sigma: f64) -> Result<f64> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::invalid_parameter("sigma", sigma, "must be finite and > 0"));
    }
    Ok(sigma)
}
