//! How a continuous field turns filter output into a value at any position

use serde::{Deserialize, Serialize};
use spotfield_core::{Error, Result};

/// Interpolation between the filter and the query position.
///
/// Filters are already continuous functions of position, so
/// [`Interpolation::Direct`] simply evaluates the filter at the query.
/// The k-nearest modes instead evaluate the filter at the sample positions
/// surrounding the query and interpolate between those values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Interpolation {
    /// Evaluate the filter at the query position
    #[default]
    Direct,
    /// Filter value at the nearest sample (Voronoi rendering); out of bounds
    /// beyond `max_distance`
    NearestNeighbor { max_distance: f64 },
    /// Inverse-distance weighted filter values of the `k` nearest samples:
    ///
    /// ```text
    /// z(x) = Σ(wi * zi) / Σ(wi),  wi = 1 / di^power
    /// ```
    ///
    /// Out of bounds when the nearest sample is beyond `max_distance`.
    InverseDistance {
        k: usize,
        power: f64,
        max_distance: f64,
    },
}

impl Interpolation {
    /// Check that the mode's parameters are usable.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Interpolation::Direct => Ok(()),
            Interpolation::NearestNeighbor { max_distance } => check_max_distance(max_distance),
            Interpolation::InverseDistance {
                k,
                power,
                max_distance,
            } => {
                if k == 0 {
                    return Err(Error::invalid_parameter("k", k, "must be >= 1"));
                }
                if !power.is_finite() || power <= 0.0 {
                    return Err(Error::invalid_parameter("power", power, "must be finite and > 0"));
                }
                check_max_distance(max_distance)
            }
        }
    }

    /// Number of nearest samples the mode looks at (0 for direct)
    pub fn neighbors(&self) -> usize {
        match *self {
            Interpolation::Direct => 0,
            Interpolation::NearestNeighbor { .. } => 1,
            Interpolation::InverseDistance { k, .. } => k,
        }
    }
}

fn check_max_distance(max_distance: f64) -> Result<()> {
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(Error::invalid_parameter(
            "max_distance",
            max_distance,
            "must be finite and >= 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Interpolation::Direct.validate().is_ok());
        assert!(Interpolation::NearestNeighbor { max_distance: 2.0 }.validate().is_ok());
        assert!(Interpolation::NearestNeighbor { max_distance: -2.0 }.validate().is_err());
        assert!(
            Interpolation::InverseDistance {
                k: 0,
                power: 2.0,
                max_distance: 1.0
            }
            .validate()
            .is_err()
        );
        assert!(
            Interpolation::InverseDistance {
                k: 4,
                power: 0.0,
                max_distance: 1.0
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(Interpolation::default().neighbors(), 0);
        assert_eq!(
            Interpolation::InverseDistance {
                k: 6,
                power: 2.0,
                max_distance: 1.0
            }
            .neighbors(),
            6
        );
    }
}
