//! Per-axis scale/offset transform between grid cells and real positions

use crate::error::{Error, Result};
use crate::interval::{DiscreteInterval, RealInterval};
use serde::{Deserialize, Serialize};

/// Maps a discrete cell coordinate `c` to the real position
/// `offset + c * scale`, independently per axis.
///
/// The identity transform renders one cell per unit of sample space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransformParts")]
pub struct GridTransform {
    /// Real position of cell 0
    offset: Vec<f64>,
    /// Cell spacing per axis
    scale: Vec<f64>,
}

#[derive(Deserialize)]
struct TransformParts {
    offset: Vec<f64>,
    scale: Vec<f64>,
}

impl TryFrom<TransformParts> for GridTransform {
    type Error = Error;

    fn try_from(parts: TransformParts) -> Result<Self> {
        Self::new(parts.offset, parts.scale)
    }
}

impl GridTransform {
    /// Create a transform; every scale must be finite and non-zero.
    pub fn new(offset: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        Error::check_dims(offset.len(), scale.len())?;
        if let Some(&s) = scale.iter().find(|s| !s.is_finite() || **s == 0.0) {
            return Err(Error::invalid_parameter(
                "scale",
                s,
                "must be finite and non-zero",
            ));
        }
        Ok(Self { offset, scale })
    }

    /// Identity transform in `dims` dimensions
    pub fn identity(dims: usize) -> Self {
        Self {
            offset: vec![0.0; dims],
            scale: vec![1.0; dims],
        }
    }

    /// Uniform spacing, no offset
    pub fn uniform(dims: usize, spacing: f64) -> Result<Self> {
        Self::new(vec![0.0; dims], vec![spacing; dims])
    }

    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.scale.len()
    }

    /// Real position of cell 0
    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    /// Cell spacing per axis
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Real position of `cell`, written into `out`.
    #[inline]
    pub fn apply(&self, cell: &[i64], out: &mut [f64]) {
        for d in 0..self.dims() {
            out[d] = self.offset[d] + cell[d] as f64 * self.scale[d];
        }
    }

    /// Fractional cell coordinate of a real position.
    pub fn inverse(&self, position: &[f64]) -> Vec<f64> {
        position
            .iter()
            .enumerate()
            .map(|(d, &p)| (p - self.offset[d]) / self.scale[d])
            .collect()
    }

    /// Cell domain covering `interval` at a uniform `spacing`, together with
    /// the transform that maps those cells back onto sample space.
    pub fn fit(interval: &RealInterval, spacing: f64) -> Result<(DiscreteInterval, Self)> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(Error::invalid_parameter(
                "spacing",
                spacing,
                "must be finite and > 0",
            ));
        }
        let transform = Self::uniform(interval.dims(), spacing)?;
        let lo = transform.inverse(interval.min());
        let hi = transform.inverse(interval.max());
        let domain = DiscreteInterval::new(
            lo.iter().map(|v| v.floor() as i64).collect(),
            hi.iter().map(|v| v.ceil() as i64).collect(),
        )?;
        Ok((domain, transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply_inverse_roundtrip() {
        let t = GridTransform::new(vec![10.0, -5.0], vec![0.5, 2.0]).unwrap();
        let mut pos = [0.0; 2];
        t.apply(&[4, 3], &mut pos);
        assert_relative_eq!(pos[0], 12.0);
        assert_relative_eq!(pos[1], 1.0);

        let cell = t.inverse(&pos);
        assert_relative_eq!(cell[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(cell[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(GridTransform::new(vec![0.0], vec![0.0]).is_err());
        assert!(GridTransform::new(vec![0.0], vec![f64::NAN]).is_err());
        assert!(GridTransform::new(vec![0.0, 0.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_fit_covers_interval() {
        let iv = RealInterval::new(vec![0.0, 0.3], vec![1.0, 2.0]).unwrap();
        let (domain, t) = GridTransform::fit(&iv, 0.5).unwrap();
        assert_eq!(domain.min(), &[0, 0]);
        assert_eq!(domain.max(), &[2, 4]);

        let mut pos = [0.0; 2];
        t.apply(domain.max(), &mut pos);
        assert!(pos[0] >= 1.0 && pos[1] >= 2.0);
        assert!(GridTransform::fit(&iv, 0.0).is_err());
    }

    #[test]
    fn test_mismatched_offset_rejected() {
        assert!(matches!(
            GridTransform::new(vec![0.0], vec![1.0, 1.0]),
            Err(Error::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let t: GridTransform =
            serde_json::from_str(r#"{"offset":[1.0,2.0],"scale":[0.5,0.5]}"#).unwrap();
        assert_eq!(t.offset(), &[1.0, 2.0]);
        assert_eq!(t.scale(), &[0.5, 0.5]);
        let json = serde_json::to_string(&t).unwrap();
        let back: GridTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let short_offset = r#"{"offset":[0.0],"scale":[1.0,1.0]}"#;
        assert!(serde_json::from_str::<GridTransform>(short_offset).is_err());
        let zero_scale = r#"{"offset":[0.0],"scale":[0.0]}"#;
        assert!(serde_json::from_str::<GridTransform>(zero_scale).is_err());
    }
}
