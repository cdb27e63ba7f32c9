//! Real and discrete bounding intervals
//!
//! A [`RealInterval`] bounds sample positions; a [`DiscreteInterval`] is the
//! integer cell domain a field is rasterized over. Both have a fixed number
//! of dimensions and inclusive bounds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned real-valued bounding box with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Bounds<f64>")]
pub struct RealInterval {
    min: Vec<f64>,
    max: Vec<f64>,
}

/// Unchecked bounds as read from a serialized interval
#[derive(Deserialize)]
struct Bounds<C> {
    min: Vec<C>,
    max: Vec<C>,
}

impl TryFrom<Bounds<f64>> for RealInterval {
    type Error = Error;

    fn try_from(bounds: Bounds<f64>) -> Result<Self> {
        Self::new(bounds.min, bounds.max)
    }
}

impl TryFrom<Bounds<i64>> for DiscreteInterval {
    type Error = Error;

    fn try_from(bounds: Bounds<i64>) -> Result<Self> {
        Self::new(bounds.min, bounds.max)
    }
}

impl RealInterval {
    /// Create an interval from per-dimension bounds.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        Error::check_dims(min.len(), max.len())?;
        if min.is_empty() {
            return Err(Error::InvalidDimensions(Vec::new()));
        }
        for d in 0..min.len() {
            if !(min[d] <= max[d]) {
                return Err(Error::invalid_parameter(
                    "interval",
                    format!("{}..{}", min[d], max[d]),
                    format!("min > max in dimension {d}"),
                ));
            }
        }
        Ok(Self { min, max })
    }

    /// Degenerate interval containing exactly one position.
    pub fn from_position(position: &[f64]) -> Self {
        Self {
            min: position.to_vec(),
            max: position.to_vec(),
        }
    }

    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.min.len()
    }

    /// Lower corner
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper corner
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Extent along dimension `d`
    pub fn extent(&self, d: usize) -> f64 {
        self.max[d] - self.min[d]
    }

    /// Whether `position` lies inside (bounds inclusive)
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dims()
            && position
                .iter()
                .enumerate()
                .all(|(d, &p)| p >= self.min[d] && p <= self.max[d])
    }

    /// Grow the interval so that it contains `position`.
    pub fn include(&mut self, position: &[f64]) -> Result<()> {
        Error::check_dims(self.dims(), position.len())?;
        for (d, &p) in position.iter().enumerate() {
            self.min[d] = self.min[d].min(p);
            self.max[d] = self.max[d].max(p);
        }
        Ok(())
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn union(&self, other: &RealInterval) -> Result<Self> {
        Error::check_dims(self.dims(), other.dims())?;
        let mut out = self.clone();
        out.include(&other.min)?;
        out.include(&other.max)?;
        Ok(out)
    }

    /// Expand every side by `border` (negative values shrink, clamped at the center).
    pub fn expand(&self, border: f64) -> Self {
        let mut min = self.min.clone();
        let mut max = self.max.clone();
        for d in 0..self.dims() {
            let center = 0.5 * (self.min[d] + self.max[d]);
            min[d] = (self.min[d] - border).min(center);
            max[d] = (self.max[d] + border).max(center);
        }
        Self { min, max }
    }
}

/// Axis-aligned integer cell domain with inclusive bounds.
///
/// Cells are enumerated in scan order with the last axis varying fastest,
/// which matches the standard (row-major) layout of [`crate::raster::Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Bounds<i64>")]
pub struct DiscreteInterval {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl DiscreteInterval {
    /// Create a domain from per-dimension inclusive bounds.
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Result<Self> {
        Error::check_dims(min.len(), max.len())?;
        if min.is_empty() || min.iter().zip(&max).any(|(a, b)| a > b) {
            let shape = min
                .iter()
                .zip(&max)
                .map(|(a, b)| (b - a + 1).max(0) as usize)
                .collect();
            return Err(Error::InvalidDimensions(shape));
        }
        Ok(Self { min, max })
    }

    /// Domain `0..shape[d]` along every dimension.
    pub fn from_shape(shape: &[usize]) -> Result<Self> {
        if shape.is_empty() || shape.contains(&0) {
            return Err(Error::InvalidDimensions(shape.to_vec()));
        }
        Ok(Self {
            min: vec![0; shape.len()],
            max: shape.iter().map(|&s| s as i64 - 1).collect(),
        })
    }

    /// Smallest integer domain covering `interval` (outward rounding).
    pub fn covering(interval: &RealInterval) -> Self {
        Self {
            min: interval.min().iter().map(|v| v.floor() as i64).collect(),
            max: interval.max().iter().map(|v| v.ceil() as i64).collect(),
        }
    }

    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.min.len()
    }

    /// Lower corner
    pub fn min(&self) -> &[i64] {
        &self.min
    }

    /// Upper corner
    pub fn max(&self) -> &[i64] {
        &self.max
    }

    /// Number of cells along dimension `d`
    pub fn dimension(&self, d: usize) -> usize {
        (self.max[d] - self.min[d] + 1) as usize
    }

    /// Number of cells along every dimension
    pub fn shape(&self) -> Vec<usize> {
        (0..self.dims()).map(|d| self.dimension(d)).collect()
    }

    /// Total number of cells
    pub fn num_cells(&self) -> usize {
        (0..self.dims()).map(|d| self.dimension(d)).product()
    }

    /// Whether `cell` lies inside the domain
    pub fn contains(&self, cell: &[i64]) -> bool {
        cell.len() == self.dims()
            && cell
                .iter()
                .enumerate()
                .all(|(d, &c)| c >= self.min[d] && c <= self.max[d])
    }

    /// Scan-order index of `cell`, or `None` if outside.
    pub fn index_of(&self, cell: &[i64]) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let mut index = 0usize;
        for (d, &c) in cell.iter().enumerate() {
            index = index * self.dimension(d) + (c - self.min[d]) as usize;
        }
        Some(index)
    }

    /// Write the cell at scan-order `index` into `cell`.
    ///
    /// `cell` must have `dims()` entries; `index` must be below `num_cells()`.
    pub fn cell_at(&self, mut index: usize, cell: &mut [i64]) {
        for d in (0..self.dims()).rev() {
            let n = self.dimension(d);
            cell[d] = self.min[d] + (index % n) as i64;
            index /= n;
        }
    }

    /// Iterate every cell in scan order.
    pub fn cells(&self) -> impl Iterator<Item = Vec<i64>> + '_ {
        (0..self.num_cells()).map(move |i| {
            let mut cell = vec![0; self.dims()];
            self.cell_at(i, &mut cell);
            cell
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_real_interval_include_and_contains() {
        let mut iv = RealInterval::from_position(&[1.0, 2.0]);
        iv.include(&[-1.0, 5.0]).unwrap();
        assert_eq!(iv.min(), &[-1.0, 2.0]);
        assert_eq!(iv.max(), &[1.0, 5.0]);
        assert!(iv.contains(&[0.0, 3.0]));
        assert!(!iv.contains(&[0.0, 6.0]));
        assert!(!iv.contains(&[0.0]));
        assert!(iv.include(&[0.0]).is_err());
    }

    #[test]
    fn test_real_interval_expand() {
        let iv = RealInterval::new(vec![0.0, 0.0], vec![2.0, 4.0]).unwrap();
        let big = iv.expand(1.0);
        assert_eq!(big.min(), &[-1.0, -1.0]);
        assert_eq!(big.max(), &[3.0, 5.0]);

        let shrunk = iv.expand(-1.5);
        assert_relative_eq!(shrunk.min()[0], 1.0);
        assert_relative_eq!(shrunk.max()[0], 1.0);
        assert_relative_eq!(shrunk.min()[1], 1.5);
        assert_relative_eq!(shrunk.max()[1], 2.5);
    }

    #[test]
    fn test_real_interval_rejects_inverted() {
        assert!(RealInterval::new(vec![1.0], vec![0.0]).is_err());
        assert!(RealInterval::new(vec![0.0, 0.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_discrete_scan_order() {
        let iv = DiscreteInterval::new(vec![0, 10], vec![1, 12]).unwrap();
        assert_eq!(iv.shape(), vec![2, 3]);
        assert_eq!(iv.num_cells(), 6);

        let cells: Vec<Vec<i64>> = iv.cells().collect();
        assert_eq!(cells[0], vec![0, 10]);
        assert_eq!(cells[1], vec![0, 11]);
        assert_eq!(cells[3], vec![1, 10]);
        assert_eq!(cells[5], vec![1, 12]);

        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(iv.index_of(cell), Some(i));
        }
        assert_eq!(iv.index_of(&[2, 10]), None);
    }

    #[test]
    fn test_discrete_covering() {
        let real = RealInterval::new(vec![-0.5, 1.2], vec![2.1, 3.0]).unwrap();
        let iv = DiscreteInterval::covering(&real);
        assert_eq!(iv.min(), &[-1, 1]);
        assert_eq!(iv.max(), &[3, 3]);
    }

    #[test]
    fn test_discrete_invalid() {
        assert!(DiscreteInterval::new(vec![0], vec![-1]).is_err());
        assert!(DiscreteInterval::from_shape(&[3, 0]).is_err());
        assert!(DiscreteInterval::from_shape(&[]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let iv: DiscreteInterval = serde_json::from_str(r#"{"min":[0,-2],"max":[4,2]}"#).unwrap();
        assert_eq!(iv.shape(), vec![5, 5]);
        let json = serde_json::to_string(&iv).unwrap();
        let back: DiscreteInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iv);

        assert!(serde_json::from_str::<DiscreteInterval>(r#"{"min":[5],"max":[0]}"#).is_err());
        assert!(serde_json::from_str::<DiscreteInterval>(r#"{"min":[0,0],"max":[1]}"#).is_err());

        let real: RealInterval = serde_json::from_str(r#"{"min":[0.0],"max":[1.5]}"#).unwrap();
        assert_eq!(real.extent(0), 1.5);
        assert!(serde_json::from_str::<RealInterval>(r#"{"min":[2.0],"max":[1.0]}"#).is_err());
        assert!(serde_json::from_str::<RealInterval>(r#"{"min":[],"max":[]}"#).is_err());
    }
}
