//! Ordered collection of (position, value) samples

use crate::error::{Error, Result};
use crate::interval::RealInterval;
use crate::raster::ValueElement;
use serde::{Deserialize, Serialize};

/// A single owned sample: an n-dimensional position and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    pub position: Vec<f64>,
    pub value: T,
}

impl<T> Sample<T> {
    pub fn new(position: Vec<f64>, value: T) -> Self {
        Self { position, value }
    }

    /// Squared Euclidean distance to `other`
    #[inline]
    pub fn dist_sq(&self, other: &[f64]) -> f64 {
        dist_sq(&self.position, other)
    }
}

/// Squared Euclidean distance between two positions of equal length.
#[inline]
pub fn dist_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Ordered, fixed-dimensionality set of samples.
///
/// Positions are stored flat (`dims` coordinates per sample) next to a
/// parallel value column. Duplicate positions are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "PointSetParts<T>",
    bound(deserialize = "T: ValueElement + Deserialize<'de>")
)]
pub struct PointSet<T> {
    dims: usize,
    coords: Vec<f64>,
    values: Vec<T>,
}

#[derive(Deserialize)]
struct PointSetParts<T> {
    dims: usize,
    coords: Vec<f64>,
    values: Vec<T>,
}

impl<T: ValueElement> TryFrom<PointSetParts<T>> for PointSet<T> {
    type Error = Error;

    fn try_from(parts: PointSetParts<T>) -> Result<Self> {
        Self::from_parts(parts.dims, parts.coords, parts.values)
    }
}

impl<T: ValueElement> PointSet<T> {
    /// Create an empty point set with `dims` dimensions.
    pub fn new(dims: usize) -> Result<Self> {
        Self::with_capacity(dims, 0)
    }

    /// Create an empty point set with room for `capacity` samples.
    pub fn with_capacity(dims: usize, capacity: usize) -> Result<Self> {
        if dims == 0 {
            return Err(Error::InvalidDimensions(vec![0]));
        }
        Ok(Self {
            dims,
            coords: Vec::with_capacity(capacity * dims),
            values: Vec::with_capacity(capacity),
        })
    }

    /// Build from flat coordinates and a matching value column.
    pub fn from_parts(dims: usize, coords: Vec<f64>, values: Vec<T>) -> Result<Self> {
        if dims == 0 {
            return Err(Error::InvalidDimensions(vec![0]));
        }
        if coords.len() != values.len() * dims {
            return Err(Error::LengthMismatch {
                expected: values.len() * dims,
                actual: coords.len(),
            });
        }
        Ok(Self {
            dims,
            coords,
            values,
        })
    }

    /// Build from owned samples; every sample must have `dims` coordinates.
    pub fn from_samples<I>(dims: usize, samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = Sample<T>>,
    {
        let mut set = Self::new(dims)?;
        for sample in samples {
            set.push(&sample.position, sample.value)?;
        }
        Ok(set)
    }

    /// Append a sample.
    pub fn push(&mut self, position: &[f64], value: T) -> Result<()> {
        Error::check_dims(self.dims, position.len())?;
        self.coords.extend_from_slice(position);
        self.values.push(value);
        Ok(())
    }

    /// Number of dimensions of every position
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of sample `i`
    #[inline]
    pub fn position(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dims..(i + 1) * self.dims]
    }

    /// Value of sample `i`
    #[inline]
    pub fn value(&self, i: usize) -> T {
        self.values[i]
    }

    /// Flat coordinate storage
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Value column
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable value column (positions stay fixed)
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Owned copy of sample `i`
    pub fn sample(&self, i: usize) -> Sample<T> {
        Sample::new(self.position(i).to_vec(), self.values[i])
    }

    /// Iterate `(position, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&[f64], T)> + '_ {
        self.coords
            .chunks_exact(self.dims)
            .zip(self.values.iter().copied())
    }

    /// Same positions, new values.
    pub fn with_values<U: ValueElement>(&self, values: Vec<U>) -> Result<PointSet<U>> {
        if values.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        Ok(PointSet {
            dims: self.dims,
            coords: self.coords.clone(),
            values,
        })
    }

    /// Same positions, every value set to `fill`.
    pub fn like<U: ValueElement>(&self, fill: U) -> PointSet<U> {
        PointSet {
            dims: self.dims,
            coords: self.coords.clone(),
            values: vec![fill; self.len()],
        }
    }

    /// Bounding interval of all positions, `None` when empty.
    pub fn bounds(&self) -> Option<RealInterval> {
        let mut iter = self.coords.chunks_exact(self.dims);
        let mut interval = RealInterval::from_position(iter.next()?);
        for position in iter {
            // dims are equal by construction
            interval.include(position).ok()?;
        }
        Some(interval)
    }

    /// Minimum and maximum value, `None` when empty.
    pub fn value_range(&self) -> Option<(T, T)> {
        let first = *self.values.first()?;
        Some(self.values.iter().fold((first, first), |(lo, hi), &v| {
            (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )
        }))
    }
}
