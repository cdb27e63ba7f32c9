//! Main Grid type

use crate::error::{Error, Result};
use crate::interval::DiscreteInterval;
use crate::raster::{GridTransform, ValueElement};
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn};

/// An n-dimensional grid of rendered values.
///
/// `Grid<T>` stores one value per cell of a [`DiscreteInterval`] in
/// standard (row-major) layout, so the flat cell order is the interval's
/// scan order. The attached [`GridTransform`] records where each cell was
/// sampled in real space.
///
/// # Example
///
/// ```ignore
/// use spotfield_core::{DiscreteInterval, Grid};
///
/// let domain = DiscreteInterval::from_shape(&[100, 200])?;
/// let mut grid: Grid<f32> = Grid::new(domain);
/// grid.set(&[10, 20], 42.0)?;
/// assert_eq!(grid.get(&[10, 20])?, 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct Grid<T: ValueElement> {
    /// Cell values, shape = domain shape
    data: ArrayD<T>,
    /// Cell domain
    domain: DiscreteInterval,
    /// Cell to real position mapping
    transform: GridTransform,
    /// Value written where no sample was in range
    out_of_bounds: Option<T>,
}

impl<T: ValueElement> Grid<T> {
    /// Create a new grid filled with zeros
    pub fn new(domain: DiscreteInterval) -> Self {
        Self::filled(domain, T::zero())
    }

    /// Create a new grid filled with a specific value
    pub fn filled(domain: DiscreteInterval, value: T) -> Self {
        let transform = GridTransform::identity(domain.dims());
        Self {
            data: ArrayD::from_elem(IxDyn(&domain.shape()), value),
            domain,
            transform,
            out_of_bounds: None,
        }
    }

    /// Create a grid from values in scan order
    pub fn from_vec(data: Vec<T>, domain: DiscreteInterval) -> Result<Self> {
        if data.len() != domain.num_cells() {
            return Err(Error::LengthMismatch {
                expected: domain.num_cells(),
                actual: data.len(),
            });
        }
        let data = ArrayD::from_shape_vec(IxDyn(&domain.shape()), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        let transform = GridTransform::identity(domain.dims());
        Ok(Self {
            data,
            domain,
            transform,
            out_of_bounds: None,
        })
    }

    // Dimensions

    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.domain.dims()
    }

    /// Cells per dimension
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell domain
    pub fn domain(&self) -> &DiscreteInterval {
        &self.domain
    }

    // Data access

    /// Get value at `cell`
    pub fn get(&self, cell: &[i64]) -> Result<T> {
        let index = self.flat_index(cell)?;
        Ok(self.cells()?[index])
    }

    /// Set value at `cell`
    pub fn set(&mut self, cell: &[i64], value: T) -> Result<()> {
        let index = self.flat_index(cell)?;
        self.cells_mut()?[index] = value;
        Ok(())
    }

    fn flat_index(&self, cell: &[i64]) -> Result<usize> {
        Error::check_dims(self.dims(), cell.len())?;
        self.domain
            .index_of(cell)
            .ok_or_else(|| Error::IndexOutOfBounds {
                index: cell.to_vec(),
                min: self.domain.min().to_vec(),
                max: self.domain.max().to_vec(),
            })
    }

    /// Cell values in scan order
    pub fn cells(&self) -> Result<&[T]> {
        self.data
            .as_slice()
            .ok_or_else(|| Error::Other("grid storage is not contiguous".into()))
    }

    /// Mutable cell values in scan order
    pub fn cells_mut(&mut self) -> Result<&mut [T]> {
        self.data
            .as_slice_mut()
            .ok_or_else(|| Error::Other("grid storage is not contiguous".into()))
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, T> {
        self.data.view_mut()
    }

    /// Consume the grid and return the underlying array
    pub fn into_array(self) -> ArrayD<T> {
        self.data
    }

    // Metadata

    /// Get the cell transform
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Set the cell transform
    pub fn set_transform(&mut self, transform: GridTransform) -> Result<()> {
        Error::check_dims(self.dims(), transform.dims())?;
        self.transform = transform;
        Ok(())
    }

    /// Get the out-of-bounds marker
    pub fn out_of_bounds(&self) -> Option<T> {
        self.out_of_bounds
    }

    /// Set the out-of-bounds marker
    pub fn set_out_of_bounds(&mut self, value: Option<T>) {
        self.out_of_bounds = value;
    }

    /// Check if a value is the out-of-bounds marker
    pub fn is_out_of_bounds(&self, value: T) -> bool {
        match self.out_of_bounds {
            Some(marker) => value.is_out_of_bounds(marker),
            None => false,
        }
    }

    /// Real position sampled for `cell`
    pub fn position_of(&self, cell: &[i64]) -> Vec<f64> {
        let mut out = vec![0.0; self.dims()];
        self.transform.apply(cell, &mut out);
        out
    }

    // Statistics

    /// Basic statistics over cells that are not out of bounds.
    ///
    /// Useful for picking a display range before handing the grid to a viewer.
    pub fn statistics(&self) -> GridStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_out_of_bounds(value) {
                continue;
            }
            if let Some(v) = value.as_f64() {
                if v.is_nan() {
                    continue;
                }
                sum += v;
                count += 1;
            }
            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        GridStatistics {
            min,
            max,
            mean,
            valid_count: count,
            out_of_bounds_count: self.len() - count,
        }
    }
}

/// Basic statistics for a grid
#[derive(Debug, Clone)]
pub struct GridStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub out_of_bounds_count: usize,
}
