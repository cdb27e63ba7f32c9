//! Continuous fields: query-by-position over filtered samples
//!
//! A [`ContinuousField`] binds a shared [`KdTree`], a [`FilterFactory`] and
//! an [`Interpolation`] mode into a function from real position to value.
//! Nothing is precomputed; each query runs the bound filter.

mod interpolation;

pub use interpolation::Interpolation;

use std::sync::Arc;

use spotfield_core::{Error, RealInterval, Result, ValueElement};

use crate::filter::{Filter, FilterFactory};
use crate::index::KdTree;
use crate::search::{KnnSearch, NeighborSearch};

/// Anything that can be evaluated at a real position.
///
/// Evaluation takes `&mut self` because it reuses internal search buffers;
/// clone an evaluator to hand it to another thread.
pub trait Evaluate<T: ValueElement>: Clone + Send {
    /// Dimensionality of accepted positions
    fn dims(&self) -> usize;

    /// Value at `position`
    fn evaluate(&mut self, position: &[f64]) -> Result<T>;
}

impl<T: ValueElement> Evaluate<T> for Filter<T> {
    fn dims(&self) -> usize {
        self.tree().dims()
    }

    fn evaluate(&mut self, position: &[f64]) -> Result<T> {
        self.filter(position)
    }
}

/// A lazily evaluated, randomly queryable field.
#[derive(Debug, Clone)]
pub struct ContinuousField<T> {
    tree: Arc<KdTree<T>>,
    factory: FilterFactory<T>,
    interpolation: Interpolation,
    filter: Filter<T>,
    knn: Option<KnnSearch<T>>,
}

impl<T: ValueElement> ContinuousField<T> {
    /// Field that evaluates the factory's filter directly.
    pub fn new(tree: Arc<KdTree<T>>, factory: FilterFactory<T>) -> Result<Self> {
        Self::with_interpolation(tree, factory, Interpolation::Direct)
    }

    /// Field with an explicit interpolation mode.
    pub fn with_interpolation(
        tree: Arc<KdTree<T>>,
        factory: FilterFactory<T>,
        interpolation: Interpolation,
    ) -> Result<Self> {
        interpolation.validate()?;
        let filter = factory.create_filter(&tree)?;
        let knn = match interpolation.neighbors() {
            0 => None,
            k => Some(KnnSearch::new(Arc::clone(&tree), k)?),
        };
        Ok(Self {
            tree,
            factory,
            interpolation,
            filter,
            knn,
        })
    }

    /// The shared tree
    pub fn tree(&self) -> &Arc<KdTree<T>> {
        &self.tree
    }

    /// The factory the bound filter was created from
    pub fn factory(&self) -> &FilterFactory<T> {
        &self.factory
    }

    /// Interpolation mode
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Bounding interval of the underlying samples
    pub fn interval(&self) -> Option<RealInterval> {
        self.tree.interval()
    }

    /// Value of the field at `position`.
    pub fn evaluate(&mut self, position: &[f64]) -> Result<T> {
        Error::check_dims(self.tree.dims(), position.len())?;
        let oob = self.factory.out_of_bounds();

        match (self.interpolation, self.knn.as_mut()) {
            (Interpolation::NearestNeighbor { max_distance }, Some(knn)) => {
                knn.search(position)?;
                if knn.is_empty() || knn.distance(0) > max_distance {
                    return Ok(oob);
                }
                self.filter.filter(knn.position(0))
            }
            (
                Interpolation::InverseDistance {
                    power,
                    max_distance,
                    ..
                },
                Some(knn),
            ) => {
                knn.search(position)?;
                if knn.is_empty() || knn.distance(0) > max_distance {
                    return Ok(oob);
                }

                // Snap onto a sample to avoid the singularity at d = 0
                if knn.distance_sq(0) < SNAP_DISTANCE * SNAP_DISTANCE {
                    return self.filter.filter(knn.position(0));
                }

                let mut sum_w = 0.0;
                let mut sum_wz = 0.0;
                for i in 0..knn.len() {
                    let z = self.filter.filter(knn.position(i))?;
                    if z.is_out_of_bounds(oob) {
                        continue;
                    }
                    let Some(z) = z.as_f64() else { continue };
                    let w = 1.0 / knn.distance(i).powf(power);
                    sum_w += w;
                    sum_wz += w * z;
                }

                if sum_w > 0.0 {
                    Ok(T::from_f64(sum_wz / sum_w).unwrap_or(oob))
                } else {
                    Ok(oob)
                }
            }
            _ => self.filter.filter(position),
        }
    }

    /// Value of the field at `position`, written into `output`.
    pub fn evaluate_into(&mut self, position: &[f64], output: &mut T) -> Result<()> {
        *output = self.evaluate(position)?;
        Ok(())
    }
}

/// Distance below which inverse-distance interpolation returns the sample's
/// own filter value.
const SNAP_DISTANCE: f64 = 1e-10;

impl<T: ValueElement> Evaluate<T> for ContinuousField<T> {
    fn dims(&self) -> usize {
        self.tree.dims()
    }

    fn evaluate(&mut self, position: &[f64]) -> Result<T> {
        ContinuousField::evaluate(self, position)
    }
}
