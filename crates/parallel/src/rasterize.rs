//! Rasterization of filters and fields over discrete domains
//!
//! Every output item (grid cell or sample) is evaluated independently, so
//! the sequential and parallel modes produce identical results. Parallel
//! runs split the flat item range into blocks (see [`block_size`]); each
//! block works with its own evaluator, either cloned from the caller's or
//! freshly created by a [`FilterFactory`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spotfield_algorithms::{ContinuousField, Evaluate, FilterFactory, KdTree};
use spotfield_core::{DiscreteInterval, Error, Grid, GridTransform, PointSet, Result, ValueElement};
use tracing::debug;

use crate::blocks::{block_size, BlockIterator};
use crate::strategy::{ParallelStrategy, ProcessingMode};

/// Drives evaluation of a filter or field over many positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rasterizer {
    /// Sequential or parallel execution
    pub mode: ProcessingMode,
    /// Items per block (default: `max(1000, n / 100)`)
    pub block_size: Option<usize>,
}

impl Rasterizer {
    /// Rasterizer with the given mode and default block size
    pub fn new(mode: ProcessingMode) -> Self {
        Self {
            mode,
            block_size: None,
        }
    }

    /// Single-threaded rasterizer
    pub fn sequential() -> Self {
        Self::new(ProcessingMode::Sequential)
    }

    /// Rasterizer on the global thread pool
    pub fn parallel() -> Self {
        Self::new(ProcessingMode::Parallel)
    }

    /// Override the number of items per block.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size.max(1));
        self
    }

    fn block_size_for(&self, n: usize) -> usize {
        self.block_size.unwrap_or_else(|| block_size(n))
    }

    /// Evaluate `evaluator` at every cell of `domain`, mapped to real
    /// positions through `transform`.
    pub fn rasterize<T, E>(
        &self,
        evaluator: &E,
        domain: DiscreteInterval,
        transform: GridTransform,
    ) -> Result<Grid<T>>
    where
        T: ValueElement,
        E: Evaluate<T> + Sync,
    {
        let mut grid = Grid::new(domain);
        grid.set_transform(transform)?;
        self.rasterize_into(evaluator, &mut grid)?;
        Ok(grid)
    }

    /// Evaluate `evaluator` at every cell of a preallocated grid, using the
    /// grid's own transform.
    pub fn rasterize_into<T, E>(&self, evaluator: &E, grid: &mut Grid<T>) -> Result<()>
    where
        T: ValueElement,
        E: Evaluate<T> + Sync,
    {
        self.fill_grid(evaluator.dims(), grid, || Ok(evaluator.clone()))
    }

    /// Rasterize a continuous field, marking the grid with the field's
    /// out-of-bounds value.
    pub fn rasterize_field<T: ValueElement>(
        &self,
        field: &ContinuousField<T>,
        domain: DiscreteInterval,
        transform: GridTransform,
    ) -> Result<Grid<T>> {
        let mut grid = self.rasterize(field, domain, transform)?;
        grid.set_out_of_bounds(Some(field.factory().out_of_bounds()));
        Ok(grid)
    }

    /// Rasterize a filter over `tree`; each block creates its own filter
    /// from `factory`.
    pub fn rasterize_filter<T: ValueElement>(
        &self,
        factory: &FilterFactory<T>,
        tree: &Arc<KdTree<T>>,
        domain: DiscreteInterval,
        transform: GridTransform,
    ) -> Result<Grid<T>> {
        let mut grid = Grid::filled(domain, factory.out_of_bounds());
        grid.set_transform(transform)?;
        grid.set_out_of_bounds(Some(factory.out_of_bounds()));
        self.fill_grid(tree.dims(), &mut grid, || factory.create_filter(tree))?;
        Ok(grid)
    }

    /// Filter every sample of `tree` at its own position.
    ///
    /// The result has the same positions, in the same order, with filtered
    /// values, and can be fed into another factory.
    pub fn filter_points<T: ValueElement>(
        &self,
        factory: &FilterFactory<T>,
        tree: &Arc<KdTree<T>>,
    ) -> Result<PointSet<T>> {
        let points = tree.points();
        let mut values = vec![factory.out_of_bounds(); points.len()];
        let block_size = self.block_size_for(values.len());

        debug!(
            filter = factory.filter_type().name(),
            points = values.len(),
            blocks = BlockIterator::new(values.len(), block_size).num_blocks(),
            mode = ?self.mode,
            "filtering points"
        );

        self.mode.for_each_block(&mut values, block_size, |block, out| {
            let mut filter = factory.create_filter(tree)?;
            for (i, value) in block.range().zip(out.iter_mut()) {
                *value = filter.filter(points.position(i))?;
            }
            Ok(())
        })?;

        points.with_values(values)
    }

    fn fill_grid<T, E, M>(&self, dims: usize, grid: &mut Grid<T>, make: M) -> Result<()>
    where
        T: ValueElement,
        E: Evaluate<T>,
        M: Fn() -> Result<E> + Sync + Send,
    {
        Error::check_dims(dims, grid.dims())?;

        let domain = grid.domain().clone();
        let transform = grid.transform().clone();
        let cells = grid.cells_mut()?;
        let block_size = self.block_size_for(cells.len());

        debug!(
            cells = cells.len(),
            blocks = BlockIterator::new(cells.len(), block_size).num_blocks(),
            mode = ?self.mode,
            "rasterizing"
        );

        self.mode.for_each_block(cells, block_size, |block, out| {
            let mut evaluator = make()?;
            let mut cell = vec![0i64; dims];
            let mut position = vec![0.0; dims];
            for (i, value) in block.range().zip(out.iter_mut()) {
                domain.cell_at(i, &mut cell);
                transform.apply(&cell, &mut position);
                *value = evaluator.evaluate(&position)?;
            }
            Ok(())
        })?;

        debug!(cells = domain.num_cells(), "rasterization finished");
        Ok(())
    }
}
