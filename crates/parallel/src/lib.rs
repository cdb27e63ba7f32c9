//! # spotfield Parallel
//!
//! Rasterization of filters and continuous fields.
//!
//! This crate provides:
//! - `ProcessingMode`: sequential, global-pool or dedicated-pool execution
//! - Block partitioning of flat item ranges
//! - `Rasterizer`: evaluation into a new grid, a preallocated grid, or a
//!   filtered `PointSet`
//!
//! The `parallel` feature (on by default) enables the Rayon backend; without
//! it every mode runs sequentially.

pub mod blocks;
pub mod rasterize;
pub mod strategy;

pub use blocks::{block_size, Block, BlockIterator};
pub use rasterize::Rasterizer;
pub use strategy::{num_cpus, ParallelStrategy, ProcessingMode};
