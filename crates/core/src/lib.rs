//! # spotfield Core
//!
//! Core types shared by the spotfield crates.
//!
//! This crate provides:
//! - `PointSet<T>`: ordered (position, value) samples of fixed dimensionality
//! - `SampleSource`: named-channel access to point sets from a data layer
//! - `RealInterval` / `DiscreteInterval`: bounding boxes and cell domains
//! - `Grid<T>`: n-dimensional rendered output with its `GridTransform`
//! - The shared `Error` type

pub mod error;
pub mod interval;
pub mod point;
pub mod raster;

pub use error::{Error, Result};
pub use interval::{DiscreteInterval, RealInterval};
pub use point::{ChannelTable, PointSet, Sample, SampleSource};
pub use raster::{Grid, GridTransform, ValueElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::interval::{DiscreteInterval, RealInterval};
    pub use crate::point::{ChannelTable, PointSet, Sample, SampleSource};
    pub use crate::raster::{Grid, GridTransform, ValueElement};
}
