//! Grid data structures for rendered fields

mod element;
mod grid;
mod transform;

pub use element::ValueElement;
pub use grid::{Grid, GridStatistics};
pub use transform::GridTransform;
