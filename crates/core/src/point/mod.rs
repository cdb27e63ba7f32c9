//! Sample and point set types

mod set;
mod source;

pub use set::{dist_sq, PointSet, Sample};
pub use source::{ChannelTable, SampleSource};
