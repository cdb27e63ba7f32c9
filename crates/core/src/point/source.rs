//! Named-channel sample sources
//!
//! A data layer exposes many value channels (e.g. one per gene) measured at a
//! shared set of locations. Each channel is handed out as its own
//! [`PointSet`].

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::interval::RealInterval;
use crate::point::PointSet;
use crate::raster::ValueElement;

/// A provider of per-channel point sets.
pub trait SampleSource<T: ValueElement> {
    /// Dimensionality of every position
    fn dims(&self) -> usize;

    /// Names of all available channels
    fn channel_names(&self) -> Vec<&str>;

    /// Samples of one channel
    fn channel(&self, name: &str) -> Result<PointSet<T>>;

    /// Bounding interval of all positions, `None` when there are none
    fn interval(&self) -> Option<RealInterval>;
}

/// In-memory source: one position table, many value columns.
#[derive(Debug, Clone)]
pub struct ChannelTable<T> {
    locations: PointSet<T>,
    channels: BTreeMap<String, Vec<T>>,
}

impl<T: ValueElement> ChannelTable<T> {
    /// Create a table over flat `coords` with `dims` coordinates per location.
    ///
    /// A table needs at least one location.
    pub fn new(dims: usize, coords: Vec<f64>) -> Result<Self> {
        if dims == 0 {
            return Err(Error::InvalidDimensions(vec![0]));
        }
        if coords.len() % dims != 0 {
            return Err(Error::LengthMismatch {
                expected: coords.len() / dims * dims,
                actual: coords.len(),
            });
        }
        let n = coords.len() / dims;
        if n == 0 {
            return Err(Error::EmptyPointSet);
        }
        let locations = PointSet::from_parts(dims, coords, vec![T::zero(); n])?;
        Ok(Self {
            locations,
            channels: BTreeMap::new(),
        })
    }

    /// Number of locations
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the table has no locations
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Add or replace a channel; `values` must hold one entry per location.
    pub fn insert_channel(&mut self, name: impl Into<String>, values: Vec<T>) -> Result<()> {
        if values.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.channels.insert(name.into(), values);
        Ok(())
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

impl<T: ValueElement> SampleSource<T> for ChannelTable<T> {
    fn dims(&self) -> usize {
        self.locations.dims()
    }

    fn channel_names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }

    fn channel(&self, name: &str) -> Result<PointSet<T>> {
        let values = self
            .channels
            .get(name)
            .ok_or_else(|| Error::UnknownChannel(name.to_string()))?;
        self.locations.with_values(values.clone())
    }

    fn interval(&self) -> Option<RealInterval> {
        self.locations.bounds()
    }
}
