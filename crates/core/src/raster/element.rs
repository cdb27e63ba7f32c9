//! Value element trait for sample and cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be attached to a sample or stored in a grid cell.
///
/// Filters aggregate in `f64` and convert back through [`ValueElement::from_f64`],
/// so any copyable numeric type works as a sample value.
pub trait ValueElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Check if this value equals the given out-of-bounds marker
    fn is_out_of_bounds(&self, marker: Self) -> bool;

    /// Convert self to f64
    fn as_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Convert an aggregated f64 back into this type.
    ///
    /// Integer types round to the nearest value; `None` when out of range.
    fn from_f64(value: f64) -> Option<Self>;
}

macro_rules! impl_value_element_int {
    ($t:ty) => {
        impl ValueElement for $t {
            fn is_out_of_bounds(&self, marker: Self) -> bool {
                *self == marker
            }

            fn from_f64(value: f64) -> Option<Self> {
                NumCast::from(value.round())
            }
        }
    };
}

macro_rules! impl_value_element_float {
    ($t:ty) => {
        impl ValueElement for $t {
            fn is_out_of_bounds(&self, marker: Self) -> bool {
                if marker.is_nan() {
                    return self.is_nan();
                }
                (self - marker).abs() < <$t>::EPSILON * 100.0
            }

            fn from_f64(value: f64) -> Option<Self> {
                NumCast::from(value)
            }
        }
    };
}

impl_value_element_int!(i8);
impl_value_element_int!(i16);
impl_value_element_int!(i32);
impl_value_element_int!(i64);
impl_value_element_int!(u8);
impl_value_element_int!(u16);
impl_value_element_int!(u32);
impl_value_element_int!(u64);
impl_value_element_float!(f32);
impl_value_element_float!(f64);
