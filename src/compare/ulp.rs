//! Distance in units of least precision
//!
//! Sign-magnitude encodings are mapped onto a signed ordinal (`+m` for positive
//! values, `-m` for negative ones, `m` being the magnitude bits). Adjacent
//! representable values differ by one, across the sign change, the denormal
//! boundary and up to infinity, and both zeros share ordinal 0.

use std::fmt;

use crate::fp::{Bfloat, Half, ReducedFloat, Tfloat};

/// A float type with a ULP metric
pub trait UlpFloat: Copy + PartialOrd + fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn is_nan(self) -> bool;

    fn to_f64(self) -> f64;

    /// Nearest value of this type
    fn from_f64(value: f64) -> Self;

    /// Position in the monotonic ordering of the encoding
    fn ordinal(self) -> i64;
}

impl UlpFloat for f32 {
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn ordinal(self) -> i64 {
        let bits = self.to_bits();
        let magnitude = i64::from(bits & 0x7fff_ffff);
        if bits >> 31 != 0 { -magnitude } else { magnitude }
    }
}

impl UlpFloat for f64 {
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn ordinal(self) -> i64 {
        let bits = self.to_bits();
        let magnitude = (bits & 0x7fff_ffff_ffff_ffff) as i64;
        if bits >> 63 != 0 { -magnitude } else { magnitude }
    }
}

macro_rules! narrow_ulp_float {
    ($($ty:ty),*) => {
        $(
            impl UlpFloat for $ty {
                fn is_nan(self) -> bool {
                    <$ty>::is_nan(self)
                }

                fn to_f64(self) -> f64 {
                    <$ty>::to_f64(self)
                }

                fn from_f64(value: f64) -> Self {
                    <$ty>::from_f64(value)
                }

                fn ordinal(self) -> i64 {
                    let layout = <$ty as ReducedFloat>::LAYOUT;
                    let packed = self.to_packed();
                    let magnitude = i64::from(packed & layout.magnitude_mask());
                    if packed & layout.sign_mask() != 0 { -magnitude } else { magnitude }
                }
            }
        )*
    };
}

narrow_ulp_float!(Half, Bfloat, Tfloat);

/// Number of representable steps between `result` and `reference`
///
/// Symmetric; zero for equal values including `+0` against `-0`. NaN inputs give an
/// unspecified distance, use [`try_ulp_distance`] when they can occur.
pub fn ulp_distance<F: UlpFloat>(result: F, reference: F) -> u64 {
    result.ordinal().abs_diff(reference.ordinal())
}

/// [`ulp_distance`], or `None` when either value is NaN
pub fn try_ulp_distance<F: UlpFloat>(result: F, reference: F) -> Option<u64> {
    if result.is_nan() || reference.is_nan() {
        return None;
    }
    Some(ulp_distance(result, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distances() {
        assert_eq!(ulp_distance(0.0f32, -0.0f32), 0);
        assert_eq!(ulp_distance(1.5f64, 1.5f64), 0);
        assert_eq!(ulp_distance(Half::from_bits(0x8000), Half::ZERO), 0);
    }

    #[test]
    fn test_neighbours() {
        let x = 1.0f32;
        assert_eq!(ulp_distance(x, f32::from_bits(x.to_bits() + 1)), 1);
        assert_eq!(ulp_distance(f32::from_bits(1), -f32::from_bits(1)), 2);
        assert_eq!(ulp_distance(f32::MAX, f32::INFINITY), 1);
        assert_eq!(ulp_distance(Half::from_bits(0x03ff), Half::from_bits(0x0400)), 1);
    }

    #[test]
    fn test_powers_of_two_f64() {
        assert_eq!(ulp_distance(2.0f64, 4.0f64), 1 << 52);
        assert_eq!(ulp_distance(-2.0f64, -4.0f64), 1 << 52);
    }

    #[test]
    fn test_tfloat_uses_packed_steps() {
        let a = Tfloat::from_bits(0x3f80_0000);
        let b = Tfloat::from_bits(0x3f80_2000);
        assert_eq!(ulp_distance(a, b), 1);
    }

    #[test]
    fn test_extreme_f64_span() {
        assert_eq!(ulp_distance(f64::MAX, f64::MIN), 2 * 0x7fef_ffff_ffff_ffff);
    }

    #[test]
    fn test_nan_is_none() {
        assert_eq!(try_ulp_distance(f32::NAN, 1.0), None);
        assert_eq!(try_ulp_distance(Half::NAN, Half::ZERO), None);
        assert_eq!(try_ulp_distance(1.0f32, 1.0), Some(0));
    }
}
