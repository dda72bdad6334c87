//! Software reduced-precision floating point
//!
//! Three narrow binary formats share one conversion core:
//!
//! | type     | storage | sign/exponent/mantissa | notes                          |
//! |----------|---------|------------------------|--------------------------------|
//! | `Half`   | `u16`   | 1/5/10                 | IEEE binary16                  |
//! | `Bfloat` | `u16`   | 1/8/7                  | the high half of an `f32` lane |
//! | `Tfloat` | `u32`   | 1/8/10                 | high 19 bits, 13 padding bits  |
//!
//! Arithmetic and library functions widen to `f32`, compute, and round back once.

mod bfloat;
pub mod convert;
mod half;
pub mod limits;
pub mod math;
mod ops;
mod tfloat;
pub mod traits;

use std::fmt;

pub use bfloat::{Bfloat, Bfloat16};
pub use convert::{Layout, NanPolicy, RoundingMode};
pub use half::Half;
pub use limits::NumericLimits;
pub use math::NarrowMath;
pub use tfloat::Tfloat;
pub use traits::{FloatKind, FloatType};

/// A narrow binary float whose whole state is its storage word
///
/// Implementors only describe their layout and how the packed encoding sits in the
/// storage word; every predicate and conversion is derived from that.
pub trait ReducedFloat:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The storage word (`u16` or `u32`)
    type Storage: Copy + Eq + fmt::LowerHex + fmt::Debug + Send + Sync + 'static;

    const LAYOUT: Layout;
    const NAME: &'static str;

    /// Build from the packed sign/exponent/mantissa encoding
    fn from_packed(packed: u32) -> Self;

    /// The packed sign/exponent/mantissa encoding, padding removed
    fn to_packed(self) -> u32;

    fn from_storage(bits: Self::Storage) -> Self;

    fn storage(self) -> Self::Storage;

    /// Narrow an `f32` with an explicit rounding direction
    fn narrow(value: f32, mode: RoundingMode) -> Self {
        Self::from_packed(convert::narrow_from_f32(value, &Self::LAYOUT, mode))
    }

    /// The exactly representable `f32` value
    fn widen(self) -> f32 {
        convert::narrow_to_f32(self.to_packed(), &Self::LAYOUT)
    }

    fn is_nan(self) -> bool {
        let layout = Self::LAYOUT;
        let packed = self.to_packed();
        packed & layout.exponent_mask() == layout.exponent_mask()
            && packed & layout.mantissa_mask() != 0
    }

    fn is_infinite(self) -> bool {
        self.to_packed() & Self::LAYOUT.magnitude_mask() == Self::LAYOUT.infinity()
    }

    fn is_finite(self) -> bool {
        let layout = Self::LAYOUT;
        self.to_packed() & layout.exponent_mask() != layout.exponent_mask()
    }

    fn is_denormal(self) -> bool {
        let layout = Self::LAYOUT;
        let packed = self.to_packed();
        packed & layout.exponent_mask() == 0 && packed & layout.mantissa_mask() != 0
    }

    fn is_zero(self) -> bool {
        self.to_packed() & Self::LAYOUT.magnitude_mask() == 0
    }

    fn is_sign_negative(self) -> bool {
        self.to_packed() & Self::LAYOUT.sign_mask() != 0
    }

    /// False only for the two zeros
    fn to_bool(self) -> bool {
        !self.is_zero()
    }

    /// Denormals become the zero of the same sign
    fn flush_to_zero(self) -> Self {
        if self.is_denormal() {
            Self::from_packed(self.to_packed() & Self::LAYOUT.sign_mask())
        } else {
            self
        }
    }

    /// Equal if both are NaN (any payload) or the encodings are identical
    fn nan_sensitive_eq(self, other: Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.to_packed() == other.to_packed()
    }

    /// The neighbouring encoding of `self` in the direction of `toward`
    fn next_after(self, toward: Self) -> Self {
        if self.is_nan() || toward.is_nan() {
            return Self::narrow(self.widen() + toward.widen(), RoundingMode::NearestEven);
        }
        if self == toward {
            return toward;
        }
        let layout = Self::LAYOUT;
        if self.is_zero() {
            let sign = if toward > self { 0 } else { layout.sign_mask() };
            return Self::from_packed(sign | 1);
        }

        let packed = self.to_packed();
        let sign = packed & layout.sign_mask();
        let magnitude = packed & layout.magnitude_mask();
        let away_from_zero = (toward > self) != self.is_sign_negative();
        let magnitude = if away_from_zero {
            magnitude + 1
        } else {
            magnitude - 1
        };
        Self::from_packed(sign | magnitude)
    }

    /// Apply an `f32` function and round the result back
    fn map_f32(self, f: impl FnOnce(f32) -> f32) -> Self {
        Self::narrow(f(self.widen()), RoundingMode::NearestEven)
    }

    /// Apply a binary `f32` function and round the result back
    fn zip_f32(self, other: Self, f: impl FnOnce(f32, f32) -> f32) -> Self {
        Self::narrow(f(self.widen(), other.widen()), RoundingMode::NearestEven)
    }
}
