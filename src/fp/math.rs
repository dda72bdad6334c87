//! Library functions on the narrow formats
//!
//! Every function widens to `f32`, evaluates there and rounds the result back to
//! nearest even once. `abs`, `copysign` and `next_after` work on the encoding.

use super::ReducedFloat;

/// C sentinel returned by `ilogb(0)`
pub const FP_ILOGB0: i32 = i32::MIN;
/// C sentinel returned by `ilogb(NaN)`
pub const FP_ILOGBNAN: i32 = i32::MIN;

macro_rules! unary {
    ($($(#[$meta:meta])* $name:ident => $f:expr;)*) => {
        $(
            $(#[$meta])*
            fn $name(self) -> Self {
                self.map_f32($f)
            }
        )*
    };
}

macro_rules! binary {
    ($($(#[$meta:meta])* $name:ident => $f:expr;)*) => {
        $(
            $(#[$meta])*
            fn $name(self, other: Self) -> Self {
                self.zip_f32(other, $f)
            }
        )*
    };
}

/// Math library over any [`ReducedFloat`]
pub trait NarrowMath: ReducedFloat {
    /// Clears the sign bit; NaN payloads are kept
    fn abs(self) -> Self {
        Self::from_packed(self.to_packed() & Self::LAYOUT.magnitude_mask())
    }

    /// Magnitude of `self` with the sign bit of `sign`
    fn copysign(self, sign: Self) -> Self {
        let sign_mask = Self::LAYOUT.sign_mask();
        Self::from_packed(self.to_packed() & !sign_mask | sign.to_packed() & sign_mask)
    }

    unary! {
        sqrt => f32::sqrt;
        /// `1 / sqrt(x)`
        rsqrt => |x: f32| 1.0 / x.sqrt();
        cbrt => f32::cbrt;
        /// `1 / x`
        recip => f32::recip;
        sin => f32::sin;
        cos => f32::cos;
        tan => f32::tan;
        asin => f32::asin;
        acos => f32::acos;
        atan => f32::atan;
        sinh => f32::sinh;
        cosh => f32::cosh;
        tanh => f32::tanh;
        asinh => f32::asinh;
        acosh => f32::acosh;
        atanh => f32::atanh;
        exp => f32::exp;
        exp2 => f32::exp2;
        exp10 => libm::exp10f;
        exp_m1 => f32::exp_m1;
        ln => f32::ln;
        log2 => f32::log2;
        log10 => f32::log10;
        ln_1p => f32::ln_1p;
        floor => f32::floor;
        ceil => f32::ceil;
        trunc => f32::trunc;
        /// Half-way cases away from zero
        round => f32::round;
        /// Half-way cases to even
        nearbyint => f32::round_ties_even;
        tgamma => libm::tgammaf;
        lgamma => libm::lgammaf;
        erf => libm::erff;
        erfc => libm::erfcf;
    }

    binary! {
        atan2 => f32::atan2;
        pow => f32::powf;
        hypot => f32::hypot;
        /// C `fmod`: the remainder has the sign of `self`
        fmod => |x: f32, y: f32| x % y;
        fmin => f32::min;
        fmax => f32::max;
        /// Positive difference
        fdim => libm::fdimf;
    }

    /// `self^n`
    fn powi(self, n: i32) -> Self {
        self.map_f32(|x| x.powi(n))
    }

    /// `self * 2^n`
    fn ldexp(self, n: i32) -> Self {
        self.map_f32(|x| libm::ldexpf(x, n))
    }

    /// `self * a + b` with a single rounding in `f32`
    fn fma(self, a: Self, b: Self) -> Self {
        Self::narrow(
            self.widen().mul_add(a.widen(), b.widen()),
            super::RoundingMode::NearestEven,
        )
    }

    /// Unbiased exponent; [`FP_ILOGB0`] for zero, [`FP_ILOGBNAN`] for NaN, `i32::MAX`
    /// for infinity
    fn ilogb(self) -> i32 {
        if self.is_nan() {
            return FP_ILOGBNAN;
        }
        if self.is_zero() {
            return FP_ILOGB0;
        }
        if self.is_infinite() {
            return i32::MAX;
        }
        libm::ilogbf(self.widen())
    }
}

impl<T: ReducedFloat> NarrowMath for T {}
