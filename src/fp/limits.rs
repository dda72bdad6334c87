//! Numeric limits of every supported float type
//!
//! The narrow tables are literal encodings, not computed values.

use super::{Bfloat, Half, Tfloat};

/// `numeric_limits`-style queries usable from generic code
pub trait NumericLimits: Copy {
    /// Smallest positive normal value
    const MIN_POSITIVE: Self;
    /// Largest finite value
    const MAX: Self;
    /// Most negative finite value
    const LOWEST: Self;
    const EPSILON: Self;
    const ROUND_ERROR: Self;
    const INFINITY: Self;
    const QUIET_NAN: Self;
    const SIGNALING_NAN: Self;
    /// Smallest positive denormal
    const DENORM_MIN: Self;

    /// Mantissa digits
    const DIGITS: u32;
    /// One more than the smallest normal exponent
    const MIN_EXP: i32;
    /// One more than the largest finite exponent
    const MAX_EXP: i32;
    const HAS_DENORM: bool;
    const IS_IEC559: bool;
}

macro_rules! narrow_limits {
    (
        $ty:ident {
            min_positive: $min:literal,
            max: $max:literal,
            lowest: $lowest:literal,
            epsilon: $eps:literal,
            round_error: $round:literal,
            infinity: $inf:literal,
            neg_infinity: $neg_inf:literal,
            quiet_nan: $qnan:literal,
            denorm_min: $denorm:literal,
            digits: $digits:literal,
            min_exp: $min_exp:literal,
            max_exp: $max_exp:literal,
        }
    ) => {
        impl $ty {
            pub const ZERO: $ty = $ty::from_bits(0);
            pub const MIN_POSITIVE: $ty = $ty::from_bits($min);
            pub const MAX: $ty = $ty::from_bits($max);
            pub const MIN: $ty = $ty::from_bits($lowest);
            pub const EPSILON: $ty = $ty::from_bits($eps);
            pub const INFINITY: $ty = $ty::from_bits($inf);
            pub const NEG_INFINITY: $ty = $ty::from_bits($neg_inf);
            pub const NAN: $ty = $ty::from_bits($qnan);
            pub const DENORM_MIN: $ty = $ty::from_bits($denorm);
        }

        impl NumericLimits for $ty {
            const MIN_POSITIVE: Self = $ty::from_bits($min);
            const MAX: Self = $ty::from_bits($max);
            const LOWEST: Self = $ty::from_bits($lowest);
            const EPSILON: Self = $ty::from_bits($eps);
            const ROUND_ERROR: Self = $ty::from_bits($round);
            const INFINITY: Self = $ty::from_bits($inf);
            const QUIET_NAN: Self = $ty::from_bits($qnan);
            const SIGNALING_NAN: Self = $ty::from_bits($qnan);
            const DENORM_MIN: Self = $ty::from_bits($denorm);

            const DIGITS: u32 = $digits;
            const MIN_EXP: i32 = $min_exp;
            const MAX_EXP: i32 = $max_exp;
            const HAS_DENORM: bool = true;
            const IS_IEC559: bool = false;
        }
    };
}

narrow_limits!(Half {
    min_positive: 0x0400,
    max: 0x7bff,
    lowest: 0xfbff,
    epsilon: 0x1400,
    round_error: 0x3800,
    infinity: 0x7c00,
    neg_infinity: 0xfc00,
    quiet_nan: 0x7c01,
    denorm_min: 0x0001,
    digits: 10,
    min_exp: -13,
    max_exp: 16,
});

narrow_limits!(Bfloat {
    min_positive: 0x0080,
    max: 0x7f7f,
    lowest: 0xff7f,
    epsilon: 0x3c00,
    round_error: 0x3f00,
    infinity: 0x7f80,
    neg_infinity: 0xff80,
    quiet_nan: 0x7f81,
    denorm_min: 0x0001,
    digits: 8,
    min_exp: -125,
    max_exp: 128,
});

narrow_limits!(Tfloat {
    min_positive: 0x0080_0000,
    max: 0x7f7f_e000,
    lowest: 0xff7f_e000,
    epsilon: 0x3a80_0000,
    round_error: 0x3f00_0000,
    infinity: 0x7f80_0000,
    neg_infinity: 0xff80_0000,
    quiet_nan: 0x7f80_2000,
    denorm_min: 0x0000_2000,
    digits: 11,
    min_exp: -125,
    max_exp: 128,
});

macro_rules! native_limits {
    ($ty:ident) => {
        impl NumericLimits for $ty {
            const MIN_POSITIVE: Self = $ty::MIN_POSITIVE;
            const MAX: Self = $ty::MAX;
            const LOWEST: Self = $ty::MIN;
            const EPSILON: Self = $ty::EPSILON;
            const ROUND_ERROR: Self = 0.5;
            const INFINITY: Self = $ty::INFINITY;
            const QUIET_NAN: Self = $ty::NAN;
            const SIGNALING_NAN: Self = $ty::NAN;
            const DENORM_MIN: Self = $ty::from_bits(1);

            const DIGITS: u32 = $ty::MANTISSA_DIGITS;
            const MIN_EXP: i32 = $ty::MIN_EXP;
            const MAX_EXP: i32 = $ty::MAX_EXP;
            const HAS_DENORM: bool = true;
            const IS_IEC559: bool = true;
        }
    };
}

native_limits!(f32);
native_limits!(f64);
