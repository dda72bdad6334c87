//! Bit-level conversion between `f32` and the narrow formats
//!
//! Every narrow format is described by a [`Layout`]. The functions here work on the
//! *packed* encoding: sign, exponent and mantissa fields right-aligned in a `u32`.
//! Formats that keep padding bits in their storage shift the packed value into place
//! themselves (see `Tfloat`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

const F32_MANTISSA_BITS: u32 = 23;
const F32_BIAS: i32 = 127;
const F32_EXPONENT_MAX: u32 = 0xff;
const F32_MANTISSA_MASK: u32 = 0x007f_ffff;

/// How a format encodes NaN payloads that do not fit its mantissa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanPolicy {
    /// Keep the truncated payload and force the quiet bit
    QuietBit,
    /// Keep the truncated payload; set every mantissa bit if truncation dropped payload bits
    SaturatePayload,
}

/// Rounding direction used when a value does not fit the narrow mantissa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Round to nearest, ties to even
    #[default]
    NearestEven,
    /// Truncate toward zero
    TowardZero,
    /// Round toward positive infinity
    Upward,
    /// Round toward negative infinity
    Downward,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::NearestEven => write!(f, "nearest-even"),
            RoundingMode::TowardZero => write!(f, "toward-zero"),
            RoundingMode::Upward => write!(f, "upward"),
            RoundingMode::Downward => write!(f, "downward"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest-even" | "rne" | "nearest" => Ok(RoundingMode::NearestEven),
            "toward-zero" | "rtz" => Ok(RoundingMode::TowardZero),
            "upward" | "rtp" => Ok(RoundingMode::Upward),
            "downward" | "rtn" => Ok(RoundingMode::Downward),
            other => Err(CheckError::InvalidValue {
                value: other.to_string(),
                reason: "expected nearest-even, toward-zero, upward or downward".to_string(),
            }),
        }
    }
}

/// Field widths and encoding rules of a narrow binary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub exponent_bits: u32,
    pub mantissa_bits: u32,
    /// Number of padding bits below the packed encoding in the storage word
    pub storage_shift: u32,
    pub nan_policy: NanPolicy,
}

impl Layout {
    /// Total width of the packed encoding
    pub const fn width(&self) -> u32 {
        1 + self.exponent_bits + self.mantissa_bits
    }

    pub const fn bias(&self) -> i32 {
        (1 << (self.exponent_bits - 1)) - 1
    }

    /// Smallest unbiased exponent of a normal value
    pub const fn min_exponent(&self) -> i32 {
        1 - self.bias()
    }

    /// Largest unbiased exponent of a finite value
    pub const fn max_exponent(&self) -> i32 {
        self.bias()
    }

    /// The all-ones exponent field value (infinity / NaN)
    pub const fn exponent_field_max(&self) -> u32 {
        (1 << self.exponent_bits) - 1
    }

    pub const fn mantissa_mask(&self) -> u32 {
        (1 << self.mantissa_bits) - 1
    }

    pub const fn exponent_mask(&self) -> u32 {
        self.exponent_field_max() << self.mantissa_bits
    }

    pub const fn sign_mask(&self) -> u32 {
        1 << (self.exponent_bits + self.mantissa_bits)
    }

    pub const fn magnitude_mask(&self) -> u32 {
        self.sign_mask() - 1
    }

    /// Packed positive infinity
    pub const fn infinity(&self) -> u32 {
        self.exponent_mask()
    }

    /// Packed largest finite magnitude
    pub const fn max_finite(&self) -> u32 {
        self.exponent_mask() - 1
    }

    /// Bits dropped from an `f32` mantissa when narrowing a normal value
    const fn dropped_bits(&self) -> u32 {
        F32_MANTISSA_BITS - self.mantissa_bits
    }
}

/// Narrow an `f32` to the packed encoding of `layout`
pub fn narrow_from_f32(value: f32, layout: &Layout, mode: RoundingMode) -> u32 {
    let bits = value.to_bits();
    let negative = bits >> 31 != 0;
    let sign = if negative { layout.sign_mask() } else { 0 };
    let exponent_field = (bits >> F32_MANTISSA_BITS) & F32_EXPONENT_MAX;
    let mantissa = bits & F32_MANTISSA_MASK;

    if exponent_field == F32_EXPONENT_MAX {
        if mantissa == 0 {
            return sign | layout.infinity();
        }
        return sign | layout.infinity() | nan_payload(mantissa, layout);
    }
    if exponent_field == 0 && mantissa == 0 {
        return sign;
    }

    // value = significand * 2^(exponent - 23)
    let (significand, exponent) = if exponent_field == 0 {
        (mantissa, 1 - F32_BIAS)
    } else {
        (mantissa | 1 << F32_MANTISSA_BITS, exponent_field as i32 - F32_BIAS)
    };

    if exponent > layout.max_exponent() {
        return sign | overflow(layout, negative, mode);
    }

    let (shift, base) = if exponent >= layout.min_exponent() {
        let biased = (exponent + layout.bias()) as u32;
        // the implicit bit of `kept` supplies the last exponent increment
        (layout.dropped_bits(), (biased - 1) << layout.mantissa_bits)
    } else {
        let underflow = (layout.min_exponent() - exponent) as u32;
        (layout.dropped_bits() + underflow, 0)
    };

    // a carry out of the mantissa lands in the exponent field, up to infinity
    sign | (base + round_significand(significand, shift, negative, mode))
}

/// Widen the packed encoding of `layout` to the exactly representable `f32`
pub fn narrow_to_f32(packed: u32, layout: &Layout) -> f32 {
    let mantissa_bits = layout.mantissa_bits;
    let sign = if packed & layout.sign_mask() != 0 { 1 << 31 } else { 0 };
    let exponent_field = (packed >> mantissa_bits) & layout.exponent_field_max();
    let mantissa = packed & layout.mantissa_mask();

    if exponent_field == layout.exponent_field_max() {
        return f32::from_bits(
            sign | F32_EXPONENT_MAX << F32_MANTISSA_BITS | mantissa << layout.dropped_bits(),
        );
    }
    if exponent_field == 0 {
        if mantissa == 0 {
            return f32::from_bits(sign);
        }
        let magnitude =
            mantissa as f32 * pow2(layout.min_exponent() - mantissa_bits as i32);
        return f32::from_bits(sign | magnitude.to_bits());
    }

    let exponent = (exponent_field as i32 - layout.bias() + F32_BIAS) as u32;
    f32::from_bits(sign | exponent << F32_MANTISSA_BITS | mantissa << layout.dropped_bits())
}

/// Shift `significand` right by `shift` bits, rounding the discarded part per `mode`
fn round_significand(significand: u32, shift: u32, negative: bool, mode: RoundingMode) -> u32 {
    if shift == 0 {
        return significand;
    }
    let wide = u64::from(significand);
    if shift > 32 {
        // everything is discarded and lies below half of the smallest step
        return u32::from(directed_up(mode, negative) && wide != 0);
    }

    let kept = (wide >> shift) as u32;
    let half = 1u64 << (shift - 1);
    let rest = wide & ((1u64 << shift) - 1);

    let round_up = match mode {
        RoundingMode::NearestEven => rest > half || (rest == half && kept & 1 == 1),
        RoundingMode::TowardZero => false,
        RoundingMode::Upward | RoundingMode::Downward => {
            directed_up(mode, negative) && rest != 0
        }
    };
    kept + u32::from(round_up)
}

/// Whether a directed mode grows the magnitude for a value of this sign
fn directed_up(mode: RoundingMode, negative: bool) -> bool {
    match mode {
        RoundingMode::Upward => !negative,
        RoundingMode::Downward => negative,
        RoundingMode::NearestEven | RoundingMode::TowardZero => false,
    }
}

fn overflow(layout: &Layout, negative: bool, mode: RoundingMode) -> u32 {
    match mode {
        RoundingMode::NearestEven => layout.infinity(),
        RoundingMode::TowardZero => layout.max_finite(),
        RoundingMode::Upward | RoundingMode::Downward => {
            if directed_up(mode, negative) {
                layout.infinity()
            } else {
                layout.max_finite()
            }
        }
    }
}

fn nan_payload(mantissa: u32, layout: &Layout) -> u32 {
    let dropped = layout.dropped_bits();
    let kept = mantissa >> dropped;
    match layout.nan_policy {
        NanPolicy::QuietBit => kept | 1 << (layout.mantissa_bits - 1),
        NanPolicy::SaturatePayload => {
            if mantissa & ((1 << dropped) - 1) != 0 {
                layout.mantissa_mask()
            } else {
                kept
            }
        }
    }
}

/// Exact `2^exponent` for exponents inside the `f32` range (denormals included)
fn pow2(exponent: i32) -> f32 {
    if exponent >= 1 - F32_BIAS {
        f32::from_bits(((exponent + F32_BIAS) as u32) << F32_MANTISSA_BITS)
    } else {
        f32::from_bits(1 << (exponent + F32_BIAS - 1 + F32_MANTISSA_BITS as i32))
    }
}
