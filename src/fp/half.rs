//! IEEE binary16

use serde::{Deserialize, Serialize};

use super::convert::{Layout, NanPolicy};
use super::ReducedFloat;

/// 16-bit IEEE half precision: 1 sign, 5 exponent, 10 mantissa bits
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Half(u16);

/// Low `f32` mantissa bits dropped when narrowing a normal value to half
const DISCARDED_MASK: u32 = 0x1fff;

impl ReducedFloat for Half {
    type Storage = u16;

    const LAYOUT: Layout = Layout {
        exponent_bits: 5,
        mantissa_bits: 10,
        storage_shift: 0,
        nan_policy: NanPolicy::QuietBit,
    };
    const NAME: &'static str = "half";

    #[inline]
    fn from_packed(packed: u32) -> Self {
        Half(packed as u16)
    }

    #[inline]
    fn to_packed(self) -> u32 {
        u32::from(self.0)
    }

    #[inline]
    fn from_storage(bits: u16) -> Self {
        Half(bits)
    }

    #[inline]
    fn storage(self) -> u16 {
        self.0
    }
}

impl Half {
    /// Stochastically round `value` using the low 13 bits of `random`'s encoding
    ///
    /// The discarded mantissa bits are added to the dither before truncation, so a
    /// uniformly random dither rounds up with probability `discarded / 2^13`. Values
    /// in the half denormal range flush to signed zero; NaN, infinity, zero and `f32`
    /// denormals take the round-to-nearest-even path.
    pub fn from_f32_stochastic(value: f32, random: f32) -> Half {
        let bits = value.to_bits();
        let exponent_field = (bits >> 23) & 0xff;
        if exponent_field == 0 || exponent_field == 0xff {
            return Half::from_f32(value);
        }

        let sign = ((bits >> 16) & 0x8000) as u16;
        let exponent = exponent_field as i32 - 127;
        if exponent < Self::LAYOUT.min_exponent() {
            return Half(sign);
        }
        if exponent > Self::LAYOUT.max_exponent() {
            return Half(sign | Self::LAYOUT.infinity() as u16);
        }

        let dithered = (bits & 0x007f_ffff) + (random.to_bits() & DISCARDED_MASK);
        let biased = (exponent + Self::LAYOUT.bias()) as u32;
        // a carry out of the mantissa bumps the exponent, reaching infinity at the top
        let packed = (biased << 10) + (dithered >> 13);
        Half(sign | packed as u16)
    }
}

super::ops::narrow_ops!(Half, u16, 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_and_display() {
        let one = Half::from_f32(1.0);
        assert_eq!(one.to_bits(), 0x3c00);
        assert_eq!(one.to_string(), "0x3c00");
        assert_eq!(format!("{:?}", one), "Half(0x3c00 = 1.0)");
        assert_eq!(format!("{:#x}", one), "0x3c00");
        assert_eq!(format!("{:X}", Half::from_bits(0xabcd)), "ABCD");
    }

    #[test]
    fn test_stochastic_zero_dither_truncates() {
        // 1 + 2^-11 lies halfway between 1.0 and the next half
        let value = f32::from_bits(0x3f80_1000);
        assert_eq!(Half::from_f32_stochastic(value, 0.0).to_bits(), 0x3c00);
    }

    #[test]
    fn test_stochastic_full_dither_rounds_up() {
        let value = f32::from_bits(0x3f80_0001);
        let random = f32::from_bits(DISCARDED_MASK);
        assert_eq!(Half::from_f32_stochastic(value, random).to_bits(), 0x3c01);
        // exact values never move
        assert_eq!(Half::from_f32_stochastic(1.0, random).to_bits(), 0x3c00);
    }

    #[test]
    fn test_stochastic_carry_into_infinity() {
        let value = f32::from_bits(0x477f_e001);
        let random = f32::from_bits(DISCARDED_MASK);
        assert_eq!(Half::from_f32_stochastic(value, random).to_bits(), 0x7c00);
        assert_eq!(Half::from_f32_stochastic(-value, random).to_bits(), 0xfc00);
    }

    #[test]
    fn test_stochastic_denormal_range_flushes() {
        let tiny = 2f32.powi(-20);
        assert_eq!(Half::from_f32_stochastic(tiny, 0.5).to_bits(), 0x0000);
        assert_eq!(Half::from_f32_stochastic(-tiny, 0.5).to_bits(), 0x8000);
    }

    #[test]
    fn test_stochastic_special_values() {
        assert_eq!(Half::from_f32_stochastic(f32::INFINITY, 0.3).to_bits(), 0x7c00);
        assert!(Half::from_f32_stochastic(f32::NAN, 0.3).is_nan());
        assert_eq!(Half::from_f32_stochastic(-0.0, 0.3).to_bits(), 0x8000);
        assert_eq!(Half::from_f32_stochastic(1.0e6, 0.0).to_bits(), 0x7c00);
    }
}
