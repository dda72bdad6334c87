//! Brain floating point: the high half of an `f32`

use serde::{Deserialize, Serialize};

use super::convert::{Layout, NanPolicy};
use super::ReducedFloat;

/// 16-bit bfloat: 1 sign, 8 exponent, 7 mantissa bits
///
/// Shares the `f32` exponent range, so narrowing never overflows for finite inputs
/// and `f32` denormals map onto bfloat denormals.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Bfloat(u16);

/// OpenCL-style spelling
pub type Bfloat16 = Bfloat;

impl ReducedFloat for Bfloat {
    type Storage = u16;

    const LAYOUT: Layout = Layout {
        exponent_bits: 8,
        mantissa_bits: 7,
        storage_shift: 0,
        nan_policy: NanPolicy::SaturatePayload,
    };
    const NAME: &'static str = "bfloat";

    #[inline]
    fn from_packed(packed: u32) -> Self {
        Bfloat(packed as u16)
    }

    #[inline]
    fn to_packed(self) -> u32 {
        u32::from(self.0)
    }

    #[inline]
    fn from_storage(bits: u16) -> Self {
        Bfloat(bits)
    }

    #[inline]
    fn storage(self) -> u16 {
        self.0
    }
}

super::ops::narrow_ops!(Bfloat, u16, 4);
