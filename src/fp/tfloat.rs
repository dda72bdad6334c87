//! TensorFloat-32: a 19-bit format kept in the high bits of a 32-bit lane

use serde::{Deserialize, Serialize};

use super::convert::{Layout, NanPolicy};
use super::ReducedFloat;

/// 1 sign, 8 exponent and 10 mantissa bits, left-aligned in a `u32`
///
/// The low 13 storage bits are padding. Conversions ignore them and every
/// constructor except [`Tfloat::from_bits`] leaves them zero.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Tfloat(u32);

const STORAGE_SHIFT: u32 = 13;

impl ReducedFloat for Tfloat {
    type Storage = u32;

    const LAYOUT: Layout = Layout {
        exponent_bits: 8,
        mantissa_bits: 10,
        storage_shift: STORAGE_SHIFT,
        nan_policy: NanPolicy::SaturatePayload,
    };
    const NAME: &'static str = "tfloat";

    #[inline]
    fn from_packed(packed: u32) -> Self {
        Tfloat(packed << STORAGE_SHIFT)
    }

    #[inline]
    fn to_packed(self) -> u32 {
        self.0 >> STORAGE_SHIFT
    }

    #[inline]
    fn from_storage(bits: u32) -> Self {
        Tfloat(bits)
    }

    #[inline]
    fn storage(self) -> u32 {
        self.0
    }
}

super::ops::narrow_ops!(Tfloat, u32, 8);
