//! Bfloat16 rounding fixtures and encoding properties

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ulpcheck::{Bfloat, Bfloat16, NumericLimits, ReducedFloat, RoundingMode, ulp_distance};

fn narrow(bits: u32) -> u16 {
    Bfloat::from_f32(f32::from_bits(bits)).to_bits()
}

#[test]
fn test_rounding_fixtures() {
    let fixtures: &[(u32, u16)] = &[
        (0x7f7a_7fff, 0x7f7a),
        (0x7f7a_8000, 0x7f7a),
        (0x7f7a_8001, 0x7f7b),
        (0x7f7b_8000, 0x7f7c),
        (0x3f80_0000, 0x3f80),
        (0xbf80_8000, 0xbf80),
        // the largest f32 rounds past the bfloat maximum
        (0x7f7f_ffff, 0x7f80),
        (0x7f80_0000, 0x7f80),
        (0xff80_0000, 0xff80),
        // NaN payloads
        (0x7f80_0001, 0x7fff),
        (0x7fc0_0000, 0x7fc0),
        (0xffc1_0000, 0xffc1),
        // f32 denormals
        (0x0000_0001, 0x0000),
        (0x8000_0001, 0x8000),
        (0x0000_8001, 0x0001),
        (0x0001_0000, 0x0001),
    ];
    for &(input, expected) in fixtures {
        assert_eq!(narrow(input), expected, "input {:#010x}", input);
    }
}

#[test]
fn test_every_encoding_round_trips() {
    for bits in 0..=u16::MAX {
        let value = Bfloat::from_bits(bits);
        let back = Bfloat::from_f32(value.to_f32());
        if value.is_nan() {
            assert!(back.is_nan());
        } else {
            assert_eq!(back.to_bits(), bits, "bits {:#06x}", bits);
        }
    }
}

#[test]
fn test_widening_is_the_upper_half() {
    for bits in (0..=u16::MAX).step_by(7) {
        let value = Bfloat::from_bits(bits);
        assert_eq!(value.to_f32().to_bits(), u32::from(bits) << 16);
    }
}

#[test]
fn test_next_after_walks_every_positive_value() {
    let mut current = Bfloat::ZERO;
    let mut steps = 0u32;
    while !current.is_infinite() {
        let next = current.next_after(Bfloat::INFINITY);
        assert_eq!(next.to_bits(), current.to_bits() + 1);
        current = next;
        steps += 1;
    }
    assert_eq!(steps, 0x7f80);
}

#[test]
fn test_limits_table() {
    assert_eq!(<Bfloat as NumericLimits>::MAX.to_bits(), 0x7f7f);
    assert_eq!(<Bfloat as NumericLimits>::LOWEST.to_bits(), 0xff7f);
    assert_eq!(<Bfloat as NumericLimits>::MIN_POSITIVE.to_f32(), f32::MIN_POSITIVE);
    assert_eq!(<Bfloat as NumericLimits>::EPSILON.to_f32(), 2f32.powi(-7));
    assert_eq!(<Bfloat as NumericLimits>::ROUND_ERROR.to_f32(), 0.5);
    assert_eq!(<Bfloat as NumericLimits>::DIGITS, 8);
    assert_eq!(<Bfloat as NumericLimits>::MIN_EXP, -125);
    assert_eq!(<Bfloat as NumericLimits>::MAX_EXP, 128);
}

#[test]
fn test_arithmetic_and_formatting() {
    let x: Bfloat16 = Bfloat16::from_f32(1.5);
    assert_eq!(x * Bfloat::from_f32(2.0), Bfloat::from_f32(3.0));
    assert_eq!(Bfloat::MAX + Bfloat::MAX, Bfloat::INFINITY);
    assert_eq!(x.to_string(), "0x3fc0");
    assert_eq!(format!("{:?}", x), "Bfloat(0x3fc0 = 1.5)");
    assert_eq!(format!("{:X}", Bfloat::from_f32(-1.0)), "BF80");

    // 1 + 2^-8 is below the bfloat resolution at 1
    let tiny = Bfloat::from_f32(2f32.powi(-8));
    assert_eq!(Bfloat::from_f32(1.0) + tiny, Bfloat::from_f32(1.0));
}

#[test]
fn test_directed_rounding_never_overflows_to_max() {
    let max = f32::MAX;
    assert_eq!(Bfloat::from_f32_with_rounding(max, RoundingMode::TowardZero), Bfloat::MAX);
    assert_eq!(Bfloat::from_f32_with_rounding(max, RoundingMode::Upward), Bfloat::INFINITY);
    assert_eq!(Bfloat::from_f32_with_rounding(-max, RoundingMode::Upward), Bfloat::MIN);
}

proptest! {
    #[test]
    fn prop_truncation_matches_the_high_half(bits in 0u32..0x7f80_0000) {
        let x = f32::from_bits(bits);
        let truncated = Bfloat::from_f32_with_rounding(x, RoundingMode::TowardZero);
        prop_assert_eq!(u32::from(truncated.to_bits()), bits >> 16);
    }

    #[test]
    fn prop_nearest_is_within_one_step_of_truncation(bits in 0u32..0x7f7f_0000) {
        let x = f32::from_bits(bits);
        let nearest = Bfloat::from_f32(x);
        let truncated = Bfloat::from_f32_with_rounding(x, RoundingMode::TowardZero);
        prop_assert!(ulp_distance(nearest, truncated) <= 1);
    }

    #[test]
    fn prop_neg_flips_only_the_sign(bits in any::<u16>()) {
        let value = Bfloat::from_bits(bits);
        prop_assert_eq!((-value).to_bits(), bits ^ 0x8000);
    }
}
