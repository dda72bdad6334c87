//! Operator, formatting and comparison impls shared by the narrow formats
//!
//! Operand rules:
//! - narrow with narrow of the same format gives that format (one rounding);
//! - narrow with an integer promotes the integer to the narrow format first;
//! - narrow with `f32` / `f64` promotes the narrow value and yields the float type.

macro_rules! mixed_int_op {
    ($ty:ty, $int:ty, $tr:ident, $method:ident, $op:tt) => {
        impl ::std::ops::$tr<$int> for $ty {
            type Output = $ty;

            #[inline]
            fn $method(self, rhs: $int) -> $ty {
                self $op <$ty>::from_f32(rhs as f32)
            }
        }

        impl ::std::ops::$tr<$ty> for $int {
            type Output = $ty;

            #[inline]
            fn $method(self, rhs: $ty) -> $ty {
                <$ty>::from_f32(self as f32) $op rhs
            }
        }
    };
}

macro_rules! mixed_float_op {
    ($ty:ty, $float:ty, $tr:ident, $method:ident, $op:tt) => {
        impl ::std::ops::$tr<$float> for $ty {
            type Output = $float;

            #[inline]
            fn $method(self, rhs: $float) -> $float {
                <$float>::from(self) $op rhs
            }
        }

        impl ::std::ops::$tr<$ty> for $float {
            type Output = $float;

            #[inline]
            fn $method(self, rhs: $ty) -> $float {
                self $op <$float>::from(rhs)
            }
        }
    };
}

macro_rules! narrow_binary_op {
    ($ty:ty, $tr:ident, $method:ident, $assign_tr:ident, $assign_method:ident, $op:tt) => {
        impl ::std::ops::$tr for $ty {
            type Output = $ty;

            #[inline]
            fn $method(self, rhs: $ty) -> $ty {
                <$ty>::from_f32(self.to_f32() $op rhs.to_f32())
            }
        }

        impl ::std::ops::$tr<&$ty> for $ty {
            type Output = $ty;

            #[inline]
            fn $method(self, rhs: &$ty) -> $ty {
                self $op *rhs
            }
        }

        impl ::std::ops::$assign_tr for $ty {
            #[inline]
            fn $assign_method(&mut self, rhs: $ty) {
                *self = *self $op rhs;
            }
        }

        impl ::std::ops::$assign_tr<f32> for $ty {
            #[inline]
            fn $assign_method(&mut self, rhs: f32) {
                *self = <$ty>::from_f32(self.to_f32() $op rhs);
            }
        }

        $crate::fp::ops::mixed_float_op!($ty, f32, $tr, $method, $op);
        $crate::fp::ops::mixed_float_op!($ty, f64, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, i8, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, i16, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, i32, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, i64, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, isize, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, u8, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, u16, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, u32, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, u64, $tr, $method, $op);
        $crate::fp::ops::mixed_int_op!($ty, usize, $tr, $method, $op);
    };
}

macro_rules! mixed_float_cmp {
    ($ty:ty, $float:ty) => {
        impl PartialEq<$float> for $ty {
            #[inline]
            fn eq(&self, other: &$float) -> bool {
                <$float>::from(*self) == *other
            }
        }

        impl PartialEq<$ty> for $float {
            #[inline]
            fn eq(&self, other: &$ty) -> bool {
                *self == <$float>::from(*other)
            }
        }

        impl PartialOrd<$float> for $ty {
            #[inline]
            fn partial_cmp(&self, other: &$float) -> Option<::std::cmp::Ordering> {
                <$float>::from(*self).partial_cmp(other)
            }
        }

        impl PartialOrd<$ty> for $float {
            #[inline]
            fn partial_cmp(&self, other: &$ty) -> Option<::std::cmp::Ordering> {
                self.partial_cmp(&<$float>::from(*other))
            }
        }
    };
}

/// Everything a narrow format gets besides its layout
macro_rules! narrow_ops {
    ($ty:ident, $storage:ty, $digits:literal) => {
        impl $ty {
            /// Wrap a raw storage word; every bit pattern is a valid value
            #[inline]
            pub const fn from_bits(bits: $storage) -> Self {
                Self(bits)
            }

            /// The raw storage word
            #[inline]
            pub const fn to_bits(self) -> $storage {
                self.0
            }

            /// Round to nearest even
            #[inline]
            pub fn from_f32(value: f32) -> Self {
                <Self as $crate::fp::ReducedFloat>::narrow(
                    value,
                    $crate::fp::RoundingMode::NearestEven,
                )
            }

            #[inline]
            pub fn from_f32_with_rounding(value: f32, mode: $crate::fp::RoundingMode) -> Self {
                <Self as $crate::fp::ReducedFloat>::narrow(value, mode)
            }

            /// Narrow through `f32`
            #[inline]
            pub fn from_f64(value: f64) -> Self {
                Self::from_f32(value as f32)
            }

            #[inline]
            pub fn to_f32(self) -> f32 {
                <Self as $crate::fp::ReducedFloat>::widen(self)
            }

            #[inline]
            pub fn to_f64(self) -> f64 {
                f64::from(self.to_f32())
            }

            #[inline]
            pub fn is_nan(self) -> bool {
                <Self as $crate::fp::ReducedFloat>::is_nan(self)
            }

            #[inline]
            pub fn is_infinite(self) -> bool {
                <Self as $crate::fp::ReducedFloat>::is_infinite(self)
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                <Self as $crate::fp::ReducedFloat>::is_finite(self)
            }

            #[inline]
            pub fn is_sign_negative(self) -> bool {
                <Self as $crate::fp::ReducedFloat>::is_sign_negative(self)
            }
        }

        impl From<$ty> for f32 {
            #[inline]
            fn from(value: $ty) -> f32 {
                value.to_f32()
            }
        }

        impl From<$ty> for f64 {
            #[inline]
            fn from(value: $ty) -> f64 {
                value.to_f64()
            }
        }

        impl PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.to_f32() == other.to_f32()
            }
        }

        impl PartialOrd for $ty {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                self.to_f32().partial_cmp(&other.to_f32())
            }
        }

        $crate::fp::ops::mixed_float_cmp!($ty, f32);
        $crate::fp::ops::mixed_float_cmp!($ty, f64);

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "0x{:0digits$x}", self.0, digits = $digits)
            }
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}(0x{:0digits$x} = {:?})",
                    stringify!($ty),
                    self.0,
                    self.to_f32(),
                    digits = $digits
                )
            }
        }

        impl ::std::fmt::LowerHex for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl ::std::fmt::UpperHex for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::UpperHex::fmt(&self.0, f)
            }
        }

        impl ::std::ops::Neg for $ty {
            type Output = $ty;

            #[inline]
            fn neg(self) -> $ty {
                use $crate::fp::ReducedFloat;
                <$ty>::from_packed(self.to_packed() ^ <$ty as ReducedFloat>::LAYOUT.sign_mask())
            }
        }

        $crate::fp::ops::narrow_binary_op!($ty, Add, add, AddAssign, add_assign, +);
        $crate::fp::ops::narrow_binary_op!($ty, Sub, sub, SubAssign, sub_assign, -);
        $crate::fp::ops::narrow_binary_op!($ty, Mul, mul, MulAssign, mul_assign, *);
        $crate::fp::ops::narrow_binary_op!($ty, Div, div, DivAssign, div_assign, /);
        $crate::fp::ops::narrow_binary_op!($ty, Rem, rem, RemAssign, rem_assign, %);

        impl ::std::iter::Sum for $ty {
            fn sum<I: Iterator<Item = $ty>>(iter: I) -> $ty {
                iter.fold(<$ty>::from_bits(0), |acc, x| acc + x)
            }
        }

        impl<'a> ::std::iter::Sum<&'a $ty> for $ty {
            fn sum<I: Iterator<Item = &'a $ty>>(iter: I) -> $ty {
                iter.copied().sum()
            }
        }

        impl ::std::iter::Product for $ty {
            fn product<I: Iterator<Item = $ty>>(iter: I) -> $ty {
                iter.fold(<$ty>::from_f32(1.0), |acc, x| acc * x)
            }
        }

        impl<'a> ::std::iter::Product<&'a $ty> for $ty {
            fn product<I: Iterator<Item = &'a $ty>>(iter: I) -> $ty {
                iter.copied().product()
            }
        }
    };
}

pub(crate) use {mixed_float_cmp, mixed_float_op, mixed_int_op, narrow_binary_op, narrow_ops};
