//! Scalar and vector operands of a comparison

use std::fmt;

use super::ulp::UlpFloat;
use crate::fp::{Bfloat, Half, Tfloat};

/// A value made of one or more lanes of the same float type
///
/// Scalars are a single lane; `[T; N]` arrays stand in for `N`-wide vectors and
/// `Vec<T>` for vectors whose width is only known at run time.
pub trait Lanes: Clone + fmt::Debug {
    type Scalar: UlpFloat;

    fn lane_count(&self) -> usize;

    /// Lane `index`; `index < lane_count()`
    fn lane(&self, index: usize) -> Self::Scalar;

    fn is_vector(&self) -> bool {
        false
    }
}

macro_rules! scalar_lanes {
    ($($ty:ty),*) => {
        $(
            impl Lanes for $ty {
                type Scalar = $ty;

                fn lane_count(&self) -> usize {
                    1
                }

                fn lane(&self, _index: usize) -> $ty {
                    *self
                }
            }
        )*
    };
}

scalar_lanes!(f32, f64, Half, Bfloat, Tfloat);

impl<T: UlpFloat, const N: usize> Lanes for [T; N] {
    type Scalar = T;

    fn lane_count(&self) -> usize {
        N
    }

    fn lane(&self, index: usize) -> T {
        self[index]
    }

    fn is_vector(&self) -> bool {
        true
    }
}

/// Runtime-width vectors, as read from case files
impl<T: UlpFloat> Lanes for Vec<T> {
    type Scalar = T;

    fn lane_count(&self) -> usize {
        self.len()
    }

    fn lane(&self, index: usize) -> T {
        self[index]
    }

    fn is_vector(&self) -> bool {
        self.len() != 1
    }
}

/// `{a, b, c}` for vectors, the bare value for scalars
pub(crate) fn render<V: Lanes>(value: &V) -> String {
    if !value.is_vector() {
        return value.lane(0).to_string();
    }
    let lanes: Vec<String> = (0..value.lane_count())
        .map(|i| value.lane(i).to_string())
        .collect();
    format!("{{{}}}", lanes.join(", "))
}
