//! Typed views of raw device bytes
//!
//! Elements are little-endian at their storage width; the narrow float formats go
//! through their storage word (2 bytes for `Half` / `Bfloat`, 4 for `Tfloat`).

use std::mem::size_of;

use super::RuntimeError;
use crate::fp::{Bfloat, Half, Tfloat};

/// A value that can live in a device buffer
pub trait BufferElement: Copy {
    /// Bytes per element
    const SIZE: usize;

    fn write_le(self, out: &mut Vec<u8>);

    /// `bytes.len() == Self::SIZE`
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! primitive_element {
    ($($ty:ty),*) => {
        $(
            impl BufferElement for $ty {
                const SIZE: usize = size_of::<$ty>();

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

primitive_element!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

macro_rules! narrow_element {
    ($($ty:ty => $storage:ty),*) => {
        $(
            impl BufferElement for $ty {
                const SIZE: usize = size_of::<$storage>();

                fn write_le(self, out: &mut Vec<u8>) {
                    self.to_bits().write_le(out);
                }

                fn read_le(bytes: &[u8]) -> Self {
                    <$ty>::from_bits(<$storage>::read_le(bytes))
                }
            }
        )*
    };
}

narrow_element!(Half => u16, Bfloat => u16, Tfloat => u32);

/// Byte length of `count` elements of `T`
pub fn byte_len<T: BufferElement>(count: usize) -> Result<usize, RuntimeError> {
    count.checked_mul(T::SIZE).ok_or(RuntimeError::SizeOverflow {
        count,
        element: T::SIZE,
    })
}

pub fn to_bytes<T: BufferElement>(values: &[T]) -> Result<Vec<u8>, RuntimeError> {
    let mut out = Vec::with_capacity(byte_len::<T>(values.len())?);
    for value in values {
        value.write_le(&mut out);
    }
    Ok(out)
}

pub fn from_bytes<T: BufferElement>(bytes: &[u8]) -> Result<Vec<T>, RuntimeError> {
    if bytes.len() % T::SIZE != 0 {
        return Err(RuntimeError::Misaligned {
            size: bytes.len(),
            element: T::SIZE,
        });
    }
    Ok(bytes.chunks_exact(T::SIZE).map(T::read_le).collect())
}
