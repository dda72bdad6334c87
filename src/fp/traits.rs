//! Type capability registration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Bfloat, Half, Tfloat};
use crate::error::CheckError;

/// Every float type a check can run in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatType {
    Half,
    Bfloat,
    Tfloat,
    Float,
    Double,
}

impl FloatType {
    pub const ALL: [FloatType; 5] = [
        FloatType::Half,
        FloatType::Bfloat,
        FloatType::Tfloat,
        FloatType::Float,
        FloatType::Double,
    ];

    /// Software-emulated rather than native on the host
    pub fn is_custom(self) -> bool {
        matches!(self, FloatType::Half | FloatType::Bfloat | FloatType::Tfloat)
    }

    /// Bytes of one element in a device buffer
    pub fn storage_bytes(self) -> usize {
        match self {
            FloatType::Half | FloatType::Bfloat => 2,
            FloatType::Tfloat | FloatType::Float => 4,
            FloatType::Double => 8,
        }
    }

    /// OpenCL C spelling
    pub fn clc_name(self) -> &'static str {
        match self {
            FloatType::Half => "half",
            FloatType::Bfloat => "ushort",
            FloatType::Tfloat => "float",
            FloatType::Float => "float",
            FloatType::Double => "double",
        }
    }

    /// C for Media spelling
    pub fn cm_name(self) -> &'static str {
        match self {
            FloatType::Half => "half",
            FloatType::Bfloat => "bfloat16",
            FloatType::Tfloat => "tfloat",
            FloatType::Float => "float",
            FloatType::Double => "double",
        }
    }
}

impl fmt::Display for FloatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatType::Half => write!(f, "half"),
            FloatType::Bfloat => write!(f, "bfloat"),
            FloatType::Tfloat => write!(f, "tfloat"),
            FloatType::Float => write!(f, "float"),
            FloatType::Double => write!(f, "double"),
        }
    }
}

impl FromStr for FloatType {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "half" | "f16" => Ok(FloatType::Half),
            "bfloat" | "bfloat16" | "bf16" => Ok(FloatType::Bfloat),
            "tfloat" | "tf32" => Ok(FloatType::Tfloat),
            "float" | "f32" => Ok(FloatType::Float),
            "double" | "f64" => Ok(FloatType::Double),
            _ => Err(CheckError::UnknownFloatType { name: s.to_string() }),
        }
    }
}

/// Compile-time capability tags of a float type
pub trait FloatKind {
    const FLOAT_TYPE: FloatType;
    /// Emulated in software
    const IS_CUSTOM: bool;
    const NAME: &'static str;
}

macro_rules! float_kind {
    ($($ty:ty => $variant:ident, $custom:literal, $name:literal;)*) => {
        $(
            impl FloatKind for $ty {
                const FLOAT_TYPE: FloatType = FloatType::$variant;
                const IS_CUSTOM: bool = $custom;
                const NAME: &'static str = $name;
            }
        )*
    };
}

float_kind! {
    Half => Half, true, "half";
    Bfloat => Bfloat, true, "bfloat";
    Tfloat => Tfloat, true, "tfloat";
    f32 => Float, false, "float";
    f64 => Double, false, "double";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("bf16".parse::<FloatType>().unwrap(), FloatType::Bfloat);
        assert_eq!("F32".parse::<FloatType>().unwrap(), FloatType::Float);
        assert_eq!("tf32".parse::<FloatType>().unwrap(), FloatType::Tfloat);
        assert!("quad".parse::<FloatType>().is_err());
    }

    #[test]
    fn test_kind_tags() {
        assert!(<Half as FloatKind>::IS_CUSTOM);
        assert!(!<f64 as FloatKind>::IS_CUSTOM);
        assert_eq!(<Bfloat as FloatKind>::FLOAT_TYPE.cm_name(), "bfloat16");
        assert_eq!(FloatType::Tfloat.storage_bytes(), 4);
        for ty in FloatType::ALL {
            assert_eq!(ty.to_string().parse::<FloatType>().unwrap(), ty);
            assert_eq!(ty.is_custom(), ty.storage_bytes() < 8 && ty != FloatType::Float);
        }
    }
}
