//! Host reference values and ULP bounds for device math builtins
//!
//! Bounds follow the OpenCL C single/double precision tables; the functions checked
//! only in C for Media (`sqrt`, `rsqrt`, `inv`, `exp`, `log`, `sin`, `cos`) have
//! single precision bounds only.

use std::f32::consts::PI as PI_F32;
use std::f64::consts::PI as PI_F64;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compare::{PrecisionRequirement, UlpFloat};
use crate::error::{CheckError, Result};
use crate::fp::{FloatKind, FloatType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathFunction {
    Acos,
    Acosh,
    Acospi,
    Asin,
    Asinh,
    Asinpi,
    Atan,
    Atan2,
    Atan2pi,
    Atanh,
    Atanpi,
    Cbrt,
    Ceil,
    Copysign,
    Cos,
    Exp,
    Inv,
    Log,
    Rsqrt,
    Sin,
    Sqrt,
}

impl MathFunction {
    pub const ALL: [MathFunction; 21] = [
        MathFunction::Acos,
        MathFunction::Acosh,
        MathFunction::Acospi,
        MathFunction::Asin,
        MathFunction::Asinh,
        MathFunction::Asinpi,
        MathFunction::Atan,
        MathFunction::Atan2,
        MathFunction::Atan2pi,
        MathFunction::Atanh,
        MathFunction::Atanpi,
        MathFunction::Cbrt,
        MathFunction::Ceil,
        MathFunction::Copysign,
        MathFunction::Cos,
        MathFunction::Exp,
        MathFunction::Inv,
        MathFunction::Log,
        MathFunction::Rsqrt,
        MathFunction::Sin,
        MathFunction::Sqrt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MathFunction::Acos => "acos",
            MathFunction::Acosh => "acosh",
            MathFunction::Acospi => "acospi",
            MathFunction::Asin => "asin",
            MathFunction::Asinh => "asinh",
            MathFunction::Asinpi => "asinpi",
            MathFunction::Atan => "atan",
            MathFunction::Atan2 => "atan2",
            MathFunction::Atan2pi => "atan2pi",
            MathFunction::Atanh => "atanh",
            MathFunction::Atanpi => "atanpi",
            MathFunction::Cbrt => "cbrt",
            MathFunction::Ceil => "ceil",
            MathFunction::Copysign => "copysign",
            MathFunction::Cos => "cos",
            MathFunction::Exp => "exp",
            MathFunction::Inv => "inv",
            MathFunction::Log => "log",
            MathFunction::Rsqrt => "rsqrt",
            MathFunction::Sin => "sin",
            MathFunction::Sqrt => "sqrt",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            MathFunction::Atan2 | MathFunction::Atan2pi | MathFunction::Copysign => 2,
            _ => 1,
        }
    }

    /// Only checked against single precision
    fn single_precision_only(self) -> bool {
        matches!(
            self,
            MathFunction::Cos
                | MathFunction::Exp
                | MathFunction::Inv
                | MathFunction::Log
                | MathFunction::Rsqrt
                | MathFunction::Sin
                | MathFunction::Sqrt
        )
    }

    /// Maximum ULP error accepted from a device in `ty`
    pub fn ulp_bound(self, ty: FloatType) -> Result<f64> {
        let supported = match ty {
            FloatType::Float => true,
            FloatType::Double => !self.single_precision_only(),
            FloatType::Half | FloatType::Bfloat | FloatType::Tfloat => false,
        };
        if !supported {
            return Err(CheckError::UnknownType {
                function: self.name().to_string(),
                ty: ty.to_string(),
            });
        }

        Ok(match self {
            MathFunction::Acos | MathFunction::Acosh | MathFunction::Asin | MathFunction::Asinh => {
                4.0
            }
            MathFunction::Acospi
            | MathFunction::Asinpi
            | MathFunction::Atan
            | MathFunction::Atanh
            | MathFunction::Atanpi => 5.0,
            MathFunction::Atan2 | MathFunction::Atan2pi => 6.0,
            MathFunction::Cbrt => 2.0,
            MathFunction::Ceil | MathFunction::Copysign => 0.0,
            MathFunction::Sqrt | MathFunction::Log => 3.0,
            MathFunction::Rsqrt => 2.0,
            MathFunction::Inv => 1.0,
            MathFunction::Exp | MathFunction::Sin | MathFunction::Cos => 4.0,
        })
    }

    /// `UlpValue` requirement for results in `F`
    pub fn requirement<F: UlpFloat + FloatKind>(self) -> Result<PrecisionRequirement<F>> {
        let bound = self.ulp_bound(F::FLOAT_TYPE)?;
        Ok(PrecisionRequirement::UlpValue(F::from_f64(bound)))
    }

    fn check_arity(self, found: usize) -> Result<()> {
        if found != self.arity() {
            return Err(CheckError::Arity {
                function: self.name().to_string(),
                expected: self.arity(),
                found,
            });
        }
        Ok(())
    }

    /// Reference value computed in double precision
    pub fn reference_f64(self, args: &[f64]) -> Result<f64> {
        self.check_arity(args.len())?;
        let x = args[0];
        Ok(match self {
            MathFunction::Acos => x.acos(),
            MathFunction::Acosh => x.acosh(),
            MathFunction::Acospi => x.acos() / PI_F64,
            MathFunction::Asin => x.asin(),
            MathFunction::Asinh => x.asinh(),
            MathFunction::Asinpi => x.asin() / PI_F64,
            MathFunction::Atan => x.atan(),
            MathFunction::Atan2 => x.atan2(args[1]),
            MathFunction::Atan2pi => x.atan2(args[1]) / PI_F64,
            MathFunction::Atanh => x.atanh(),
            MathFunction::Atanpi => x.atan() / PI_F64,
            MathFunction::Cbrt => x.cbrt(),
            MathFunction::Ceil => x.ceil(),
            MathFunction::Copysign => x.copysign(args[1]),
            MathFunction::Cos => x.cos(),
            MathFunction::Exp => x.exp(),
            MathFunction::Inv => x.recip(),
            MathFunction::Log => x.ln(),
            MathFunction::Rsqrt => x.sqrt().recip(),
            MathFunction::Sin => x.sin(),
            MathFunction::Sqrt => x.sqrt(),
        })
    }

    /// Reference value computed in single precision
    pub fn reference_f32(self, args: &[f32]) -> Result<f32> {
        self.check_arity(args.len())?;
        let x = args[0];
        Ok(match self {
            MathFunction::Acos => x.acos(),
            MathFunction::Acosh => x.acosh(),
            MathFunction::Acospi => x.acos() / PI_F32,
            MathFunction::Asin => x.asin(),
            MathFunction::Asinh => x.asinh(),
            MathFunction::Asinpi => x.asin() / PI_F32,
            MathFunction::Atan => x.atan(),
            MathFunction::Atan2 => x.atan2(args[1]),
            MathFunction::Atan2pi => x.atan2(args[1]) / PI_F32,
            MathFunction::Atanh => x.atanh(),
            MathFunction::Atanpi => x.atan() / PI_F32,
            MathFunction::Cbrt => x.cbrt(),
            MathFunction::Ceil => x.ceil(),
            MathFunction::Copysign => x.copysign(args[1]),
            MathFunction::Cos => x.cos(),
            MathFunction::Exp => x.exp(),
            MathFunction::Inv => x.recip(),
            MathFunction::Log => x.ln(),
            MathFunction::Rsqrt => x.sqrt().recip(),
            MathFunction::Sin => x.sin(),
            MathFunction::Sqrt => x.sqrt(),
        })
    }

    /// Reference value in the working precision `F`
    ///
    /// Double precision results are computed in `f64`, everything else in `f32`.
    pub fn reference<F: UlpFloat + FloatKind>(self, args: &[F]) -> Result<F> {
        self.ulp_bound(F::FLOAT_TYPE)?;
        let wide: Vec<f64> = args.iter().map(|arg| arg.to_f64()).collect();
        let value = if F::FLOAT_TYPE == FloatType::Double {
            self.reference_f64(&wide)?
        } else {
            let narrow: Vec<f32> = wide.iter().map(|&arg| arg as f32).collect();
            f64::from(self.reference_f32(&narrow)?)
        };
        Ok(F::from_f64(value))
    }
}

impl fmt::Display for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MathFunction {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        MathFunction::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| CheckError::UnknownFunction { name: s.to_string() })
    }
}
