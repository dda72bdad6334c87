//! Per-lane precision requirements

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ulp::{UlpFloat, try_ulp_distance};
use crate::error::{CheckError, Result};

/// How close a candidate must be to its reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrecisionRequirement<F> {
    /// Absolute error bound
    ErrorValue(F),
    /// Distance bound in units of least precision
    UlpValue(F),
    /// Inclusive range the candidate must fall into, regardless of the reference
    ValueRange { min: F, max: F },
    /// Every value passes
    Any,
    /// Behaviour is not defined, every value passes
    Undefined,
}

/// Discriminant of [`PrecisionRequirement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    ErrorValue,
    UlpValue,
    ValueRange,
    Any,
    Undefined,
}

impl RequirementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequirementKind::ErrorValue => "error_value",
            RequirementKind::UlpValue => "ulp_value",
            RequirementKind::ValueRange => "value_range",
            RequirementKind::Any => "any",
            RequirementKind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequirementKind {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "error_value" => Ok(RequirementKind::ErrorValue),
            "ulp_value" => Ok(RequirementKind::UlpValue),
            "value_range" => Ok(RequirementKind::ValueRange),
            "any" => Ok(RequirementKind::Any),
            "undefined" => Ok(RequirementKind::Undefined),
            other => Err(CheckError::UnknownRequirement {
                kind: other.to_string(),
            }),
        }
    }
}

impl<F: UlpFloat> PrecisionRequirement<F> {
    pub fn error_value(bound: F) -> Self {
        PrecisionRequirement::ErrorValue(bound)
    }

    pub fn ulp_value(bound: F) -> Self {
        PrecisionRequirement::UlpValue(bound)
    }

    pub fn value_range(min: F, max: F) -> Self {
        PrecisionRequirement::ValueRange { min, max }
    }

    /// Build from a kind and up to two values, as stored in case files
    pub fn from_parts(kind: RequirementKind, value: Option<F>, value2: Option<F>) -> Result<Self> {
        let need = |value: Option<F>, field: &'static str| {
            value.ok_or_else(|| CheckError::MissingBound {
                kind: kind.to_string(),
                field,
            })
        };
        Ok(match kind {
            RequirementKind::ErrorValue => PrecisionRequirement::ErrorValue(need(value, "value")?),
            RequirementKind::UlpValue => PrecisionRequirement::UlpValue(need(value, "value")?),
            RequirementKind::ValueRange => PrecisionRequirement::ValueRange {
                min: need(value, "value")?,
                max: need(value2, "value2")?,
            },
            RequirementKind::Any => PrecisionRequirement::Any,
            RequirementKind::Undefined => PrecisionRequirement::Undefined,
        })
    }

    pub fn kind(&self) -> RequirementKind {
        match self {
            PrecisionRequirement::ErrorValue(_) => RequirementKind::ErrorValue,
            PrecisionRequirement::UlpValue(_) => RequirementKind::UlpValue,
            PrecisionRequirement::ValueRange { .. } => RequirementKind::ValueRange,
            PrecisionRequirement::Any => RequirementKind::Any,
            PrecisionRequirement::Undefined => RequirementKind::Undefined,
        }
    }

    /// Whether `candidate` satisfies the requirement against `reference`
    pub fn check(&self, candidate: F, reference: F) -> bool {
        match *self {
            PrecisionRequirement::ErrorValue(bound) => {
                if reference.is_nan() {
                    return candidate.is_nan();
                }
                let (c, r) = (candidate.to_f64(), reference.to_f64());
                c == r || (c - r).abs() <= bound.to_f64()
            }
            PrecisionRequirement::UlpValue(bound) => {
                if reference.is_nan() {
                    return candidate.is_nan();
                }
                match try_ulp_distance(candidate, reference) {
                    Some(distance) => distance as f64 <= bound.to_f64(),
                    None => false,
                }
            }
            PrecisionRequirement::ValueRange { min, max } => min <= candidate && candidate <= max,
            PrecisionRequirement::Any | PrecisionRequirement::Undefined => true,
        }
    }
}

impl<F: fmt::Display> fmt::Display for PrecisionRequirement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionRequirement::ErrorValue(bound) => write!(f, "error_value({})", bound),
            PrecisionRequirement::UlpValue(bound) => write!(f, "ulp_value({})", bound),
            PrecisionRequirement::ValueRange { min, max } => {
                write!(f, "value_range({}, {})", min, max)
            }
            PrecisionRequirement::Any => write!(f, "any"),
            PrecisionRequirement::Undefined => write!(f, "undefined"),
        }
    }
}
