//! Candidate-against-reference comparison under per-lane requirements

use std::fmt;

use tracing::debug;

use super::lanes::{Lanes, render};
use super::requirement::PrecisionRequirement;
use super::ulp::try_ulp_distance;
use crate::error::{CheckError, Result};

/// Checks a scalar or vector candidate against a reference
///
/// Holds either one requirement, applied to every lane, or exactly one requirement
/// per lane. The stored candidate is only used by [`describe`](Self::describe).
#[derive(Debug, Clone)]
pub struct PrecisionComparator<V: Lanes> {
    candidate: V,
    reference: V,
    requirements: Vec<PrecisionRequirement<V::Scalar>>,
    inputs: Vec<String>,
}

impl<V: Lanes> PrecisionComparator<V> {
    /// One requirement for every lane
    pub fn new(candidate: V, reference: V, requirement: PrecisionRequirement<V::Scalar>) -> Self {
        Self {
            candidate,
            reference,
            requirements: vec![requirement],
            inputs: Vec::new(),
        }
    }

    /// One requirement per lane, or a single one applied to all lanes
    pub fn with_requirements(
        candidate: V,
        reference: V,
        requirements: Vec<PrecisionRequirement<V::Scalar>>,
    ) -> Result<Self> {
        let lanes = reference.lane_count();
        if requirements.len() != 1 && requirements.len() != lanes {
            return Err(CheckError::RequirementCount {
                lanes,
                found: requirements.len(),
            });
        }
        Ok(Self {
            candidate,
            reference,
            requirements,
            inputs: Vec::new(),
        })
    }

    /// Kernel inputs listed by [`describe`](Self::describe)
    pub fn with_inputs<I: fmt::Display>(mut self, inputs: impl IntoIterator<Item = I>) -> Self {
        self.inputs = inputs.into_iter().map(|input| input.to_string()).collect();
        self
    }

    pub fn candidate(&self) -> &V {
        &self.candidate
    }

    pub fn reference(&self) -> &V {
        &self.reference
    }

    pub fn requirements(&self) -> &[PrecisionRequirement<V::Scalar>] {
        &self.requirements
    }

    fn requirement(&self, lane: usize) -> &PrecisionRequirement<V::Scalar> {
        if self.requirements.len() == 1 {
            &self.requirements[0]
        } else {
            &self.requirements[lane]
        }
    }

    /// True when every lane of `candidate` meets its requirement
    pub fn matches(&self, candidate: &V) -> bool {
        let lanes = self.reference.lane_count();
        if candidate.lane_count() != lanes {
            debug!(
                expected = lanes,
                found = candidate.lane_count(),
                "candidate lane count differs from reference"
            );
            return false;
        }

        (0..lanes).all(|lane| {
            let requirement = self.requirement(lane);
            let (value, reference) = (candidate.lane(lane), self.reference.lane(lane));
            let ok = requirement.check(value, reference);
            if !ok {
                debug!(
                    lane,
                    candidate = %value,
                    reference = %reference,
                    requirement = %requirement,
                    "lane outside precision requirement"
                );
            }
            ok
        })
    }

    /// Human-readable account of the stored candidate against the reference
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<V: Lanes> fmt::Display for PrecisionComparator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vector = self.reference.is_vector();

        for lane in 0..self.reference.lane_count() {
            let reference = self.reference.lane(lane);
            if vector {
                writeln!(f, "Reference[{}]: {}", lane, reference)?;
            } else {
                writeln!(f, "Reference: {}", reference)?;
            }

            match self.requirement(lane) {
                PrecisionRequirement::ErrorValue(bound) => {
                    writeln!(f, " Absolute error within {}", bound)?;
                }
                PrecisionRequirement::UlpValue(bound) => {
                    let distance = (lane < self.candidate.lane_count())
                        .then(|| self.candidate.lane(lane))
                        .and_then(|candidate| try_ulp_distance(candidate, reference));
                    match distance {
                        Some(distance) => writeln!(f, " ULP error {} within {}", distance, bound)?,
                        None => writeln!(f, " ULP error n/a within {}", bound)?,
                    }
                }
                PrecisionRequirement::ValueRange { min, max } => {
                    writeln!(f, " In range {{{}, {}}}", min, max)?;
                }
                PrecisionRequirement::Any => writeln!(f, " Any value pass")?,
                PrecisionRequirement::Undefined => writeln!(f, " Requirement undefined")?,
            }
        }

        writeln!(f, "Result: {}", render(&self.candidate))?;
        if self.inputs.is_empty() {
            write!(f, "Inputs: None")
        } else {
            write!(f, "Inputs: {}", self.inputs.join(", "))
        }
    }
}
