//! Whole-buffer ULP comparison

use std::fmt;

use tracing::debug;

use super::lanes::{Lanes, render};
use super::requirement::PrecisionRequirement;
use super::ulp::{UlpFloat, try_ulp_distance};
use crate::error::{CheckError, Result};

/// First lane of a buffer that failed its ULP bound
///
/// `candidate` or `reference` is `None` when the element widths differ and the
/// lane only exists on the other side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch<F> {
    pub index: usize,
    pub lane: usize,
    pub candidate: Option<F>,
    pub reference: Option<F>,
    /// `None` when either side is NaN or missing
    pub distance: Option<u64>,
    pub bound: F,
}

impl<F: UlpFloat> fmt::Display for Mismatch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {} lane {}: ", self.index, self.lane)?;
        match (self.candidate, self.reference) {
            (Some(candidate), Some(reference)) => {
                write!(f, "{} vs reference {}, ", candidate, reference)?;
                match self.distance {
                    Some(distance) => write!(f, "{} ULP (bound {})", distance, self.bound),
                    None => write!(f, "unordered (bound {})", self.bound),
                }
            }
            (None, Some(reference)) => write!(f, "missing, reference {}", reference),
            (Some(candidate), None) => write!(f, "{} has no reference lane", candidate),
            (None, None) => write!(f, "missing on both sides"),
        }
    }
}

/// Compares buffers element by element; `ulp_bounds[i]` covers every lane of element `i`
#[derive(Debug, Clone)]
pub struct UlpComparator<V: Lanes> {
    candidates: Vec<V>,
    references: Vec<V>,
    ulp_bounds: Vec<V::Scalar>,
}

impl<V: Lanes> UlpComparator<V> {
    pub fn new(candidates: Vec<V>, references: Vec<V>, ulp_bounds: Vec<V::Scalar>) -> Result<Self> {
        if ulp_bounds.len() != references.len() {
            return Err(CheckError::LengthMismatch {
                what: "ulp bounds",
                expected: references.len(),
                found: ulp_bounds.len(),
            });
        }
        Ok(Self {
            candidates,
            references,
            ulp_bounds,
        })
    }

    /// The same bound for every element
    pub fn uniform(candidates: Vec<V>, references: Vec<V>, bound: V::Scalar) -> Self {
        let ulp_bounds = vec![bound; references.len()];
        Self {
            candidates,
            references,
            ulp_bounds,
        }
    }

    pub fn references(&self) -> &[V] {
        &self.references
    }

    /// True when `candidates` has one element per reference and every lane is in bound
    pub fn matches(&self, candidates: &[V]) -> bool {
        if candidates.len() != self.references.len() {
            debug!(
                expected = self.references.len(),
                found = candidates.len(),
                "candidate buffer length differs from reference"
            );
            return false;
        }
        for (index, (candidate, reference)) in candidates.iter().zip(&self.references).enumerate() {
            if candidate.lane_count() != reference.lane_count() {
                debug!(
                    index,
                    expected = reference.lane_count(),
                    found = candidate.lane_count(),
                    "candidate lane count differs from reference"
                );
                return false;
            }
        }
        match self.first_mismatch(candidates) {
            Some(mismatch) => {
                debug!(%mismatch, "buffer outside ULP bound");
                false
            }
            None => true,
        }
    }

    /// The first failing lane among the elements both buffers share
    ///
    /// An element whose lane count differs from its reference fails at the first
    /// lane present on only one side.
    pub fn first_mismatch(&self, candidates: &[V]) -> Option<Mismatch<V::Scalar>> {
        let elements = candidates.iter().zip(&self.references).zip(&self.ulp_bounds);
        for (index, ((candidate, reference), &bound)) in elements.enumerate() {
            let requirement = PrecisionRequirement::UlpValue(bound);
            let (found, expected) = (candidate.lane_count(), reference.lane_count());
            for lane in 0..expected.min(found) {
                let (c, r) = (candidate.lane(lane), reference.lane(lane));
                if !requirement.check(c, r) {
                    return Some(Mismatch {
                        index,
                        lane,
                        candidate: Some(c),
                        reference: Some(r),
                        distance: try_ulp_distance(c, r),
                        bound,
                    });
                }
            }
            if found != expected {
                let lane = expected.min(found);
                return Some(Mismatch {
                    index,
                    lane,
                    candidate: (lane < found).then(|| candidate.lane(lane)),
                    reference: (lane < expected).then(|| reference.lane(lane)),
                    distance: None,
                    bound,
                });
            }
        }
        None
    }

    /// References and the ULP distance of every stored candidate lane
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<V: Lanes> fmt::Display for UlpComparator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let references: Vec<String> = self.references.iter().map(render).collect();
        writeln!(f, "Reference: {{{}}}", references.join(", "))?;

        let distances: Vec<String> = self
            .candidates
            .iter()
            .zip(&self.references)
            .map(|(candidate, reference)| {
                let lanes: Vec<String> = (0..candidate.lane_count().min(reference.lane_count()))
                    .map(|lane| match try_ulp_distance(candidate.lane(lane), reference.lane(lane)) {
                        Some(distance) => distance.to_string(),
                        None => "n/a".to_string(),
                    })
                    .collect();
                if reference.is_vector() {
                    format!("{{{}}}", lanes.join(", "))
                } else {
                    lanes.join(", ")
                }
            })
            .collect();
        write!(f, "ULP distance: {{{}}}", distances.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        let err = UlpComparator::new(vec![1.0f32], vec![1.0, 2.0], vec![0.0]).unwrap_err();
        assert!(matches!(
            err,
            CheckError::LengthMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_lane_count_differences_fail() {
        let references = vec![vec![1.0f32, 2.0], vec![3.0]];
        let cmp = UlpComparator::uniform(references.clone(), references.clone(), 0.0);
        assert!(cmp.matches(&references));

        let short = vec![vec![1.0f32], vec![3.0]];
        assert!(!cmp.matches(&short));
        let mismatch = cmp.first_mismatch(&short).unwrap();
        assert_eq!((mismatch.index, mismatch.lane), (0, 1));
        assert_eq!((mismatch.candidate, mismatch.reference), (None, Some(2.0)));
        assert_eq!(mismatch.to_string(), "element 0 lane 1: missing, reference 2");

        let long = vec![vec![1.0f32, 2.0], vec![3.0, 4.0]];
        assert!(!cmp.matches(&long));
        let mismatch = cmp.first_mismatch(&long).unwrap();
        assert_eq!((mismatch.index, mismatch.lane), (1, 1));
        assert_eq!(mismatch.to_string(), "element 1 lane 1: 4 has no reference lane");
    }

    #[test]
    fn test_matches_and_mismatch() {
        let references = vec![1.0f32, 2.0];
        let candidates = vec![1.0f32, f32::from_bits(2.0f32.to_bits() + 3)];
        let cmp = UlpComparator::new(candidates.clone(), references, vec![0.0, 2.0]).unwrap();
        assert!(!cmp.matches(&candidates));

        let mismatch = cmp.first_mismatch(&candidates).unwrap();
        assert_eq!(mismatch.index, 1);
        assert_eq!(mismatch.lane, 0);
        assert_eq!(mismatch.distance, Some(3));
        assert_eq!(mismatch.to_string(), "element 1 lane 0: 2.0000007 vs reference 2, 3 ULP (bound 2)");
    }

    #[test]
    fn test_wrong_candidate_length_fails() {
        let cmp = UlpComparator::uniform(vec![], vec![1.0f64, 2.0], 1.0);
        assert!(!cmp.matches(&[1.0]));
        assert!(cmp.matches(&[1.0, 2.0]));
    }

    #[test]
    fn test_describe_vectors() {
        let references = vec![[1.0f32, 2.0], [3.0, 4.0]];
        let candidates = vec![[1.0f32, 2.0], [3.0, f32::NAN]];
        let cmp = UlpComparator::uniform(candidates, references, 0.0);
        insta::assert_snapshot!(cmp.describe(), @r"
        Reference: {{1, 2}, {3, 4}}
        ULP distance: {{0, 0}, {0, n/a}}
        ");
    }
}
