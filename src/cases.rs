//! Batch precision checks read from TOML case files
//!
//! ```toml
//! precision = "half"
//!
//! [[case]]
//! name = "sqrt(2)"
//! precision = "float"
//! candidate = [1.4142135]
//! function = "sqrt"
//! args = [[2.0]]
//!
//! [[case]]
//! name = "clamped"
//! candidate = [0.5, 1.0]
//! reference = [0.0, 0.0]
//! requirement = { kind = "value_range", value = 0.0, value2 = 1.0 }
//! ```
//!
//! A case without an explicit requirement uses the ULP bound of its reference
//! function, or the configured default tolerance.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compare::{PrecisionComparator, PrecisionRequirement, RequirementKind, UlpFloat};
use crate::config::ToleranceConfig;
use crate::error::{CheckError, Result};
use crate::fp::{Bfloat, FloatKind, FloatType, Half, Tfloat};
use crate::reference::MathFunction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    /// Working precision of every case that does not override it
    #[serde(default = "default_precision")]
    pub precision: FloatType,

    #[serde(rename = "case", default)]
    pub cases: Vec<CaseSpec>,
}

fn default_precision() -> FloatType {
    FloatType::Float
}

/// One candidate vector and how to judge it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseSpec {
    pub name: String,
    pub precision: Option<FloatType>,
    pub candidate: Vec<f64>,
    pub reference: Option<Vec<f64>>,
    /// Computes the reference from `args` when `reference` is absent
    pub function: Option<String>,
    /// Argument list per lane
    pub args: Vec<Vec<f64>>,
    pub requirement: Option<RequirementSpec>,
    pub requirements: Vec<RequirementSpec>,
}

/// Untyped requirement as written in a case file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementSpec {
    pub kind: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub value2: Option<f64>,
}

impl RequirementSpec {
    pub fn resolve<F: UlpFloat>(&self) -> Result<PrecisionRequirement<F>> {
        let kind: RequirementKind = self.kind.parse()?;
        PrecisionRequirement::from_parts(
            kind,
            self.value.map(F::from_f64),
            self.value2.map(F::from_f64),
        )
    }
}

/// Result of one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub precision: FloatType,
    pub passed: bool,
    /// Comparator description, kept for failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Summary of a whole case file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseOutcome>,
}

impl Report {
    pub fn new(cases: Vec<CaseOutcome>) -> Self {
        let passed = cases.iter().filter(|case| case.passed).count();
        Self {
            total: cases.len(),
            passed,
            failed: cases.len() - passed,
            cases,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl CaseFile {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| CheckError::Config {
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Run every case; the first malformed case aborts the batch
    pub fn evaluate(&self, tolerance: &ToleranceConfig) -> Result<Report> {
        let outcomes = self
            .cases
            .iter()
            .map(|case| evaluate_case(case, case.precision.unwrap_or(self.precision), tolerance))
            .collect::<Result<Vec<_>>>()?;
        let report = Report::new(outcomes);
        info!(total = report.total, failed = report.failed, "evaluated case file");
        Ok(report)
    }
}

fn evaluate_case(case: &CaseSpec, precision: FloatType, tolerance: &ToleranceConfig) -> Result<CaseOutcome> {
    let (passed, description) = match precision {
        FloatType::Half => evaluate_in::<Half>(case, tolerance)?,
        FloatType::Bfloat => evaluate_in::<Bfloat>(case, tolerance)?,
        FloatType::Tfloat => evaluate_in::<Tfloat>(case, tolerance)?,
        FloatType::Float => evaluate_in::<f32>(case, tolerance)?,
        FloatType::Double => evaluate_in::<f64>(case, tolerance)?,
    };
    debug!(case = %case.name, %precision, passed, "evaluated case");
    Ok(CaseOutcome {
        name: case.name.clone(),
        precision,
        passed,
        description: (!passed).then_some(description),
    })
}

fn evaluate_in<F: UlpFloat + FloatKind>(case: &CaseSpec, tolerance: &ToleranceConfig) -> Result<(bool, String)> {
    let candidate: Vec<F> = case.candidate.iter().map(|&v| F::from_f64(v)).collect();
    let function = case
        .function
        .as_deref()
        .map(str::parse::<MathFunction>)
        .transpose()?;

    let reference: Vec<F> = match (&case.reference, function) {
        (Some(reference), _) => reference.iter().map(|&v| F::from_f64(v)).collect(),
        (None, Some(function)) => {
            if case.args.len() != candidate.len() {
                return Err(CheckError::LengthMismatch {
                    what: "case args",
                    expected: candidate.len(),
                    found: case.args.len(),
                });
            }
            case.args
                .iter()
                .map(|args| {
                    let args: Vec<F> = args.iter().map(|&v| F::from_f64(v)).collect();
                    function.reference(&args)
                })
                .collect::<Result<_>>()?
        }
        (None, None) => {
            return Err(CheckError::invalid_value(
                case.name.as_str(),
                "a case needs either `reference` or `function`",
            ));
        }
    };
    if reference.len() != candidate.len() {
        return Err(CheckError::LengthMismatch {
            what: "case reference",
            expected: candidate.len(),
            found: reference.len(),
        });
    }

    let requirements = if let Some(written) = &case.requirement {
        vec![written.resolve::<F>()?]
    } else if !case.requirements.is_empty() {
        case.requirements
            .iter()
            .map(RequirementSpec::resolve::<F>)
            .collect::<Result<_>>()?
    } else if let Some(function) = function {
        vec![function.requirement::<F>()?]
    } else {
        vec![tolerance.default_requirement::<F>()]
    };

    let comparator = PrecisionComparator::with_requirements(candidate.clone(), reference, requirements)?
        .with_inputs(case.args.iter().flatten());
    Ok((comparator.matches(&candidate), comparator.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &str = r#"
        precision = "half"

        [[case]]
        name = "exact"
        candidate = [1.0, 2.0]
        reference = [1.0, 2.0]

        [[case]]
        name = "sqrt"
        precision = "float"
        candidate = [1.4142135]
        function = "sqrt"
        args = [[2.0]]

        [[case]]
        name = "out of range"
        candidate = [1.5]
        reference = [0.0]
        requirement = { kind = "value_range", value = 0.0, value2 = 1.0 }
    "#;

    #[test]
    fn test_parse_and_evaluate() {
        let file = CaseFile::from_toml_str(CASES).unwrap();
        assert_eq!(file.precision, FloatType::Half);
        assert_eq!(file.cases.len(), 3);

        let report = file.evaluate(&ToleranceConfig::default()).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert!(report.cases[0].passed);
        assert!(report.cases[1].passed);
        assert_eq!(report.cases[1].precision, FloatType::Float);

        let failure = &report.cases[2];
        assert!(!failure.passed);
        assert!(failure.description.as_deref().unwrap().contains("In range {0x0000, 0x3c00}"));
    }

    #[test]
    fn test_unknown_requirement_kind() {
        let file = CaseFile::from_toml_str(
            r#"
            [[case]]
            name = "bad"
            candidate = [1.0]
            reference = [1.0]
            requirement = { kind = "roughly" }
            "#,
        )
        .unwrap();
        let err = file.evaluate(&ToleranceConfig::default()).unwrap_err();
        assert!(matches!(err, CheckError::UnknownRequirement { .. }));
    }

    #[test]
    fn test_missing_reference() {
        let file = CaseFile::from_toml_str("[[case]]\nname = \"x\"\ncandidate = [1.0]").unwrap();
        assert!(matches!(
            file.evaluate(&ToleranceConfig::default()),
            Err(CheckError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_default_tolerance() {
        let file = CaseFile::from_toml_str(
            "[[case]]\nname = \"close\"\ncandidate = [1.05]\nreference = [1.0]",
        )
        .unwrap();
        let tolerance = ToleranceConfig {
            default_ulp: 0.0,
            default_error: 0.1,
        };
        assert!(file.evaluate(&tolerance).unwrap().all_passed());
        assert!(!file.evaluate(&ToleranceConfig::default()).unwrap().all_passed());
    }
}
