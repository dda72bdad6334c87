//! Error reporting
//!
//! Caller mistakes (bad requirement kinds, mismatched buffer lengths, unknown
//! reference functions) surface as [`CheckError`] diagnostics rendered by miette.

use miette::Diagnostic;
use thiserror::Error;

use crate::runtime::RuntimeError;

/// Crate-wide result alias
pub type Result<T, E = CheckError> = std::result::Result<T, E>;

#[derive(Error, Debug, Diagnostic)]
pub enum CheckError {
    // === Requirement Errors ===
    #[error("Unknown precision requirement `{kind}`")]
    #[diagnostic(
        code(check::unknown_requirement),
        help("expected one of: error_value, ulp_value, value_range, any, undefined")
    )]
    UnknownRequirement { kind: String },

    #[error("Requirement `{kind}` needs a `{field}` value")]
    #[diagnostic(code(check::missing_bound))]
    MissingBound { kind: String, field: &'static str },

    #[error("Expected 1 or {lanes} requirements, found {found}")]
    #[diagnostic(
        code(check::requirement_count),
        help("pass a single requirement to apply it to every lane")
    )]
    RequirementCount { lanes: usize, found: usize },

    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    #[diagnostic(code(check::length_mismatch))]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    // === Reference Errors ===
    #[error("Unknown math function `{name}`")]
    #[diagnostic(code(check::unknown_function))]
    UnknownFunction { name: String },

    #[error("Unknown float type `{name}`")]
    #[diagnostic(
        code(check::unknown_float_type),
        help("expected one of: half, bfloat, tfloat, float, double")
    )]
    UnknownFloatType { name: String },

    #[error("No reference for `{function}` in {ty}")]
    #[diagnostic(code(check::unknown_type))]
    UnknownType { function: String, ty: String },

    #[error("`{function}` takes {expected} argument(s), found {found}")]
    #[diagnostic(code(check::arity))]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    // === Input Errors ===
    #[error("Invalid value `{value}`: {reason}")]
    #[diagnostic(code(check::invalid_value))]
    InvalidValue { value: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(check::config))]
    Config { message: String },

    #[error("Failed to read `{path}`")]
    #[diagnostic(code(check::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // === Runtime Errors ===
    #[error(transparent)]
    #[diagnostic(code(check::runtime))]
    Runtime(#[from] RuntimeError),
}

impl CheckError {
    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckError::InvalidValue {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CheckError::RequirementCount { lanes: 4, found: 2 };
        assert_eq!(err.to_string(), "Expected 1 or 4 requirements, found 2");

        let err = CheckError::Arity {
            function: "atan2".to_string(),
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "`atan2` takes 2 argument(s), found 1");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = CheckError::UnknownRequirement {
            kind: "close_enough".to_string(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("check::unknown_requirement"));
        assert!(err.help().is_some());
    }

    #[test]
    fn test_runtime_error_converts() {
        let err: CheckError = RuntimeError::UnknownBuffer(7).into();
        assert!(matches!(err, CheckError::Runtime(_)));
        assert_eq!(err.to_string(), "Unknown buffer handle 7");
    }
}
