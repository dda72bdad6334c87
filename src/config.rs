//! `ulpcheck.toml` configuration
//!
//! ```toml
//! [runtime]
//! backend = "host"
//! device = 0
//!
//! [tolerance]
//! default_ulp = 0.0
//! default_error = 0.0
//!
//! [report]
//! json = false
//! ```
//!
//! Every section and key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compare::{PrecisionRequirement, UlpFloat};
use crate::error::{CheckError, Result};
use crate::runtime::RuntimeConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub tolerance: ToleranceConfig,
    pub report: ReportConfig,
}

/// Fallback requirement for cases that name none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToleranceConfig {
    /// ULP bound used when a case has neither a requirement nor a reference function
    pub default_ulp: f64,
    /// When positive, an absolute error bound takes precedence over `default_ulp`
    pub default_error: f64,
}

impl ToleranceConfig {
    pub fn default_requirement<F: UlpFloat>(&self) -> PrecisionRequirement<F> {
        if self.default_error > 0.0 {
            PrecisionRequirement::error_value(F::from_f64(self.default_error))
        } else {
            PrecisionRequirement::ulp_value(F::from_f64(self.default_ulp))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Print machine-readable reports
    pub json: bool,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source).map_err(|e| CheckError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load `path` if given, otherwise `ulpcheck.toml` in the working directory if
    /// present, otherwise the defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let local = Path::new("ulpcheck.toml");
        if local.exists() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        let tolerance = &self.tolerance;
        for (key, value) in [
            ("tolerance.default_ulp", tolerance.default_ulp),
            ("tolerance.default_error", tolerance.default_error),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(CheckError::Config {
                    message: format!("`{}` must be a non-negative number, found {}", key, value),
                });
            }
        }
        if tolerance.default_error > 0.0 && tolerance.default_ulp > 0.0 {
            warn!("both default_error and default_ulp set, default_error takes precedence");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Backend;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml_str(
            r#"
            [runtime]
            backend = "host"
            device = 1

            [tolerance]
            default_ulp = 2.0

            [report]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.runtime.backend, Backend::Host);
        assert_eq!(config.runtime.device, 1);
        assert_eq!(config.tolerance.default_ulp, 2.0);
        assert_eq!(config.tolerance.default_error, 0.0);
        assert!(config.report.json);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml_str("[tolerance]\ndefault_ulp = -1.0").is_err());
        assert!(Config::from_toml_str("[tolerance]\nmystery = 1").is_err());
        assert!(Config::from_toml_str("[runtime]\nbackend = \"cuda\"").is_err());
    }
}
