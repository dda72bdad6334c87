//! ulpcheck: host-side numeric correctness for GPU compute conformance
//!
//! - Software reduced-precision floats (`Half`, `Bfloat`, `Tfloat`) with bit-exact
//!   rounding, limits tables and `f32`-backed arithmetic
//! - ULP distance over every working precision
//! - Comparators that judge device results against host references
//!
//! # Architecture
//!
//! ```text
//! inputs → Runtime (buffers + kernel) → results ─┐
//!                                                ├→ PrecisionComparator / UlpComparator → pass / describe()
//! inputs → narrow arithmetic / MathFunction ─────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ulpcheck::{Half, PrecisionComparator, PrecisionRequirement};
//!
//! let reference = Half::from_f32(1.0) / Half::from_f32(3.0);
//! let cmp = PrecisionComparator::new(reference, reference, PrecisionRequirement::ulp_value(Half::from_f32(1.0)));
//! assert!(cmp.matches(&Half::from_bits(reference.to_bits() + 1)));
//! ```

pub mod cases;
pub mod compare;
pub mod config;
pub mod error;
pub mod fp;
pub mod reference;
pub mod runtime;

pub use cases::{CaseFile, CaseOutcome, CaseSpec, Report, RequirementSpec};
pub use compare::{
    Lanes, Mismatch, PrecisionComparator, PrecisionRequirement, RequirementKind, UlpComparator,
    UlpFloat, try_ulp_distance, ulp_distance,
};
pub use config::{Config, ReportConfig, ToleranceConfig};
pub use error::{CheckError, Result};
pub use fp::{
    Bfloat, Bfloat16, FloatKind, FloatType, Half, Layout, NanPolicy, NarrowMath, NumericLimits,
    ReducedFloat, RoundingMode, Tfloat,
};
pub use reference::MathFunction;
pub use runtime::{
    Backend, BufferElement, BufferHandle, DeviceInfo, HostRuntime, KernelArg, KernelContext,
    KernelHandle, LaunchConfig, ProgramType, Runtime, RuntimeConfig, RuntimeError, RuntimeExt,
    create_runtime,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
