//! Precision checking of device results against host references
//!
//! ```text
//! candidate ─┐
//!            ├─ PrecisionRequirement::check per lane ─ matches() / describe()
//! reference ─┘
//! ```

pub mod lanes;
pub mod precision;
pub mod requirement;
pub mod ulp;
pub mod ulp_comparator;

pub use lanes::Lanes;
pub use precision::PrecisionComparator;
pub use requirement::{PrecisionRequirement, RequirementKind};
pub use ulp::{UlpFloat, try_ulp_distance, ulp_distance};
pub use ulp_comparator::{Mismatch, UlpComparator};
