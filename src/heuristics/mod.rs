//! Rule-based classifiers for clinical-trial records.
//!
//! Pure functions of (text, condition, reference tables). The only
//! side effect is the optional trial-registry lookup in `cgt`, which
//! fails soft.

pub mod age_range;
pub mod cgt;
pub mod infant;
pub mod links;

pub use age_range::extract_age_span;
pub use cgt::{CgtRelevanceClassifier, RelevanceAssessment, RelevanceBasis};
pub use infant::{InclusionAssessment, InclusionBasis, InfantInclusionClassifier};
pub use links::fallback_links;
