pub mod config;
pub mod heuristics; // Infant-inclusion + CGT-relevance classifiers
pub mod models;
pub mod reference; // Onset / therapy lookup tables
pub mod registry; // ClinicalTrials.gov collaborator
pub mod review;

pub use heuristics::{
    extract_age_span, CgtRelevanceClassifier, InclusionAssessment, InfantInclusionClassifier,
    RelevanceAssessment,
};
pub use models::{AgeSpan, InclusionLabel, ReferenceLink, RelevanceLabel};
pub use reference::{ReferenceError, ReferenceTables};
pub use registry::{ClinicalTrialsClient, RegistryError, TrialRegistry};
pub use review::{RecordInput, ReviewEngine, RowSuggestion};

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
/// Filter comes from `TRIALSCOPE_LOG`, then `RUST_LOG`, else the default filter.
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
