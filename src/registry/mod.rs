//! Trial-registry collaborator used to enrich relevance results.
//!
//! Lookups are optional. Callers must treat any `RegistryError` as
//! "no enrichment" and never let it change a computed label.

pub mod clinicaltrials;
pub mod types;

pub use clinicaltrials::ClinicalTrialsClient;

use thiserror::Error;

use crate::models::TrialSummary;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Trial registry is not reachable at {0}")]
    Connection(String),

    #[error("Trial registry request timed out after {0}s")]
    Timeout(u64),

    #[error("Trial registry returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Registry response parsing error: {0}")]
    ResponseParsing(String),
}

/// Source of ongoing cell/gene-therapy trials for a condition.
pub trait TrialRegistry: Send + Sync {
    /// Active trials for `condition`. May block on network I/O.
    fn active_trials(&self, condition: &str) -> Result<Vec<TrialSummary>, RegistryError>;
}

/// Mock registry for testing: returns a fixed trial list or a fixed failure.
pub struct MockTrialRegistry {
    trials: Vec<TrialSummary>,
    fail_with_timeout: bool,
}

impl MockTrialRegistry {
    pub fn new(trials: Vec<TrialSummary>) -> Self {
        Self {
            trials,
            fail_with_timeout: false,
        }
    }

    /// A registry whose every lookup times out.
    pub fn unavailable() -> Self {
        Self {
            trials: Vec::new(),
            fail_with_timeout: true,
        }
    }
}

impl TrialRegistry for MockTrialRegistry {
    fn active_trials(&self, _condition: &str) -> Result<Vec<TrialSummary>, RegistryError> {
        if self.fail_with_timeout {
            return Err(RegistryError::Timeout(1));
        }
        Ok(self.trials.clone())
    }
}
