use std::time::Duration;

use super::types::StudiesResponse;
use super::{RegistryError, TrialRegistry};
use crate::config::RegistryConfig;
use crate::models::trial::ACTIVE_STATUSES;
use crate::models::TrialSummary;

/// Intervention query sent with every condition lookup.
const CGT_INTERVENTION_QUERY: &str = "gene therapy OR cell therapy OR gene editing";

/// ClinicalTrials.gov v2 HTTP client.
pub struct ClinicalTrialsClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
    page_size: u32,
}

impl ClinicalTrialsClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("trialscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::Http(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
            page_size: config.page_size,
        })
    }

    /// Public ClinicalTrials.gov with default timeout, env overrides applied.
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::new(&RegistryConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> RegistryError {
        if e.is_timeout() {
            RegistryError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            RegistryError::Connection(self.base_url.clone())
        } else {
            RegistryError::Http(e.to_string())
        }
    }
}

impl TrialRegistry for ClinicalTrialsClient {
    fn active_trials(&self, condition: &str) -> Result<Vec<TrialSummary>, RegistryError> {
        let condition = condition.trim();
        if condition.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/studies", self.base_url);
        let statuses = ACTIVE_STATUSES.join("|");
        let page_size = self.page_size.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query.cond", condition),
                ("query.intr", CGT_INTERVENTION_QUERY),
                ("filter.overallStatus", statuses.as_str()),
                ("pageSize", page_size.as_str()),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: StudiesResponse = response
            .json()
            .map_err(|e| RegistryError::ResponseParsing(e.to_string()))?;

        let trials: Vec<TrialSummary> = parsed
            .studies
            .into_iter()
            .map(TrialSummary::from)
            .filter(TrialSummary::is_active)
            .collect();

        tracing::debug!(condition, count = trials.len(), "Registry lookup complete");
        Ok(trials)
    }
}
