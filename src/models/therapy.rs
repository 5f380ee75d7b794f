use serde::{Deserialize, Serialize};

use super::condition::ConditionKey;
use super::link::ReferenceLink;

/// One row of an approved- or pipeline-therapy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyRecord {
    pub condition: ConditionKey,
    pub product: String,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TherapyRecord {
    pub fn new(condition: &str, product: &str) -> Self {
        Self {
            condition: ConditionKey::new(condition),
            product: product.to_string(),
            sponsor: None,
            url: None,
            phase: None,
            status: None,
            note: None,
        }
    }

    /// Build the supporting link for this record.
    /// `prefix` describes the table the record came from ("Approved therapy").
    /// Records without their own URL fall back to `fallback_url`.
    pub fn to_link(&self, prefix: &str, fallback_url: &str) -> ReferenceLink {
        let title = match &self.sponsor {
            Some(sponsor) => format!("{prefix}: {} ({sponsor})", self.product),
            None => format!("{prefix}: {}", self.product),
        };
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(fallback_url);

        ReferenceLink::new(title, url)
            .with_phase(self.phase.clone())
            .with_status(self.status.clone())
    }
}
