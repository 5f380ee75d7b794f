use serde::{Deserialize, Serialize};

use super::links::{fallback_links, registry_search_link, registry_search_url};
use crate::models::{ConditionKey, ReferenceLink, RelevanceLabel, TherapyRecord, TrialSummary};
use crate::reference::RelevanceMap;
use crate::registry::TrialRegistry;

/// Free-text markers of cell or gene therapy, matched as lowercase substrings.
pub const CGT_KEYWORDS: &[&str] = &[
    "cell therapy",
    "gene therapy",
    "crispr",
    "talen",
    "zfn",
    "gene editing",
    "gene correction",
    "gene silencing",
    "reprogramming",
    "cgt",
    "c&gt",
    "car-t therapy",
];

/// The rule that produced a relevance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBasis {
    ApprovedTherapy,
    PipelineTherapy,
    PipelineWithActiveTrial,
    Keyword,
    NoEvidence,
}

/// Relevance label plus supporting links for the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceAssessment {
    pub label: RelevanceLabel,
    pub basis: RelevanceBasis,
    /// Product name or keyword that drove the decision.
    pub evidence: Option<String>,
    /// Never empty: the generic search links are always appended last.
    pub links: Vec<ReferenceLink>,
}

/// Decides whether cell/gene therapy is relevant to a record's condition.
///
/// Approved-therapy table, then pipeline table (upgraded to `Relevant`
/// when the registry reports an active Phase 1+ trial), then keywords,
/// then `Unsure`.
#[derive(Clone, Copy)]
pub struct CgtRelevanceClassifier<'a> {
    approved: &'a RelevanceMap,
    pipeline: &'a RelevanceMap,
    registry: Option<&'a dyn TrialRegistry>,
}

impl<'a> CgtRelevanceClassifier<'a> {
    pub fn new(approved: &'a RelevanceMap, pipeline: &'a RelevanceMap) -> Self {
        Self {
            approved,
            pipeline,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a dyn TrialRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn classify(&self, text: &str, condition: &str) -> (RelevanceLabel, Vec<ReferenceLink>) {
        let assessment = self.assess(text, condition);
        (assessment.label, assessment.links)
    }

    pub fn assess(&self, text: &str, condition: &str) -> RelevanceAssessment {
        let key = ConditionKey::new(condition);
        let search_url = registry_search_url(condition);
        let mut links = Vec::new();

        let (label, basis, evidence) = if let Some(records) = self.lookup(self.approved, &key) {
            links.extend(records.iter().map(|r| r.to_link("Approved therapy", &search_url)));
            links.extend(self.active_trials(condition).iter().map(TrialSummary::to_link));
            (
                RelevanceLabel::Relevant,
                RelevanceBasis::ApprovedTherapy,
                Some(records[0].product.clone()),
            )
        } else if let Some(records) = self.lookup(self.pipeline, &key) {
            links.extend(records.iter().map(|r| r.to_link("Pipeline therapy", &search_url)));
            let trials = self.active_trials(condition);
            links.extend(trials.iter().map(TrialSummary::to_link));

            match trials.iter().find(|t| t.supports_upgrade()) {
                Some(trial) => (
                    RelevanceLabel::Relevant,
                    RelevanceBasis::PipelineWithActiveTrial,
                    Some(trial.nct_id.clone()),
                ),
                None => (
                    RelevanceLabel::LikelyRelevant,
                    RelevanceBasis::PipelineTherapy,
                    Some(records[0].product.clone()),
                ),
            }
        } else if let Some(keyword) = find_keyword(text) {
            links.extend(self.active_trials(condition).iter().map(TrialSummary::to_link));
            (
                RelevanceLabel::LikelyRelevant,
                RelevanceBasis::Keyword,
                Some(keyword.to_string()),
            )
        } else {
            (RelevanceLabel::Unsure, RelevanceBasis::NoEvidence, None)
        };

        if label != RelevanceLabel::Unsure {
            links.push(registry_search_link(condition));
        }
        links.extend(fallback_links(condition));

        tracing::debug!(
            condition = %key,
            label = label.as_str(),
            basis = ?basis,
            links = links.len(),
            "CGT relevance assessed"
        );

        RelevanceAssessment {
            label,
            basis,
            evidence,
            links,
        }
    }

    fn lookup<'m>(&self, map: &'m RelevanceMap, key: &ConditionKey) -> Option<&'m [TherapyRecord]> {
        map.get(key).filter(|rows| !rows.is_empty()).map(Vec::as_slice)
    }

    /// Registry enrichment. Failures are logged and read as "no trials".
    fn active_trials(&self, condition: &str) -> Vec<TrialSummary> {
        let Some(registry) = self.registry else {
            return Vec::new();
        };

        match registry.active_trials(condition) {
            Ok(trials) => trials,
            Err(e) => {
                tracing::warn!(condition, error = %e, "Trial registry unavailable, skipping enrichment");
                Vec::new()
            }
        }
    }
}

/// First CGT keyword present in `text`, case-insensitive.
pub fn find_keyword(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CGT_KEYWORDS.iter().copied().find(|kw| lower.contains(kw))
}
