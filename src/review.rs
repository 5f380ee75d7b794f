//! Review layer: per-record suggestions and reviewer decisions.
//!
//! Runs both classifiers independently on each record and carries the
//! suggested labels into decisions the reviewer can confirm or override.

use serde::{Deserialize, Serialize};

use crate::heuristics::{
    CgtRelevanceClassifier, InclusionAssessment, InfantInclusionClassifier, RelevanceAssessment,
};
use crate::models::{ConditionKey, InclusionLabel, RelevanceLabel};
use crate::reference::ReferenceTables;
use crate::registry::TrialRegistry;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One registry record as exported from the review sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordInput {
    pub record_id: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl RecordInput {
    /// Free-text fields joined for classification, blanks skipped.
    pub fn combined_text(&self) -> String {
        [&self.title, &self.eligibility, &self.summary]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Suggested labels for one record, with the evidence behind each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSuggestion {
    pub record_id: String,
    pub reviewer: Option<String>,
    /// Condition after normalization and synonym resolution.
    pub condition: ConditionKey,
    pub inclusion: InclusionAssessment,
    pub relevance: RelevanceAssessment,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Confirmed,
    Overridden,
}

/// A suggested label and the reviewer's optional override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision<L> {
    pub suggested: L,
    pub override_label: Option<L>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl<L: Copy + PartialEq> ReviewDecision<L> {
    pub fn new(suggested: L) -> Self {
        Self {
            suggested,
            override_label: None,
            comment: None,
        }
    }

    /// The reviewer's label when given, otherwise the suggestion.
    pub fn final_label(&self) -> L {
        self.override_label.unwrap_or(self.suggested)
    }

    /// Overriding with the suggested label itself counts as a confirmation.
    pub fn outcome(&self) -> ReviewOutcome {
        match self.override_label {
            Some(label) if label != self.suggested => ReviewOutcome::Overridden,
            _ => ReviewOutcome::Confirmed,
        }
    }
}

/// Both decisions for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDecision {
    pub record_id: String,
    pub inclusion: ReviewDecision<InclusionLabel>,
    pub relevance: ReviewDecision<RelevanceLabel>,
}

impl From<&RowSuggestion> for RowDecision {
    fn from(suggestion: &RowSuggestion) -> Self {
        Self {
            record_id: suggestion.record_id.clone(),
            inclusion: ReviewDecision::new(suggestion.inclusion.label),
            relevance: ReviewDecision::new(suggestion.relevance.label),
        }
    }
}

/// A reviewer edit submitted against one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewCorrection {
    pub record_id: String,
    #[serde(default)]
    pub inclusion: Option<InclusionLabel>,
    #[serde(default)]
    pub relevance: Option<RelevanceLabel>,
    #[serde(default)]
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Produces suggestions for records against shared reference tables.
#[derive(Clone, Copy)]
pub struct ReviewEngine<'a> {
    tables: &'a ReferenceTables,
    registry: Option<&'a dyn TrialRegistry>,
}

impl<'a> ReviewEngine<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a dyn TrialRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn suggest(&self, record: &RecordInput) -> RowSuggestion {
        let condition = self.tables.canonical_condition(&record.condition);
        let text = record.combined_text();

        let inclusion =
            InfantInclusionClassifier::new(&self.tables.onset).assess(&text, condition.as_str());

        let mut cgt = CgtRelevanceClassifier::new(&self.tables.approved, &self.tables.pipeline);
        if let Some(registry) = self.registry {
            cgt = cgt.with_registry(registry);
        }
        let relevance = cgt.assess(&text, condition.as_str());

        tracing::info!(
            record_id = %record.record_id,
            condition = %condition,
            inclusion = inclusion.label.as_str(),
            relevance = relevance.label.as_str(),
            "Record classified"
        );

        RowSuggestion {
            record_id: record.record_id.clone(),
            reviewer: record.reviewer.clone(),
            condition,
            inclusion,
            relevance,
        }
    }

    pub fn suggest_all(&self, records: &[RecordInput]) -> Vec<RowSuggestion> {
        records.iter().map(|r| self.suggest(r)).collect()
    }
}

// ---------------------------------------------------------------------------
// Helper Functions
// ---------------------------------------------------------------------------

/// Records assigned to `reviewer`, matched case-insensitively.
pub fn records_for_reviewer<'r>(records: &'r [RecordInput], reviewer: &str) -> Vec<&'r RecordInput> {
    let wanted = reviewer.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.reviewer
                .as_deref()
                .is_some_and(|name| name.trim().to_lowercase() == wanted)
        })
        .collect()
}

/// Apply reviewer corrections to decisions, matched by record id.
/// Returns the number of corrections that found their record.
pub fn apply_corrections(decisions: &mut [RowDecision], corrections: &[ReviewCorrection]) -> usize {
    let mut applied = 0;

    for correction in corrections {
        let Some(decision) = decisions
            .iter_mut()
            .find(|d| d.record_id == correction.record_id)
        else {
            tracing::warn!(record_id = %correction.record_id, "Correction for unknown record");
            continue;
        };

        if let Some(label) = correction.inclusion {
            decision.inclusion.override_label = Some(label);
            decision.inclusion.comment = correction.comment.clone();
        }
        if let Some(label) = correction.relevance {
            decision.relevance.override_label = Some(label);
            decision.relevance.comment = correction.comment.clone();
        }
        applied += 1;
    }

    applied
}

/// Turn suggestions into decisions and apply reviewer corrections on top.
pub fn review_rows(suggestions: &[RowSuggestion], corrections: &[ReviewCorrection]) -> Vec<RowDecision> {
    let mut decisions: Vec<RowDecision> = suggestions.iter().map(RowDecision::from).collect();
    let applied = apply_corrections(&mut decisions, corrections);

    let overridden = decisions
        .iter()
        .filter(|d| {
            d.inclusion.outcome() == ReviewOutcome::Overridden
                || d.relevance.outcome() == ReviewOutcome::Overridden
        })
        .count();
    tracing::info!(
        rows = decisions.len(),
        corrections = corrections.len(),
        applied,
        overridden,
        "Reviewer corrections applied"
    );

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::{InclusionBasis, RelevanceBasis};
    use crate::registry::MockTrialRegistry;

    fn record(id: &str, reviewer: Option<&str>, condition: &str, eligibility: &str) -> RecordInput {
        RecordInput {
            record_id: id.into(),
            reviewer: reviewer.map(String::from),
            condition: condition.into(),
            eligibility: Some(eligibility.into()),
            ..RecordInput::default()
        }
    }

    #[test]
    fn combined_text_skips_blank_fields() {
        let input = RecordInput {
            record_id: "r1".into(),
            title: Some("  AAV study ".into()),
            eligibility: Some("   ".into()),
            summary: Some("Minimum age 6 months".into()),
            ..RecordInput::default()
        };
        assert_eq!(input.combined_text(), "AAV study\nMinimum age 6 months");
        assert_eq!(RecordInput::default().combined_text(), "");
    }

    #[test]
    fn record_input_parses_with_missing_optionals() {
        let input: RecordInput =
            serde_json::from_str(r#"{"record_id": "r9", "condition": "Krabbe Disease"}"#).unwrap();
        assert_eq!(input.record_id, "r9");
        assert!(input.reviewer.is_none());
        assert!(input.eligibility.is_none());
    }

    #[test]
    fn suggest_resolves_synonyms_before_lookup() {
        let tables = ReferenceTables::load_test();
        let engine = ReviewEngine::new(&tables);

        let s = engine.suggest(&record("r1", None, "SMA", ""));
        assert_eq!(s.condition.as_str(), "spinal muscular atrophy");
        assert_eq!(s.relevance.label, RelevanceLabel::Relevant);
        assert_eq!(s.inclusion.label, InclusionLabel::LikelyIncludeInfants);
        assert_eq!(s.inclusion.basis, InclusionBasis::InfantOnset);
    }

    #[test]
    fn suggest_runs_classifiers_independently() {
        let tables = ReferenceTables::load_test();
        let engine = ReviewEngine::new(&tables);

        let s = engine.suggest(&record(
            "r2",
            Some("Dana"),
            "Rett Syndrome",
            "Minimum age 14 years. CRISPR gene editing of autologous cells.",
        ));
        assert_eq!(s.inclusion.label, InclusionLabel::DoesNotInclude);
        assert_eq!(s.relevance.label, RelevanceLabel::LikelyRelevant);
        assert_eq!(s.relevance.basis, RelevanceBasis::Keyword);
        assert_eq!(s.reviewer.as_deref(), Some("Dana"));
    }

    #[test]
    fn suggest_passes_registry_through() {
        let tables = ReferenceTables::load_test();
        let registry = MockTrialRegistry::new(vec![crate::models::TrialSummary {
            nct_id: "NCT05000001".into(),
            title: "FBX-101 after HSCT".into(),
            phase: Some(crate::models::TrialPhase::Phase1),
            status: Some("RECRUITING".into()),
            url: "https://clinicaltrials.gov/study/NCT05000001".into(),
        }]);
        let engine = ReviewEngine::new(&tables).with_registry(&registry);

        let s = engine.suggest(&record("r3", None, "Krabbe disease", ""));
        assert_eq!(s.relevance.label, RelevanceLabel::Relevant);
        assert_eq!(s.relevance.basis, RelevanceBasis::PipelineWithActiveTrial);
    }

    #[test]
    fn suggest_all_preserves_order() {
        let tables = ReferenceTables::load_test();
        let engine = ReviewEngine::new(&tables);
        let records = vec![
            record("a", None, "cystic fibrosis", ""),
            record("b", None, "huntington disease", "Adults 18 years and older"),
            record("c", None, "unknown", ""),
        ];

        let ids: Vec<_> = engine
            .suggest_all(&records)
            .into_iter()
            .map(|s| (s.record_id, s.inclusion.label))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("a".to_string(), InclusionLabel::LikelyIncludeInfants),
                ("b".to_string(), InclusionLabel::DoesNotInclude),
                ("c".to_string(), InclusionLabel::Uncertain),
            ]
        );
    }

    #[test]
    fn reviewer_filter_is_case_insensitive() {
        let records = vec![
            record("1", Some("Dana"), "x", ""),
            record("2", Some(" dana "), "x", ""),
            record("3", Some("Lee"), "x", ""),
            record("4", None, "x", ""),
        ];
        let ids: Vec<_> = records_for_reviewer(&records, "DANA")
            .iter()
            .map(|r| r.record_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(records_for_reviewer(&records, "nobody").is_empty());
    }

    #[test]
    fn decision_final_label_and_outcome() {
        let mut d = ReviewDecision::new(RelevanceLabel::Unsure);
        assert_eq!(d.final_label(), RelevanceLabel::Unsure);
        assert_eq!(d.outcome(), ReviewOutcome::Confirmed);

        d.override_label = Some(RelevanceLabel::Unsure);
        assert_eq!(d.outcome(), ReviewOutcome::Confirmed);

        d.override_label = Some(RelevanceLabel::NotRelevant);
        assert_eq!(d.final_label(), RelevanceLabel::NotRelevant);
        assert_eq!(d.outcome(), ReviewOutcome::Overridden);
    }

    #[test]
    fn apply_corrections_matches_by_record_id() {
        let tables = ReferenceTables::load_test();
        let engine = ReviewEngine::new(&tables);
        let mut decisions: Vec<RowDecision> = engine
            .suggest_all(&[
                record("a", None, "cystic fibrosis", ""),
                record("b", None, "krabbe disease", ""),
            ])
            .iter()
            .map(RowDecision::from)
            .collect();

        let corrections = vec![
            ReviewCorrection {
                record_id: "b".into(),
                relevance: Some(RelevanceLabel::UnlikelyRelevant),
                comment: Some("Trial is enzyme replacement".into()),
                ..ReviewCorrection::default()
            },
            ReviewCorrection {
                record_id: "missing".into(),
                inclusion: Some(InclusionLabel::DoesNotInclude),
                ..ReviewCorrection::default()
            },
        ];

        assert_eq!(apply_corrections(&mut decisions, &corrections), 1);
        assert_eq!(decisions[0].relevance.outcome(), ReviewOutcome::Confirmed);
        assert_eq!(decisions[1].relevance.final_label(), RelevanceLabel::UnlikelyRelevant);
        assert_eq!(
            decisions[1].relevance.comment.as_deref(),
            Some("Trial is enzyme replacement")
        );
        assert_eq!(decisions[1].inclusion.outcome(), ReviewOutcome::Confirmed);
    }

    #[test]
    fn review_rows_reads_sheet_spelled_corrections() {
        let tables = ReferenceTables::load_test();
        let suggestions = ReviewEngine::new(&tables).suggest_all(&[
            record("a", None, "rett syndrome", "gene therapy"),
            record("b", None, "unknown", ""),
        ]);
        let corrections: Vec<ReviewCorrection> = serde_json::from_str(
            r#"[{"record_id": "a", "relevance": "Not Relevant", "comment": "Small molecule"},
                {"record_id": "b", "inclusion": "Does Not Include"}]"#,
        )
        .unwrap();

        let decisions = review_rows(&suggestions, &corrections);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].relevance.suggested, RelevanceLabel::LikelyRelevant);
        assert_eq!(decisions[0].relevance.final_label(), RelevanceLabel::NotRelevant);
        assert_eq!(decisions[1].inclusion.final_label(), InclusionLabel::DoesNotInclude);
        assert_eq!(decisions[1].relevance.outcome(), ReviewOutcome::Confirmed);
    }

    #[test]
    fn suggestions_round_trip_through_json() {
        let tables = ReferenceTables::load_test();
        let suggestions =
            ReviewEngine::new(&tables).suggest_all(&[record("a", Some("Dana"), "SMA", "")]);
        let json = serde_json::to_string(&suggestions).unwrap();
        let back: Vec<RowSuggestion> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, suggestions);

        let decision: RowDecision = serde_json::from_str(
            r#"{"record_id": "a",
                "inclusion": {"suggested": "uncertain"},
                "relevance": {"suggested": "unsure", "override_label": "relevant"}}"#,
        )
        .unwrap();
        assert_eq!(decision.inclusion.override_label, None);
        assert_eq!(decision.relevance.final_label(), RelevanceLabel::Relevant);
    }

    #[test]
    fn engine_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReviewEngine<'static>>();
        assert_send_sync::<ReferenceTables>();
        assert_send_sync::<CgtRelevanceClassifier<'static>>();
        assert_send_sync::<InfantInclusionClassifier<'static>>();
    }
}
