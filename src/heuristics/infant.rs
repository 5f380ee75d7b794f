use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::age_range::extract_age_span;
use crate::models::{AgeSpan, ConditionKey, InclusionLabel};
use crate::reference::OnsetMap;

/// Oldest age, in months, still counted as an infant.
pub const INFANT_CEILING_MONTHS: u32 = 24;

/// Onset descriptions pointing at infancy.
const INFANT_ONSET_TERMS: &[&str] = &[
    "birth",
    "infant",
    "neonate",
    "neonatal",
    "newborn",
    "0-2 years",
    "0-12 months",
    "0-24 months",
];

/// Onset descriptions pointing at early childhood, past infancy.
const CHILD_ONSET_TERMS: &[&str] = &["toddler", "child", "3 years", "4 years"];

/// Phrases that rule infants out explicitly.
static EXCLUSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:no|excluding|excludes?|exclusion\s+of|not\s+including|(?:does|do)\s+not\s+include)\s+(?:infants?|newborns?|neonates?)\b",
        // "Infants and toddlers are excluded", "Infants will not be enrolled"
        r"(?i)\b(?:infants?|newborns?|neonates?)\b[^.;]{0,40}?\b(?:are\s+|will\s+be\s+|shall\s+be\s+)?(?:excluded|not\s+eligible|ineligible|not\s+be\s+enrolled|not\s+enrolled)\b",
        // Listed under an exclusion heading, within the same sentence.
        r"(?i)\bexclusion\s+criteria\s*:[^.]*?\b(?:infants?|newborns?|neonates?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid exclusion regex pattern"))
    .collect()
});

/// Phrases that name infants as eligible.
static INCLUSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bnewborns?\b",
        r"(?i)\bneonates?\b",
        r"(?i)\binfants?\b",
        r"(?i)\bstarting\s+at\s+birth\b",
        r"(?i)\bfrom\s+birth\b",
        r"(?i)\bfrom\s+0\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid inclusion regex pattern"))
    .collect()
});

/// The rule that produced an inclusion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionBasis {
    ExclusionPhrase,
    InclusionPhrase,
    MinimumAgeBelowCeiling,
    MinimumAgeAtCeiling,
    MinimumAgeAboveCeiling,
    MaximumAgeOnly,
    InfantOnset,
    ChildOnset,
    NoEvidence,
}

/// Inclusion label plus the evidence shown to the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionAssessment {
    pub label: InclusionLabel,
    pub basis: InclusionBasis,
    /// Matched phrase or onset description, when one drove the decision.
    pub evidence: Option<String>,
    pub age_span: AgeSpan,
}

/// Decides whether a record's population includes infants (0-24 months).
///
/// Rules run in strict precedence, first match wins:
/// exclusion phrase, inclusion phrase or minimum below 24 months,
/// minimum at/above 24 months, maximum-only range, condition onset,
/// then `Uncertain`.
#[derive(Debug, Clone, Copy)]
pub struct InfantInclusionClassifier<'a> {
    onset: &'a OnsetMap,
}

impl<'a> InfantInclusionClassifier<'a> {
    pub fn new(onset: &'a OnsetMap) -> Self {
        Self { onset }
    }

    pub fn classify(&self, text: &str, condition: &str) -> InclusionLabel {
        self.assess(text, condition).label
    }

    pub fn assess(&self, text: &str, condition: &str) -> InclusionAssessment {
        let age_span = extract_age_span(text);
        let decide = |label, basis, evidence: Option<String>| InclusionAssessment {
            label,
            basis,
            evidence,
            age_span,
        };

        if let Some(phrase) = first_match(&EXCLUSION_PATTERNS, text) {
            return decide(
                InclusionLabel::DoesNotInclude,
                InclusionBasis::ExclusionPhrase,
                Some(phrase),
            );
        }

        if let Some(phrase) = first_match(&INCLUSION_PATTERNS, text) {
            return decide(
                InclusionLabel::IncludeInfants,
                InclusionBasis::InclusionPhrase,
                Some(phrase),
            );
        }

        if let Some(min) = age_span.min_months {
            let (label, basis) = match min.cmp(&INFANT_CEILING_MONTHS) {
                std::cmp::Ordering::Less => (
                    InclusionLabel::IncludeInfants,
                    InclusionBasis::MinimumAgeBelowCeiling,
                ),
                std::cmp::Ordering::Equal => (
                    InclusionLabel::UnlikelyButPossible,
                    InclusionBasis::MinimumAgeAtCeiling,
                ),
                std::cmp::Ordering::Greater => (
                    InclusionLabel::DoesNotInclude,
                    InclusionBasis::MinimumAgeAboveCeiling,
                ),
            };
            return decide(label, basis, Some(format!("minimum age {min} months")));
        }

        // Any minimum was decided above, so a maximum here stands alone.
        if let Some(max) = age_span.max_months {
            return decide(
                InclusionLabel::LikelyIncludeInfants,
                InclusionBasis::MaximumAgeOnly,
                Some(format!("up to {max} months")),
            );
        }

        let key = ConditionKey::new(condition);
        if let Some(onset) = self.onset.get(&key) {
            let lower = onset.to_lowercase();
            if INFANT_ONSET_TERMS.iter().any(|t| contains_term(&lower, t)) {
                return decide(
                    InclusionLabel::LikelyIncludeInfants,
                    InclusionBasis::InfantOnset,
                    Some(onset.clone()),
                );
            }
            if CHILD_ONSET_TERMS.iter().any(|t| contains_term(&lower, t)) {
                return decide(
                    InclusionLabel::UnlikelyButPossible,
                    InclusionBasis::ChildOnset,
                    Some(onset.clone()),
                );
            }
        }

        decide(InclusionLabel::Uncertain, InclusionBasis::NoEvidence, None)
    }
}

fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
}

/// Substring match, except that a term starting with a digit must not be
/// glued to a preceding digit ("13 years" does not contain "3 years").
fn contains_term(haystack: &str, term: &str) -> bool {
    let leading_digit = term.chars().next().is_some_and(|c| c.is_ascii_digit());
    haystack.match_indices(term).any(|(idx, _)| {
        !leading_digit
            || !haystack[..idx]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit())
    })
}
