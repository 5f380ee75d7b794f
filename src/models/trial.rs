use serde::{Deserialize, Serialize};

use super::link::ReferenceLink;

/// Registry statuses that count as an ongoing trial.
pub const ACTIVE_STATUSES: &[&str] = &[
    "RECRUITING",
    "NOT_YET_RECRUITING",
    "ACTIVE_NOT_RECRUITING",
    "ENROLLING_BY_INVITATION",
];

/// Clinical development phase reported by a trial registry.
///
/// `NotApplicable` sorts lowest so that `max()` over a multi-phase study
/// yields its most advanced phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    NotApplicable,
    EarlyPhase1,
    Phase1,
    Phase2,
    Phase3,
    Phase4,
}

impl TrialPhase {
    /// Lenient parse of registry phase strings: "PHASE2", "Phase 2",
    /// "phase ii", "EARLY_PHASE1", "Phase 0", "NA", "N/A".
    pub fn parse_registry(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_uppercase();

        match compact.as_str() {
            "NA" | "NOTAPPLICABLE" => Some(Self::NotApplicable),
            "EARLYPHASE1" | "EARLYPHASEI" | "PHASE0" => Some(Self::EarlyPhase1),
            "PHASE1" | "PHASEI" => Some(Self::Phase1),
            "PHASE2" | "PHASEII" => Some(Self::Phase2),
            "PHASE3" | "PHASEIII" => Some(Self::Phase3),
            "PHASE4" | "PHASEIV" => Some(Self::Phase4),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NotApplicable => "Not Applicable",
            Self::EarlyPhase1 => "Early Phase 1",
            Self::Phase1 => "Phase 1",
            Self::Phase2 => "Phase 2",
            Self::Phase3 => "Phase 3",
            Self::Phase4 => "Phase 4",
        }
    }

    /// Phase 1 or later. Early Phase 1 and non-phased studies do not count.
    pub fn is_at_least_phase1(&self) -> bool {
        *self >= Self::Phase1
    }
}

/// One registry study, as returned by a trial-registry collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub nct_id: String,
    pub title: String,
    pub phase: Option<TrialPhase>,
    pub status: Option<String>,
    pub url: String,
}

impl TrialSummary {
    pub fn is_active(&self) -> bool {
        self.status.as_deref().is_some_and(|s| {
            let normalized = s
                .split(|c: char| !c.is_alphanumeric())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("_")
                .to_uppercase();
            ACTIVE_STATUSES.contains(&normalized.as_str())
        })
    }

    /// Active and at Phase 1 or later.
    pub fn supports_upgrade(&self) -> bool {
        self.is_active() && self.phase.is_some_and(|p| p.is_at_least_phase1())
    }

    pub fn to_link(&self) -> ReferenceLink {
        ReferenceLink::new(format!("{}: {}", self.nct_id, self.title), self.url.clone())
            .with_phase(self.phase.map(|p| p.display_name().to_string()))
            .with_status(self.status.clone())
    }
}
