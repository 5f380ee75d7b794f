//! ClinicalTrials.gov v2 `/studies` response shapes (only the fields we read).

use serde::Deserialize;

use crate::models::{TrialPhase, TrialSummary};

pub const STUDY_URL_BASE: &str = "https://clinicaltrials.gov/study";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudiesResponse {
    #[serde(default)]
    pub studies: Vec<Study>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub protocol_section: ProtocolSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolSection {
    pub identification_module: IdentificationModule,
    #[serde(default)]
    pub status_module: Option<StatusModule>,
    #[serde(default)]
    pub design_module: Option<DesignModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationModule {
    pub nct_id: String,
    #[serde(default)]
    pub brief_title: Option<String>,
    #[serde(default)]
    pub official_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusModule {
    #[serde(default)]
    pub overall_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignModule {
    #[serde(default)]
    pub phases: Vec<String>,
}

impl From<Study> for TrialSummary {
    fn from(study: Study) -> Self {
        let section = study.protocol_section;
        let ident = section.identification_module;

        // Phase 1/2 studies list both phases; keep the most advanced one.
        let phase = section
            .design_module
            .map(|d| d.phases)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| TrialPhase::parse_registry(p))
            .max();

        let title = ident
            .brief_title
            .or(ident.official_title)
            .unwrap_or_else(|| ident.nct_id.clone());

        TrialSummary {
            url: format!("{STUDY_URL_BASE}/{}", ident.nct_id),
            nct_id: ident.nct_id,
            title,
            phase,
            status: section.status_module.and_then(|s| s.overall_status),
        }
    }
}
