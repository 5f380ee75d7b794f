//! Reference tables consulted by the classifiers.
//!
//! Loaded once by the caller and shared read-only across every
//! classification call. Keys are normalized through `ConditionKey`.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{ConditionKey, TherapyRecord};

pub const ONSET_FILE: &str = "onset_ages.json";
pub const APPROVED_FILE: &str = "approved_therapies.json";
pub const PIPELINE_FILE: &str = "pipeline_therapies.json";
pub const SYNONYMS_FILE: &str = "condition_synonyms.json";

/// Condition → free-text typical onset ("birth", "3 years").
pub type OnsetMap = HashMap<ConditionKey, String>;
/// Condition → therapy records (several products may target one condition).
pub type RelevanceMap = HashMap<ConditionKey, Vec<TherapyRecord>>;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read reference file {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse reference file {0}: {1}")]
    Parse(String, String),
}

/// Loaded reference data for both classifiers.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub onset: OnsetMap,
    pub approved: RelevanceMap,
    pub pipeline: RelevanceMap,
    pub synonyms: HashMap<ConditionKey, ConditionKey>,
}

impl ReferenceTables {
    /// Load reference data from JSON files in `dir`.
    /// The synonym table is optional; the other three are required.
    pub fn load(dir: &Path) -> Result<Self, ReferenceError> {
        let onset_raw: HashMap<String, String> = read_json(dir, ONSET_FILE)?;
        let approved_rows: Vec<TherapyRecord> = read_json(dir, APPROVED_FILE)?;
        let pipeline_rows: Vec<TherapyRecord> = read_json(dir, PIPELINE_FILE)?;

        let synonyms_raw: HashMap<String, String> = if dir.join(SYNONYMS_FILE).exists() {
            read_json(dir, SYNONYMS_FILE)?
        } else {
            tracing::debug!(dir = %dir.display(), "No synonym table, skipping");
            HashMap::new()
        };

        let tables = Self {
            onset: onset_raw
                .into_iter()
                .map(|(k, v)| (ConditionKey::new(&k), v))
                .collect(),
            approved: group_by_condition(approved_rows),
            pipeline: group_by_condition(pipeline_rows),
            synonyms: synonyms_raw
                .into_iter()
                .map(|(k, v)| (ConditionKey::new(&k), ConditionKey::new(&v)))
                .collect(),
        };

        tracing::info!(
            dir = %dir.display(),
            onset = tables.onset.len(),
            approved = tables.approved.len(),
            pipeline = tables.pipeline.len(),
            synonyms = tables.synonyms.len(),
            "Reference tables loaded"
        );

        Ok(tables)
    }

    /// Create reference data for tests (no file I/O).
    pub fn load_test() -> Self {
        let onset = [
            ("spinal muscular atrophy", "birth to 6 months"),
            ("krabbe disease", "infant onset, 3-6 months"),
            ("duchenne muscular dystrophy", "toddler, 2-3 years"),
            ("sickle cell disease", "0-12 months"),
            ("cystic fibrosis", "birth"),
            ("juvenile idiopathic arthritis", "child, typically 4 years"),
            ("huntington disease", "adult, 30-50 years"),
        ]
        .into_iter()
        .map(|(k, v)| (ConditionKey::new(k), v.to_string()))
        .collect();

        let mut zolgensma = TherapyRecord::new("spinal muscular atrophy", "onasemnogene abeparvovec");
        zolgensma.sponsor = Some("Novartis".into());
        zolgensma.status = Some("Approved".into());

        let mut casgevy = TherapyRecord::new("sickle cell disease", "exagamglogene autotemcel");
        casgevy.sponsor = Some("Vertex".into());
        casgevy.status = Some("Approved".into());

        let mut krabbe = TherapyRecord::new("krabbe disease", "FBX-101");
        krabbe.phase = Some("Phase 1/2".into());
        krabbe.status = Some("Investigational".into());

        let mut dmd = TherapyRecord::new("duchenne muscular dystrophy", "fordadistrogene movaparvovec");
        dmd.phase = Some("Phase 3".into());

        let synonyms = [
            ("sma", "spinal muscular atrophy"),
            ("scd", "sickle cell disease"),
            ("dmd", "duchenne muscular dystrophy"),
        ]
        .into_iter()
        .map(|(k, v)| (ConditionKey::new(k), ConditionKey::new(v)))
        .collect();

        Self {
            onset,
            approved: group_by_condition(vec![zolgensma, casgevy]),
            pipeline: group_by_condition(vec![krabbe, dmd]),
            synonyms,
        }
    }

    /// Normalize a condition name and resolve it through the synonym table.
    pub fn canonical_condition(&self, raw: &str) -> ConditionKey {
        let key = ConditionKey::new(raw);
        match self.synonyms.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ReferenceError> {
    let path = dir.join(file);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| ReferenceError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| ReferenceError::Parse(file.into(), e.to_string()))
}

fn group_by_condition(rows: Vec<TherapyRecord>) -> RelevanceMap {
    let mut map = RelevanceMap::new();
    for row in rows {
        if row.condition.is_empty() {
            tracing::warn!(product = %row.product, "Skipping therapy row without condition");
            continue;
        }
        map.entry(row.condition.clone()).or_default().push(row);
    }
    map
}
