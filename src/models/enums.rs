use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serialized form matches `as_str`; deserialization goes through `parse_loose`
/// so hand-edited review files may use sheet spellings.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Parse a spreadsheet-style value: case, spaces and hyphens are ignored,
            /// so "Likely Relevant" and "likely-relevant" both match `likely_relevant`.
            pub fn parse_loose(s: &str) -> Result<Self, ModelError> {
                let normalized = s
                    .trim()
                    .to_lowercase()
                    .replace(|c: char| c == ' ' || c == '-', "_");
                normalized.parse()
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse_loose(&raw).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.display_name())
            }
        }
    };
}

str_enum!(
    /// Degree of infant (0-24 months) inclusiveness, most inclusive first.
    /// Declaration order is documentation only; classifiers never compare labels.
    InclusionLabel {
        IncludeInfants => "include_infants",
        LikelyIncludeInfants => "likely_include_infants",
        Uncertain => "uncertain",
        UnlikelyButPossible => "unlikely_but_possible",
        DoesNotInclude => "does_not_include",
    }
);

impl InclusionLabel {
    /// Label as shown in the review sheet.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::IncludeInfants => "Include Infants",
            Self::LikelyIncludeInfants => "Likely Include Infants",
            Self::Uncertain => "Uncertain",
            Self::UnlikelyButPossible => "Unlikely but Possible",
            Self::DoesNotInclude => "Does Not Include",
        }
    }
}

str_enum!(
    /// Cell/gene-therapy relevance of a condition.
    RelevanceLabel {
        Relevant => "relevant",
        LikelyRelevant => "likely_relevant",
        Unsure => "unsure",
        /// Reviewer override only.
        UnlikelyRelevant => "unlikely_relevant",
        /// Reviewer override only.
        NotRelevant => "not_relevant",
    }
);

impl RelevanceLabel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Relevant => "Relevant",
            Self::LikelyRelevant => "Likely Relevant",
            Self::Unsure => "Unsure",
            Self::UnlikelyRelevant => "Unlikely Relevant",
            Self::NotRelevant => "Not Relevant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn inclusion_label_round_trip() {
        for (variant, s) in [
            (InclusionLabel::IncludeInfants, "include_infants"),
            (InclusionLabel::LikelyIncludeInfants, "likely_include_infants"),
            (InclusionLabel::Uncertain, "uncertain"),
            (InclusionLabel::UnlikelyButPossible, "unlikely_but_possible"),
            (InclusionLabel::DoesNotInclude, "does_not_include"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(InclusionLabel::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn relevance_label_round_trip() {
        for (variant, s) in [
            (RelevanceLabel::Relevant, "relevant"),
            (RelevanceLabel::LikelyRelevant, "likely_relevant"),
            (RelevanceLabel::Unsure, "unsure"),
            (RelevanceLabel::UnlikelyRelevant, "unlikely_relevant"),
            (RelevanceLabel::NotRelevant, "not_relevant"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(RelevanceLabel::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn parse_loose_accepts_sheet_values() {
        assert_eq!(
            RelevanceLabel::parse_loose("Likely Relevant").unwrap(),
            RelevanceLabel::LikelyRelevant
        );
        assert_eq!(
            InclusionLabel::parse_loose(" Unlikely but Possible ").unwrap(),
            InclusionLabel::UnlikelyButPossible
        );
        assert_eq!(
            InclusionLabel::parse_loose("does-not-include").unwrap(),
            InclusionLabel::DoesNotInclude
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = RelevanceLabel::from_str("maybe").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidEnum {
                field: "RelevanceLabel".into(),
                value: "maybe".into(),
            }
        );
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&InclusionLabel::LikelyIncludeInfants).unwrap();
        assert_eq!(json, "\"likely_include_infants\"");
        let back: RelevanceLabel = serde_json::from_str("\"not_relevant\"").unwrap();
        assert_eq!(back, RelevanceLabel::NotRelevant);
    }

    #[test]
    fn deserialize_accepts_sheet_spelling() {
        let label: RelevanceLabel = serde_json::from_str("\"Likely Relevant\"").unwrap();
        assert_eq!(label, RelevanceLabel::LikelyRelevant);
        let label: InclusionLabel = serde_json::from_str("\"Does Not Include\"").unwrap();
        assert_eq!(label, InclusionLabel::DoesNotInclude);
        assert!(serde_json::from_str::<InclusionLabel>("\"sometimes\"").is_err());
    }

    #[test]
    fn display_uses_sheet_names() {
        assert_eq!(InclusionLabel::DoesNotInclude.to_string(), "Does Not Include");
        assert_eq!(RelevanceLabel::LikelyRelevant.to_string(), "Likely Relevant");
    }
}
