use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Case-insensitive condition name used for every reference-table lookup.
/// Always stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConditionKey(String);

impl ConditionKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ConditionKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Borrow<str> for ConditionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ConditionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(ConditionKey::new("  Sickle Cell Disease\t").as_str(), "sickle cell disease");
        assert_eq!(ConditionKey::new("SMA"), ConditionKey::new("sma"));
    }

    #[test]
    fn empty_input_is_empty_key() {
        assert!(ConditionKey::new("   ").is_empty());
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ConditionKey::new("Hemophilia A"), 1);
        assert_eq!(map.get("hemophilia a"), Some(&1));
    }

    #[test]
    fn deserialize_normalizes() {
        let key: ConditionKey = serde_json::from_str("\" Cystic Fibrosis \"").unwrap();
        assert_eq!(key.as_str(), "cystic fibrosis");
    }
}
