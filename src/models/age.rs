use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Participant age bounds found in free text, in months.
///
/// Either bound may be absent. No ordering is enforced: contradictory text
/// can yield `min_months > max_months`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeSpan {
    pub min_months: Option<u32>,
    pub max_months: Option<u32>,
}

impl AgeSpan {
    pub fn new(min_months: Option<u32>, max_months: Option<u32>) -> Self {
        Self {
            min_months,
            max_months,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_months.is_none() && self.max_months.is_none()
    }

    /// Keep the most permissive lower bound.
    pub fn observe_min(&mut self, months: u32) {
        self.min_months = Some(self.min_months.map_or(months, |m| m.min(months)));
    }

    /// Keep the loosest upper bound.
    pub fn observe_max(&mut self, months: u32) {
        self.max_months = Some(self.max_months.map_or(months, |m| m.max(months)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let span = AgeSpan::default();
        assert!(span.is_empty());
        assert_eq!(span, AgeSpan::new(None, None));
    }

    #[test]
    fn observe_min_keeps_smallest() {
        let mut span = AgeSpan::default();
        span.observe_min(36);
        span.observe_min(6);
        span.observe_min(120);
        assert_eq!(span.min_months, Some(6));
        assert_eq!(span.max_months, None);
    }

    #[test]
    fn observe_max_keeps_largest() {
        let mut span = AgeSpan::default();
        span.observe_max(18);
        span.observe_max(216);
        span.observe_max(24);
        assert_eq!(span.max_months, Some(216));
        assert!(!span.is_empty());
    }
}
