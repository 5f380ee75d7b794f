use std::sync::LazyLock;

use regex::Regex;

use crate::models::age::{AgeSpan, MONTHS_PER_YEAR};

/// Which side of the age range a phrase constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// A compiled age phrase. Group 1 is the number, group 2 the unit.
struct AgePattern {
    regex: Regex,
    bound: Bound,
}

/// Whole or decimal number ("2", "1.5").
const NUMBER: &str = r"(\d+(?:\.\d+)?)";
const UNIT: &str = r"\s*(years?|yrs?|months?|mos?)\b";

static AGE_PATTERNS: LazyLock<Vec<AgePattern>> = LazyLock::new(|| {
    vec![
        // "minimum age 14 years", "minimum age of 6 months", "Minimum Age: 2 Years"
        pattern(r"\bminimum\s+age(?:\s+(?:of|is))?\s*[:=]?\s*", "", Bound::Min),
        // "age ≥ 2 years", "Age: >= 18 months"
        pattern(r"\bage\s*:?\s*(?:≥|>=|=>)\s*", "", Bound::Min),
        pattern(r"\bfrom\s+", "", Bound::Min),
        pattern(r"\bstarting\s+at\s+", "", Bound::Min),
        // "12 years and older", "6 months or older". The number must not
        // continue a longer number ("1.5" is never read as "5").
        pattern(
            r"(?:^|[^\d.])",
            r"\s+(?:of\s+age\s+)?(?:and|or)\s+older\b",
            Bound::Min,
        ),
        pattern(r"\bup\s+to\s+", "", Bound::Max),
        pattern(r"\bless\s+than\s+", "", Bound::Max),
        pattern(r"<\s*", "", Bound::Max),
    ]
});

/// Follow-up durations ("followed for up to 15 years") are not age limits.
static FOLLOW_UP_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfollow(?:ed|[\s-]*up)?(?:\s+(?:for|of|period))*\s*$")
        .expect("Invalid follow-up regex pattern")
});

fn pattern(prefix: &str, suffix: &str, bound: Bound) -> AgePattern {
    AgePattern {
        regex: Regex::new(&format!("(?i){prefix}{NUMBER}{UNIT}{suffix}"))
            .expect("Invalid age regex pattern"),
        bound,
    }
}

/// Scan free text for explicit participant-age mentions.
///
/// Reports the smallest lower bound and the largest upper bound found,
/// both in months. Bounds with no matching phrase stay `None`.
pub fn extract_age_span(text: &str) -> AgeSpan {
    let mut span = AgeSpan::default();

    for ap in AGE_PATTERNS.iter() {
        for caps in ap.regex.captures_iter(text) {
            let Some(months) = caps
                .get(1)
                .zip(caps.get(2))
                .and_then(|(n, unit)| to_months(n.as_str(), unit.as_str()))
            else {
                continue;
            };

            match ap.bound {
                Bound::Min => span.observe_min(months),
                Bound::Max => {
                    let start = caps.get(0).map_or(0, |m| m.start());
                    if FOLLOW_UP_CONTEXT.is_match(&text[..start]) {
                        tracing::trace!(months, "Skipping follow-up duration");
                        continue;
                    }
                    span.observe_max(months)
                }
            }
        }
    }

    span
}

/// Convert "N unit" to whole months, truncating any fraction
/// ("1.5 years" is 18 months, "2.5 months" is 2).
fn to_months(number: &str, unit: &str) -> Option<u32> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let whole: u32 = whole.parse().ok()?;
    let per_unit = if unit.to_lowercase().starts_with('y') {
        MONTHS_PER_YEAR
    } else {
        1
    };

    // Three fractional digits are plenty for an age.
    let digits = &fraction[..fraction.len().min(3)];
    let fraction_months = if digits.is_empty() {
        0
    } else {
        let value: u32 = digits.parse().ok()?;
        value * per_unit / 10u32.pow(digits.len() as u32)
    };

    whole.checked_mul(per_unit)?.checked_add(fraction_months)
}
