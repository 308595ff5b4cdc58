//! Applies one compiled catalog entry to report text.
//!
//! Scanning is read-only: entries never consume text from one another,
//! so overlapping matches across entries are expected.

use std::sync::LazyLock;

use regex::Regex;

use super::catalog::{CompiledParameter, PatternKind};
use crate::models::report::MeasuredValue;

/// Text right after a captured number that marks it as part of the label
/// (`Glucose 2 hr PP`, `1st hour`) rather than a measurement.
static LABEL_DIGIT_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\s*(?:hrs?|hours?|h|mins?|minutes?)|st|nd|rd|th)\b")
        .map_err(|e| tracing::warn!(error = %e, "Label-digit pattern failed to compile"))
        .ok()
});

/// Find the first occurrence of `entry` in `text` and parse its value.
///
/// Occurrences directly preceded by one of the entry's excluded qualifiers
/// are passed over, as are numbers that belong to the label (`2 hr`).
/// A capture that does not parse as a number yields `None` for this
/// entry only.
pub fn match_parameter(text: &str, entry: &CompiledParameter) -> Option<MeasuredValue> {
    let definition = entry.definition;
    let caps = entry.regex.captures_iter(text).find(|caps| {
        caps.get(0).is_some_and(|m| {
            !is_qualified(text, m.start(), definition.excluded_qualifiers)
                && !is_label_digit(&text[m.end()..])
        })
    })?;

    let value = match definition.pattern {
        PatternKind::Single { scale, .. } => {
            let raw = caps.get(1)?.as_str();
            parse_number(raw).map(|v| MeasuredValue::Single(scale.apply(v)))
        }
        PatternKind::Pair { .. } => {
            let systolic = caps.get(1).and_then(|m| m.as_str().parse::<u16>().ok());
            let diastolic = caps.get(2).and_then(|m| m.as_str().parse::<u16>().ok());
            match (systolic, diastolic) {
                (Some(systolic), Some(diastolic)) => Some(MeasuredValue::Pair {
                    systolic,
                    diastolic,
                }),
                _ => None,
            }
        }
    };

    if value.is_none() {
        tracing::debug!(
            key = %definition.key,
            capture = caps.get(0).map(|m| m.as_str()).unwrap_or_default(),
            "Unparseable value, parameter skipped"
        );
    }
    value
}

/// Whether the word right before `start` is one of `qualifiers`.
fn is_qualified(text: &str, start: usize, qualifiers: &[&str]) -> bool {
    if qualifiers.is_empty() {
        return false;
    }
    let before = text[..start].trim_end_matches(|c: char| c.is_whitespace() || c == '-');
    let word_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphabetic())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    let word = before[word_start..].to_lowercase();
    !word.is_empty() && qualifiers.iter().any(|q| *q == word)
}

/// Whether the text following a captured number turns it into a label part.
fn is_label_digit(rest: &str) -> bool {
    LABEL_DIGIT_SUFFIX
        .as_ref()
        .is_some_and(|re| re.is_match(rest))
}

/// Parse a captured number, tolerating thousands separators (`250,000`)
/// and a decimal comma (`13,5`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = match (raw.contains(','), raw.contains('.')) {
        (false, _) => raw.to_string(),
        (true, true) => raw.replace(',', ""),
        (true, false) => {
            let groups: Vec<&str> = raw.split(',').collect();
            if groups[1..].iter().all(|g| g.len() == 3) {
                groups.concat()
            } else if groups.len() == 2 {
                raw.replace(',', ".")
            } else {
                return None;
            }
        }
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
