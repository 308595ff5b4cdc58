//! Repair of OCR-damaged analyte names (`Creatiniue`, `Hemoglobln`).
//!
//! The vocabulary comes from the catalog itself: correction targets are
//! the words of each entry's display name, and a word that already reads
//! as a catalog alias is never touched. A word is only rewritten when it
//! sits close to exactly one target and is not itself a known analyte the
//! catalog does not cover (`Cadmium` must not become `Calcium`).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::catalog::{ParameterDefinition, DEFINITIONS};

/// Shorter words are too easy to confuse with one another.
const MIN_WORD_CHARS: usize = 5;
/// Targets up to this length only accept a single edit.
const SHORT_TERM_CHARS: usize = 7;

/// Real analytes outside the catalog that sit near a catalog word.
const OTHER_ANALYTES: &[&str] = &[
    "amylase", "arsenic", "bicarbonate", "cadmium", "chlorine", "chromium",
    "cobalt", "copper", "cortisol", "creatine", "estradiol", "estrogen",
    "fibrinogen", "fluoride", "folate", "globulin", "haptoglobin", "indirect",
    "insulin", "lactate", "lipase", "lithium", "mercury", "myoglobin",
    "phosphate", "phosphorus", "prolactin", "selenium", "thallium",
];

static STANDARD: LazyLock<Vocabulary> = LazyLock::new(|| Vocabulary::from_definitions(DEFINITIONS));

/// Correction targets and protected words derived from a catalog.
#[derive(Debug)]
pub struct Vocabulary {
    targets: Vec<String>,
    protected: HashSet<String>,
    /// Whole-word match against any alias (`haemoglobin`, `leucocytes`).
    alias_word: Option<Regex>,
}

impl Vocabulary {
    /// The vocabulary of the standard catalog.
    pub fn standard() -> &'static Vocabulary {
        &STANDARD
    }

    pub fn from_definitions(definitions: &[ParameterDefinition]) -> Self {
        let mut targets: Vec<String> = definitions
            .iter()
            .flat_map(|d| letter_runs(d.display_name))
            .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
            .collect();
        targets.sort();
        targets.dedup();

        let mut protected: HashSet<String> = definitions
            .iter()
            .flat_map(|d| letter_runs(d.aliases()))
            .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
            .collect();
        protected.extend(targets.iter().cloned());
        protected.extend(OTHER_ANALYTES.iter().map(|w| w.to_string()));

        let alternation = definitions
            .iter()
            .map(|d| format!("(?:{})", d.aliases()))
            .collect::<Vec<_>>()
            .join("|");
        let alias_word = Regex::new(&format!("(?i)^(?:{alternation})$"))
            .map_err(|e| tracing::warn!(error = %e, "Alias vocabulary failed to compile"))
            .ok();

        Self {
            targets,
            protected,
            alias_word,
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// The corrected spelling of `word`, or `None` to keep it as written.
    pub fn correct(&self, word: &str) -> Option<String> {
        if word.chars().count() < MIN_WORD_CHARS
            || word.starts_with(|c: char| c.is_ascii_digit())
        {
            return None;
        }

        let lower = word.to_lowercase();
        if self.protected.contains(&lower)
            || self.alias_word.as_ref().is_some_and(|re| re.is_match(&lower))
        {
            return None;
        }

        let mut best: Option<(&str, usize)> = None;
        let mut tied = false;
        for target in &self.targets {
            let limit = if target.chars().count() <= SHORT_TERM_CHARS { 1 } else { 2 };
            let Some(distance) = bounded_distance(&lower, target, limit) else {
                continue;
            };
            match best {
                Some((_, d)) if distance > d => {}
                Some((_, d)) if distance == d => tied = true,
                _ => {
                    best = Some((target.as_str(), distance));
                    tied = false;
                }
            }
        }

        match best {
            Some((target, _)) if !tied => {
                tracing::trace!(from = word, to = target, "Analyte name corrected");
                Some(match_case(word, target))
            }
            _ => None,
        }
    }
}

/// Apply analyte-name correction to report text. Everything other than
/// corrected words is copied through unchanged.
pub fn correct_analyte_names(text: &str) -> String {
    let vocabulary = Vocabulary::standard();
    let mut out = String::with_capacity(text.len());

    for piece in text.split_inclusive(|c: char| !c.is_alphanumeric()) {
        let word_len = piece.trim_end_matches(|c: char| !c.is_alphanumeric()).len();
        let (word, delimiter) = piece.split_at(word_len);
        match vocabulary.correct(word) {
            Some(fixed) => out.push_str(&fixed),
            None => out.push_str(word),
        }
        out.push_str(delimiter);
    }

    out
}

/// Lowercase ASCII letter runs of `source`; regex syntax acts as a separator.
fn letter_runs(source: &str) -> impl Iterator<Item = String> + '_ {
    source
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .map(str::to_lowercase)
}

/// Render `target` in the capitalization style of `written`.
fn match_case(written: &str, target: &str) -> String {
    let mut letters = written.chars().filter(|c| c.is_alphabetic());
    let first_upper = letters.next().is_some_and(char::is_uppercase);
    if first_upper && letters.all(char::is_uppercase) {
        return target.to_uppercase();
    }
    if !first_upper {
        return target.to_string();
    }
    let mut chars = target.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Levenshtein distance between `a` and `b` if it does not exceed `limit`.
fn bounded_distance(a: &str, b: &str, limit: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > limit {
        return None;
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
            row_min = row_min.min(row[j + 1]);
        }
        if row_min > limit {
            return None;
        }
    }

    let distance = row[b.len()];
    (distance <= limit).then_some(distance)
}
