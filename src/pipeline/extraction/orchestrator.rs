//! Extraction pipeline: the single entry point callers use.
//!
//! Text preparation → per-entry match → classification → aggregation.
//! Every step is pure, so the same text always yields the same result,
//! and the pipeline is total over string input.

use serde::Serialize;

use super::catalog::{Catalog, CompiledParameter};
use super::classify::classify;
use super::matcher::match_parameter;
use super::medical_correction::correct_analyte_names;
use super::sanitize::sanitize_report_text;
use super::scoring::{clamp_score, ScoreAggregator};
use super::AnalyzerError;
use crate::models::enums::ExtractionProfile;
use crate::models::report::{ExtractedParameter, HealthReportResult};

/// Extract with the comprehensive catalog.
pub fn extract(text: &str) -> HealthReportResult {
    extract_with_profile(text, ExtractionProfile::Comprehensive)
}

/// Extract with the subset of the catalog selected by `profile`.
pub fn extract_with_profile(text: &str, profile: ExtractionProfile) -> HealthReportResult {
    extract_with_catalog(Catalog::standard(), text, profile)
}

pub fn extract_with_catalog(
    catalog: &Catalog,
    text: &str,
    profile: ExtractionProfile,
) -> HealthReportResult {
    let prepared = prepare_text(text);
    let mut aggregator = ScoreAggregator::new();

    for entry in catalog.single_value(profile) {
        if let Some(parameter) = extract_parameter(&prepared, entry) {
            aggregator.record(parameter);
        }
    }

    // Composite reading, handled after the single-value pass.
    if let Some(entry) = catalog.blood_pressure(profile) {
        if let Some(parameter) = extract_parameter(&prepared, entry) {
            aggregator.record(parameter);
        }
    }

    let result = aggregator.finish();
    tracing::debug!(
        profile = %profile,
        parameters = result.parameters.len(),
        score = result.health_score,
        "Report extracted"
    );
    result
}

/// Sanitize, then repair OCR-damaged analyte names.
pub fn prepare_text(text: &str) -> String {
    correct_analyte_names(&sanitize_report_text(text))
}

fn extract_parameter(text: &str, entry: &CompiledParameter) -> Option<ExtractedParameter> {
    let definition = entry.definition;
    let value = match_parameter(text, entry)?;
    let status = classify(definition.key, &value);
    Some(ExtractedParameter::new(
        definition.display_name,
        definition.unit,
        value,
        status,
    ))
}

// ═══════════════════════════════════════════════════════════
// Analyzer chain
// ═══════════════════════════════════════════════════════════

/// Something that turns report text into a result of the downstream shape.
pub trait ReportAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, text: &str) -> Result<HealthReportResult, AnalyzerError>;
}

/// The catalog-driven pipeline. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicAnalyzer {
    pub profile: ExtractionProfile,
}

impl DeterministicAnalyzer {
    pub fn new(profile: ExtractionProfile) -> Self {
        Self { profile }
    }

    pub fn run(&self, text: &str) -> HealthReportResult {
        extract_with_profile(text, self.profile)
    }
}

impl ReportAnalyzer for DeterministicAnalyzer {
    fn name(&self) -> &str {
        "deterministic"
    }

    fn analyze(&self, text: &str) -> Result<HealthReportResult, AnalyzerError> {
        Ok(self.run(text))
    }
}

/// Which analyzer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Primary,
    Deterministic,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Deterministic => "deterministic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub source: AnalysisSource,
    pub result: HealthReportResult,
}

/// Try `primary` first; on any error fall back to the deterministic
/// pipeline. Always returns a well-formed result.
pub fn analyze_with_fallback(
    primary: Option<&dyn ReportAnalyzer>,
    fallback: &DeterministicAnalyzer,
    text: &str,
) -> Analysis {
    if let Some(analyzer) = primary {
        match analyzer.analyze(text) {
            Ok(result) => {
                return Analysis {
                    source: AnalysisSource::Primary,
                    result: normalize_result(result),
                };
            }
            Err(e) => {
                tracing::warn!(
                    analyzer = analyzer.name(),
                    error = %e,
                    "Primary analyzer failed, using deterministic extraction"
                );
            }
        }
    }

    Analysis {
        source: AnalysisSource::Deterministic,
        result: fallback.run(text),
    }
}

/// Hold a foreign result to the same guarantees as the pipeline's own.
fn normalize_result(mut result: HealthReportResult) -> HealthReportResult {
    result.health_score = clamp_score(i32::from(result.health_score));
    if result.parameters.is_empty() {
        result.parameters.push(ExtractedParameter::placeholder());
    }
    result
}
