//! Validation of report results produced outside the deterministic
//! pipeline (e.g. a generative summarizer returning the same JSON shape).
//!
//! [`ExternalResponseAnalyzer`] puts such a response in front of the
//! deterministic fallback: an unusable response falls through to extraction.

use serde::Deserialize;

use super::orchestrator::ReportAnalyzer;
use super::scoring::clamp_score;
use super::AnalyzerError;
use crate::models::report::{ExtractedParameter, HealthReportResult};

/// Parse an external result, bare or inside a ```` ```json ```` fence.
///
/// The score is rounded and clamped into range, parameters that do not
/// fit the shape (unknown status, missing name) are dropped, and an
/// empty parameter list is replaced by the placeholder entry.
pub fn parse_external_report(raw: &str) -> Result<HealthReportResult, AnalyzerError> {
    let json_str = extract_json_block(raw)?;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawReport {
        health_score: Option<f64>,
        parameters: Option<Vec<serde_json::Value>>,
        summary: Option<String>,
    }

    let report: RawReport =
        serde_json::from_str(json_str).map_err(|e| AnalyzerError::JsonParsing(e.to_string()))?;

    let score = report
        .health_score
        .filter(|s| s.is_finite())
        .ok_or_else(|| AnalyzerError::InvalidResult("missing healthScore".into()))?;

    let summary = report
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalyzerError::InvalidResult("missing summary".into()))?;

    let mut parameters = parse_parameters_lenient(report.parameters.as_deref());
    if parameters.is_empty() {
        parameters.push(ExtractedParameter::placeholder());
    }

    Ok(HealthReportResult {
        health_score: clamp_score(score.round() as i32),
        parameters,
        summary,
    })
}

/// A response obtained elsewhere for the report, validated on use.
#[derive(Debug, Clone)]
pub struct ExternalResponseAnalyzer {
    response: String,
}

impl ExternalResponseAnalyzer {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl ReportAnalyzer for ExternalResponseAnalyzer {
    fn name(&self) -> &str {
        "external"
    }

    fn analyze(&self, _text: &str) -> Result<HealthReportResult, AnalyzerError> {
        if self.response.trim().is_empty() {
            return Err(AnalyzerError::Unavailable("empty response".into()));
        }
        parse_external_report(&self.response)
    }
}

/// Locate the JSON object in a model response.
fn extract_json_block(response: &str) -> Result<&str, AnalyzerError> {
    if let Some(start) = response.find("```json") {
        let content_start = start + 7;
        let end = response[content_start..]
            .find("```")
            .ok_or_else(|| AnalyzerError::MalformedResponse("Unclosed JSON block".into()))?;
        return Ok(response[content_start..content_start + end].trim());
    }

    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&response[start..=end]),
        _ => Err(AnalyzerError::MalformedResponse("No JSON object found".into())),
    }
}

/// Keep the parameters that deserialize; log and drop the rest.
fn parse_parameters_lenient(items: Option<&[serde_json::Value]>) -> Vec<ExtractedParameter> {
    let Some(items) = items else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|v| match serde_json::from_value::<ExtractedParameter>(v.clone()) {
            Ok(p) if !p.name.trim().is_empty() => Some(p),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "External parameter dropped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ParameterStatus;
    use crate::pipeline::extraction::orchestrator::{
        analyze_with_fallback, AnalysisSource, DeterministicAnalyzer,
    };

    fn fenced_response() -> String {
        r#"Here is the analysis:

```json
{
  "healthScore": 72,
  "parameters": [
    {"name": "Hemoglobin", "value": "11.2 g/dL", "status": "Moderate", "unit": "g/dL", "normalRange": "12-16"},
    {"name": "HDL Cholesterol", "value": "65 mg/dL", "status": "High", "unit": "mg/dL"}
  ],
  "summary": "Mild anemia, otherwise stable."
}
```
"#
        .to_string()
    }

    #[test]
    fn parses_fenced_json() {
        let result = parse_external_report(&fenced_response()).unwrap();
        assert_eq!(result.health_score, 72);
        assert_eq!(result.parameters.len(), 2);
        assert_eq!(result.parameters[0].normal_range.as_deref(), Some("12-16"));
        assert_eq!(result.parameters[1].status, ParameterStatus::High);
        assert_eq!(result.summary, "Mild anemia, otherwise stable.");
    }

    #[test]
    fn parses_bare_json_with_prose_around() {
        let raw = r#"Result: {"healthScore": 90, "parameters": [], "summary": "ok"} done"#;
        let result = parse_external_report(raw).unwrap();
        assert_eq!(result.health_score, 90);
        assert_eq!(result.parameters.len(), 1);
        assert!(result.parameters[0].is_placeholder());
    }

    #[test]
    fn clamps_and_rounds_score() {
        let high = r#"{"healthScore": 130, "parameters": [], "summary": "s"}"#;
        assert_eq!(parse_external_report(high).unwrap().health_score, 100);
        let negative = r#"{"healthScore": -4, "parameters": [], "summary": "s"}"#;
        assert_eq!(parse_external_report(negative).unwrap().health_score, 0);
        let fractional = r#"{"healthScore": 71.6, "parameters": [], "summary": "s"}"#;
        assert_eq!(parse_external_report(fractional).unwrap().health_score, 72);
    }

    #[test]
    fn drops_parameters_with_unknown_status() {
        let raw = r#"{"healthScore": 80, "parameters": [
            {"name": "Glucose", "value": "140 mg/dL", "status": "Severe", "unit": "mg/dL"},
            {"name": "TSH", "value": "2 mIU/L", "status": "Normal", "unit": "mIU/L"}
        ], "summary": "s"}"#;
        let result = parse_external_report(raw).unwrap();
        assert_eq!(result.parameters.len(), 1);
        assert_eq!(result.parameters[0].name, "TSH");
    }

    #[test]
    fn missing_score_is_invalid() {
        let raw = r#"{"parameters": [], "summary": "s"}"#;
        assert!(matches!(
            parse_external_report(raw),
            Err(AnalyzerError::InvalidResult(_))
        ));
    }

    #[test]
    fn missing_summary_is_invalid() {
        let raw = r#"{"healthScore": 80, "parameters": [], "summary": "  "}"#;
        assert!(matches!(
            parse_external_report(raw),
            Err(AnalyzerError::InvalidResult(_))
        ));
    }

    #[test]
    fn no_json_is_malformed() {
        assert!(matches!(
            parse_external_report("I could not analyze this report."),
            Err(AnalyzerError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_external_report("```json\n{\"healthScore\": 1"),
            Err(AnalyzerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn external_response_feeds_the_fallback_chain() {
        let fallback = DeterministicAnalyzer::default();
        let primary = ExternalResponseAnalyzer::new(fenced_response());
        let analysis = analyze_with_fallback(Some(&primary), &fallback, "Hemoglobin: 9.5");
        assert_eq!(analysis.source, AnalysisSource::Primary);
        assert_eq!(analysis.result.health_score, 72);
        assert_eq!(analysis.result.parameters[0].normal_range.as_deref(), Some("12-16"));
    }

    #[test]
    fn unusable_response_falls_back_to_extraction() {
        let fallback = DeterministicAnalyzer::default();
        for response in ["", "Sorry, I cannot help with that.", "{\"healthScore\": 50}"] {
            let primary = ExternalResponseAnalyzer::new(response);
            let analysis = analyze_with_fallback(Some(&primary), &fallback, "Hemoglobin: 9.5");
            assert_eq!(analysis.source, AnalysisSource::Deterministic, "{response}");
            assert_eq!(analysis.result.health_score, 70);
        }
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            parse_external_report("{ not json }"),
            Err(AnalyzerError::JsonParsing(_))
        ));
    }
}
