//! Folds classified parameters into a bounded score and a summary.

use crate::models::enums::ParameterStatus;
use crate::models::report::{ExtractedParameter, HealthReportResult};

/// Starting score before any deduction.
pub const BASELINE_SCORE: i32 = 85;

const MIN_SCORE: i32 = 0;
const MAX_SCORE: i32 = 100;

/// Points removed from the running score for one parameter.
///
/// `High` is flagged but carries no penalty (HDL above range).
pub fn deduction(status: ParameterStatus) -> i32 {
    match status {
        ParameterStatus::Critical => 15,
        ParameterStatus::Moderate => 8,
        ParameterStatus::Low => 6,
        ParameterStatus::High | ParameterStatus::Normal => 0,
    }
}

/// Accumulates parameters in the order they are recorded.
#[derive(Debug)]
pub struct ScoreAggregator {
    score: i32,
    parameters: Vec<ExtractedParameter>,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::with_baseline(BASELINE_SCORE)
    }
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(baseline: i32) -> Self {
        Self {
            score: baseline,
            parameters: Vec::new(),
        }
    }

    /// Apply the parameter's deduction and keep it for the result.
    pub fn record(&mut self, parameter: ExtractedParameter) {
        self.score -= deduction(parameter.status);
        self.parameters.push(parameter);
    }

    /// Running score, unclamped.
    pub fn raw_score(&self) -> i32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Clamp the score and build the result. With nothing recorded the
    /// result carries a single placeholder parameter.
    pub fn finish(self) -> HealthReportResult {
        let health_score = clamp_score(self.score);

        if self.parameters.is_empty() {
            return HealthReportResult {
                health_score,
                parameters: vec![ExtractedParameter::placeholder()],
                summary: format!(
                    "No recognizable health parameters were found in the report text. \
                     Overall health score: {health_score}/100."
                ),
            };
        }

        let summary = summarize(&self.parameters, health_score);
        HealthReportResult {
            health_score,
            parameters: self.parameters,
            summary,
        }
    }
}

pub fn clamp_score(score: i32) -> u8 {
    // Bounded to 0..=100, always fits.
    score.clamp(MIN_SCORE, MAX_SCORE) as u8
}

fn summarize(parameters: &[ExtractedParameter], health_score: u8) -> String {
    let count = parameters.len();
    let flagged = parameters.iter().filter(|p| p.status.is_flagged()).count();
    let critical = parameters
        .iter()
        .filter(|p| p.status == ParameterStatus::Critical)
        .count();

    let noun = if count == 1 { "parameter" } else { "parameters" };
    let mut summary = format!(
        "Analyzed {count} health {noun} from your report. Overall health score: {health_score}/100."
    );
    if flagged > 0 {
        let (noun, verb) = if flagged == 1 {
            ("parameter", "needs")
        } else {
            ("parameters", "need")
        };
        summary.push_str(&format!(
            " {flagged} {noun} {verb} attention ({critical} critical)."
        ));
    }
    summary
}
