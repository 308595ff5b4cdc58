use serde::{Deserialize, Serialize};

use super::enums::ParameterStatus;

/// A numeric reading captured from report text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasuredValue {
    Single(f64),
    /// Blood pressure: the only composite reading.
    Pair { systolic: u16, diastolic: u16 },
}

impl MeasuredValue {
    /// Render the value the way it is shown to readers (`"9.5"`, `"145/95"`).
    pub fn display(&self) -> String {
        match self {
            Self::Single(v) => format!("{v}"),
            Self::Pair {
                systolic,
                diastolic,
            } => format!("{systolic}/{diastolic}"),
        }
    }
}

/// One recognized parameter in the response shape consumed downstream.
///
/// `normal_range` is only ever filled by an external analyzer; the
/// deterministic pipeline leaves it empty so its output stays a subset
/// of the richer shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParameter {
    pub name: String,
    pub value: String,
    pub status: ParameterStatus,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<String>,
    #[serde(skip)]
    pub raw: Option<MeasuredValue>,
}

impl ExtractedParameter {
    pub fn new(name: &str, unit: &str, raw: MeasuredValue, status: ParameterStatus) -> Self {
        Self {
            name: name.to_string(),
            value: format!("{} {}", raw.display(), unit),
            status,
            unit: unit.to_string(),
            normal_range: None,
            raw: Some(raw),
        }
    }

    /// Informational entry returned when nothing in the text was recognized.
    pub fn placeholder() -> Self {
        Self {
            name: "Report Processed".into(),
            value: "No recognizable parameters found".into(),
            status: ParameterStatus::Normal,
            unit: String::new(),
            normal_range: None,
            raw: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.raw.is_none() && *self == Self::placeholder()
    }
}

/// The single output of one extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReportResult {
    pub health_score: u8,
    pub parameters: Vec<ExtractedParameter>,
    pub summary: String,
}
