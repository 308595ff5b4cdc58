use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is also the serde representation.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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
    };
}

str_enum!(ParameterStatus {
    Normal => "Normal",
    Low => "Low",
    Moderate => "Moderate",
    High => "High",
    Critical => "Critical",
});

impl ParameterStatus {
    /// Anything other than `Normal` is surfaced to the reader.
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

str_enum!(ExtractionProfile {
    Basic => "basic",
    Comprehensive => "comprehensive",
});

impl ExtractionProfile {
    /// Whether an entry whose minimum profile is `required` is active under `self`.
    pub fn includes(&self, required: ExtractionProfile) -> bool {
        match self {
            Self::Comprehensive => true,
            Self::Basic => required == Self::Basic,
        }
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::Comprehensive
    }
}

str_enum!(ParameterCategory {
    BloodCount => "complete_blood_count",
    Lipids => "lipid_profile",
    Liver => "liver_function",
    Kidney => "kidney_function",
    Electrolytes => "electrolytes",
    Thyroid => "thyroid_function",
    Diabetes => "diabetes",
    VitaminsMinerals => "vitamins_minerals",
    Inflammatory => "inflammatory",
    Cardiac => "cardiac",
    Vitals => "vital_signs",
});

str_enum!(ParameterKey {
    // Complete blood count
    Hemoglobin => "hemoglobin",
    Rbc => "rbc",
    Wbc => "wbc",
    Platelets => "platelets",
    Hematocrit => "hematocrit",
    Mcv => "mcv",
    Mch => "mch",
    Mchc => "mchc",
    Rdw => "rdw",
    // Lipid profile
    TotalCholesterol => "total_cholesterol",
    Ldl => "ldl",
    Hdl => "hdl",
    Triglycerides => "triglycerides",
    Vldl => "vldl",
    // Liver function
    Alt => "alt",
    Ast => "ast",
    Alp => "alp",
    Ggt => "ggt",
    TotalBilirubin => "total_bilirubin",
    DirectBilirubin => "direct_bilirubin",
    Albumin => "albumin",
    TotalProtein => "total_protein",
    // Kidney function
    Creatinine => "creatinine",
    Bun => "bun",
    UricAcid => "uric_acid",
    Egfr => "egfr",
    // Electrolytes
    Sodium => "sodium",
    Potassium => "potassium",
    Chloride => "chloride",
    Calcium => "calcium",
    Magnesium => "magnesium",
    // Thyroid function
    Tsh => "tsh",
    FreeT4 => "free_t4",
    FreeT3 => "free_t3",
    // Diabetes markers
    Glucose => "glucose",
    Hba1c => "hba1c",
    // Vitamins and minerals
    VitaminD => "vitamin_d",
    VitaminB12 => "vitamin_b12",
    Iron => "iron",
    Ferritin => "ferritin",
    // Inflammatory markers
    Crp => "crp",
    Esr => "esr",
    // Cardiac markers
    Troponin => "troponin",
    Bnp => "bnp",
    // Composite
    BloodPressure => "blood_pressure",
});
