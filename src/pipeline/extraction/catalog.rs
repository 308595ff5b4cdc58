//! Static registry of recognized report parameters.
//!
//! Each definition carries an alias alternation (regex fragment). The
//! full recognition pattern is assembled here so every entry shares the
//! same tolerance for separators, parenthetical abbreviations and
//! comparators in front of the number.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::CatalogError;
use crate::models::enums::{ExtractionProfile, ParameterCategory, ParameterKey};

/// Optional `(abbrev)` between the name and the value, e.g. `ALT (SGPT): 45`.
const PAREN_GAP: &str = r"(?:\s*\([^)\n]{0,24}\))?";
/// Colon, equals, dash, dot leaders, an abbreviation dot (`Hb. 13`) or
/// plain whitespace. A dot glued to a digit belongs to the number (`.9`).
const SEPARATOR: &str = r"(?:[\s:=\-]|\.{2,}|\.\s){0,16}";
/// Integer or decimal, including `.9` without a leading zero, with
/// optional thousands/decimal commas.
const NUMBER: &str = r"(\d*\.?\d+(?:[.,]\d+)*)";

/// How a captured number is brought back to the catalog unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Identity,
    /// Counts written per microlitre: values at or above `threshold`
    /// are divided by `divisor`.
    CountPerMicrolitre { threshold: f64, divisor: f64 },
}

impl Scale {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Scale::Identity => value,
            Scale::CountPerMicrolitre { threshold, divisor } => {
                if value >= threshold {
                    value / divisor
                } else {
                    value
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PatternKind {
    Single {
        aliases: &'static str,
        scale: Scale,
    },
    /// Two integers separated by `/` (systolic/diastolic).
    Pair { aliases: &'static str },
}

#[derive(Debug)]
pub struct ParameterDefinition {
    pub key: ParameterKey,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub category: ParameterCategory,
    /// Smallest profile that includes this entry.
    pub profile: ExtractionProfile,
    pub pattern: PatternKind,
    /// Words that, directly in front of an alias, name a different analyte
    /// (`Non-HDL`, `Mean Corpuscular Hemoglobin`).
    pub excluded_qualifiers: &'static [&'static str],
}

impl ParameterDefinition {
    const fn excluding(mut self, qualifiers: &'static [&'static str]) -> Self {
        self.excluded_qualifiers = qualifiers;
        self
    }

    /// The alias alternation this entry recognizes.
    pub fn aliases(&self) -> &'static str {
        match self.pattern {
            PatternKind::Single { aliases, .. } | PatternKind::Pair { aliases } => aliases,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.pattern, PatternKind::Pair { .. })
    }

    /// Assemble the case-insensitive recognition pattern.
    pub fn pattern_source(&self) -> String {
        match self.pattern {
            PatternKind::Single { aliases, .. } => {
                format!(r"(?i)\b(?:{aliases}){PAREN_GAP}{SEPARATOR}[<>]?=?\s*{NUMBER}")
            }
            PatternKind::Pair { aliases } => {
                format!(r"(?i)\b(?:{aliases}){PAREN_GAP}{SEPARATOR}(\d{{2,3}})\s*/\s*(\d{{2,3}})")
            }
        }
    }
}

const fn single(
    key: ParameterKey,
    display_name: &'static str,
    unit: &'static str,
    category: ParameterCategory,
    profile: ExtractionProfile,
    aliases: &'static str,
) -> ParameterDefinition {
    ParameterDefinition {
        key,
        display_name,
        unit,
        category,
        profile,
        pattern: PatternKind::Single {
            aliases,
            scale: Scale::Identity,
        },
        excluded_qualifiers: &[],
    }
}

const fn counted(
    key: ParameterKey,
    display_name: &'static str,
    unit: &'static str,
    aliases: &'static str,
    threshold: f64,
    divisor: f64,
) -> ParameterDefinition {
    ParameterDefinition {
        key,
        display_name,
        unit,
        category: ParameterCategory::BloodCount,
        profile: ExtractionProfile::Basic,
        pattern: PatternKind::Single {
            aliases,
            scale: Scale::CountPerMicrolitre { threshold, divisor },
        },
        excluded_qualifiers: &[],
    }
}

use ExtractionProfile::{Basic, Comprehensive};
use ParameterCategory as Cat;
use ParameterKey as K;

/// Catalog iteration order is the order of this table.
pub static DEFINITIONS: &[ParameterDefinition] = &[
    // Complete blood count
    single(K::Hemoglobin, "Hemoglobin", "g/dL", Cat::BloodCount, Basic,
        r"ha?emoglobin|hgb|hb")
        .excluding(&["corpuscular", "glycated", "glycosylated", "cell"]),
    counted(K::Rbc, "RBC", "million/µL",
        r"rbc(?:\s+count)?|red\s+blood\s+cells?(?:\s+count)?|erythrocytes?(?:\s+count)?",
        100_000.0, 1_000_000.0),
    counted(K::Wbc, "WBC", "thousand/µL",
        r"wbc(?:\s+count)?|white\s+blood\s+cells?(?:\s+count)?|leu[ck]ocytes?(?:\s+count)?|total\s+leu[ck]ocyte\s+count|tlc",
        1_000.0, 1_000.0),
    counted(K::Platelets, "Platelets", "thousand/µL",
        r"platelets?(?:\s+count)?|plt|thrombocytes?",
        5_000.0, 1_000.0),
    single(K::Hematocrit, "Hematocrit", "%", Cat::BloodCount, Basic,
        r"ha?ematocrit|hct|pcv|packed\s+cell\s+volume"),
    single(K::Mcv, "MCV", "fL", Cat::BloodCount, Comprehensive,
        r"mcv|mean\s+corpuscular\s+volume"),
    single(K::Mch, "MCH", "pg", Cat::BloodCount, Comprehensive,
        r"mch|mean\s+corpuscular\s+ha?emoglobin"),
    single(K::Mchc, "MCHC", "g/dL", Cat::BloodCount, Comprehensive,
        r"mchc|mean\s+corpuscular\s+ha?emoglobin\s+concentration"),
    single(K::Rdw, "RDW", "%", Cat::BloodCount, Comprehensive,
        r"rdw(?:[\s-]*cv)?|red\s+cell\s+distribution\s+width"),
    // Lipid profile
    single(K::TotalCholesterol, "Total Cholesterol", "mg/dL", Cat::Lipids, Basic,
        r"total\s+cholesterol|cholesterol\s*,?\s*total|serum\s+cholesterol"),
    single(K::Ldl, "LDL Cholesterol", "mg/dL", Cat::Lipids, Basic,
        r"ldl(?:[\s-]*c(?:holesterol)?)?|low[\s-]density\s+lipoprotein(?:\s+cholesterol)?"),
    single(K::Hdl, "HDL Cholesterol", "mg/dL", Cat::Lipids, Basic,
        r"hdl(?:[\s-]*c(?:holesterol)?)?|high[\s-]density\s+lipoprotein(?:\s+cholesterol)?")
        .excluding(&["non"]),
    single(K::Triglycerides, "Triglycerides", "mg/dL", Cat::Lipids, Basic,
        r"triglycerides?|trigs|tg"),
    single(K::Vldl, "VLDL Cholesterol", "mg/dL", Cat::Lipids, Comprehensive,
        r"vldl(?:[\s-]*c(?:holesterol)?)?|very[\s-]low[\s-]density\s+lipoprotein"),
    // Liver function
    single(K::Alt, "ALT (SGPT)", "U/L", Cat::Liver, Basic,
        r"alt|sgpt|alanine\s+(?:amino)?transaminase|alanine\s+aminotransferase"),
    single(K::Ast, "AST (SGOT)", "U/L", Cat::Liver, Basic,
        r"ast|sgot|aspartate\s+(?:amino)?transaminase|aspartate\s+aminotransferase"),
    single(K::Alp, "Alkaline Phosphatase", "U/L", Cat::Liver, Comprehensive,
        r"alp|alkaline\s+phosphatase"),
    single(K::Ggt, "GGT", "U/L", Cat::Liver, Comprehensive,
        r"ggt|gamma[\s-]?gt|gamma[\s-]?glutamyl\s+transferase"),
    single(K::TotalBilirubin, "Total Bilirubin", "mg/dL", Cat::Liver, Comprehensive,
        r"total\s+bilirubin|bilirubin\s*,?\s*total|t\.?\s*bil"),
    single(K::DirectBilirubin, "Direct Bilirubin", "mg/dL", Cat::Liver, Comprehensive,
        r"direct\s+bilirubin|bilirubin\s*,?\s*direct|conjugated\s+bilirubin|d\.?\s*bil"),
    single(K::Albumin, "Albumin", "g/dL", Cat::Liver, Comprehensive,
        r"(?:serum\s+)?albumin")
        .excluding(&["urine", "urinary"]),
    single(K::TotalProtein, "Total Protein", "g/dL", Cat::Liver, Comprehensive,
        r"total\s+protein|protein\s*,?\s*total"),
    // Kidney function
    single(K::Creatinine, "Creatinine", "mg/dL", Cat::Kidney, Basic,
        r"(?:serum\s+)?creatinine|creat")
        .excluding(&["urine", "urinary"]),
    single(K::Bun, "Blood Urea Nitrogen", "mg/dL", Cat::Kidney, Basic,
        r"bun|blood\s+urea\s+nitrogen|urea\s+nitrogen"),
    single(K::UricAcid, "Uric Acid", "mg/dL", Cat::Kidney, Comprehensive,
        r"(?:serum\s+)?uric\s+acid|urate"),
    single(K::Egfr, "eGFR", "mL/min/1.73m²", Cat::Kidney, Comprehensive,
        r"e?gfr|estimated\s+glomerular\s+filtration\s+rate"),
    // Electrolytes
    single(K::Sodium, "Sodium", "mmol/L", Cat::Electrolytes, Comprehensive,
        r"(?:serum\s+)?sodium|na\+"),
    single(K::Potassium, "Potassium", "mmol/L", Cat::Electrolytes, Comprehensive,
        r"(?:serum\s+)?potassium|k\+"),
    single(K::Chloride, "Chloride", "mmol/L", Cat::Electrolytes, Comprehensive,
        r"(?:serum\s+)?chloride|cl-"),
    single(K::Calcium, "Calcium", "mg/dL", Cat::Electrolytes, Comprehensive,
        r"(?:serum\s+|total\s+)?calcium")
        .excluding(&["ionized", "ionised", "urine"]),
    single(K::Magnesium, "Magnesium", "mg/dL", Cat::Electrolytes, Comprehensive,
        r"(?:serum\s+)?magnesium"),
    // Thyroid function
    single(K::Tsh, "TSH", "mIU/L", Cat::Thyroid, Basic,
        r"tsh|thyroid\s+stimulating\s+hormone|thyrotropin"),
    single(K::FreeT4, "Free T4", "ng/dL", Cat::Thyroid, Comprehensive,
        r"free\s*t4|ft4|free\s+thyroxine"),
    single(K::FreeT3, "Free T3", "pg/mL", Cat::Thyroid, Comprehensive,
        r"free\s*t3|ft3|free\s+triiodothyronine"),
    // Diabetes markers
    single(K::Glucose, "Glucose", "mg/dL", Cat::Diabetes, Basic,
        r"(?:fasting\s+)?(?:blood\s+|plasma\s+|serum\s+)?glucose(?:\s*,?\s*fasting)?|fasting\s+blood\s+sugar|blood\s+sugar|fbs|fpg")
        .excluding(&["urine", "urinary"]),
    single(K::Hba1c, "HbA1c", "%", Cat::Diabetes, Basic,
        r"hba1c|hb\s*a1c|a1c|glycated\s+ha?emoglobin|glycosylated\s+ha?emoglobin|ha?emoglobin\s+a1c"),
    // Vitamins and minerals
    single(K::VitaminD, "Vitamin D", "ng/mL", Cat::VitaminsMinerals, Basic,
        r"vitamin\s*d[23]?(?:\s*,?\s*25[\s-]?(?:oh|hydroxy))?|25[\s-]?(?:oh|hydroxy)\s*(?:vitamin\s*)?d[23]?|vit\.?\s*d[23]?|calcidiol"),
    single(K::VitaminB12, "Vitamin B12", "pg/mL", Cat::VitaminsMinerals, Basic,
        r"vitamin\s*b[\s-]?12|vit\.?\s*b[\s-]?12|(?:cyano)?cobalamin"),
    single(K::Iron, "Serum Iron", "µg/dL", Cat::VitaminsMinerals, Comprehensive,
        r"(?:serum\s+)?iron"),
    single(K::Ferritin, "Ferritin", "ng/mL", Cat::VitaminsMinerals, Comprehensive,
        r"(?:serum\s+)?ferritin"),
    // Inflammatory markers
    single(K::Crp, "C-Reactive Protein", "mg/L", Cat::Inflammatory, Comprehensive,
        r"(?:hs[\s-]?)?crp|c[\s-]?reactive\s+protein"),
    single(K::Esr, "ESR", "mm/hr", Cat::Inflammatory, Comprehensive,
        r"esr|erythrocyte\s+sedimentation\s+rate|sed\s+rate"),
    // Cardiac markers
    single(K::Troponin, "Troponin", "ng/mL", Cat::Cardiac, Comprehensive,
        r"(?:hs[\s-]?)?troponin(?:\s*[it])?|ctn[it]"),
    single(K::Bnp, "BNP", "pg/mL", Cat::Cardiac, Comprehensive,
        r"bnp|b[\s-]type\s+natriuretic\s+peptide|brain\s+natriuretic\s+peptide"),
    // Composite, handled outside the single-value loop
    ParameterDefinition {
        key: K::BloodPressure,
        display_name: "Blood Pressure",
        unit: "mmHg",
        category: Cat::Vitals,
        profile: Basic,
        pattern: PatternKind::Pair {
            aliases: r"blood\s+pressure|bp",
        },
        excluded_qualifiers: &[],
    },
];

/// A definition paired with its compiled pattern.
#[derive(Debug)]
pub struct CompiledParameter {
    pub definition: &'static ParameterDefinition,
    pub(crate) regex: Regex,
}

impl CompiledParameter {
    pub fn compile(definition: &'static ParameterDefinition) -> Result<Self, CatalogError> {
        let regex =
            Regex::new(&definition.pattern_source()).map_err(|source| CatalogError::InvalidPattern {
                key: definition.key.as_str().to_string(),
                source,
            })?;
        Ok(Self { definition, regex })
    }
}

/// The immutable, compiled parameter registry.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CompiledParameter>,
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| Catalog::build_lenient(DEFINITIONS));

impl Catalog {
    /// The process-wide catalog built from [`DEFINITIONS`].
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Compile every definition, failing on the first bad pattern or
    /// duplicated key.
    pub fn build(definitions: &'static [ParameterDefinition]) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if !seen.insert(definition.key) {
                return Err(CatalogError::DuplicateKey(definition.key.as_str().to_string()));
            }
            entries.push(CompiledParameter::compile(definition)?);
        }
        Ok(Self { entries })
    }

    /// Compile what compiles. A broken or duplicated entry is logged and
    /// dropped so the rest of the catalog keeps working.
    pub fn build_lenient(definitions: &'static [ParameterDefinition]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if !seen.insert(definition.key) {
                tracing::warn!(key = %definition.key, "Duplicate catalog key, entry dropped");
                continue;
            }
            match CompiledParameter::compile(definition) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(key = %definition.key, error = %e, "Catalog entry dropped"),
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries active under `profile`, in catalog order.
    pub fn entries(
        &self,
        profile: ExtractionProfile,
    ) -> impl Iterator<Item = &CompiledParameter> + '_ {
        self.entries
            .iter()
            .filter(move |e| profile.includes(e.definition.profile))
    }

    /// Single-value entries active under `profile`.
    pub fn single_value(
        &self,
        profile: ExtractionProfile,
    ) -> impl Iterator<Item = &CompiledParameter> + '_ {
        self.entries(profile).filter(|e| !e.definition.is_composite())
    }

    /// The composite blood-pressure entry, if active under `profile`.
    pub fn blood_pressure(&self, profile: ExtractionProfile) -> Option<&CompiledParameter> {
        self.entries(profile)
            .find(|e| e.definition.key == ParameterKey::BloodPressure)
    }

    pub fn get(&self, key: ParameterKey) -> Option<&CompiledParameter> {
        self.entries.iter().find(|e| e.definition.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_definition_compiles() {
        let catalog = Catalog::build(DEFINITIONS).unwrap();
        assert_eq!(catalog.len(), DEFINITIONS.len());
        assert_eq!(Catalog::standard().len(), DEFINITIONS.len());
    }

    #[test]
    fn catalog_size_and_unique_keys() {
        assert_eq!(DEFINITIONS.len(), 45);
        let keys: HashSet<_> = DEFINITIONS.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), DEFINITIONS.len());
    }

    #[test]
    fn every_key_has_a_definition() {
        for key in ParameterKey::ALL {
            assert!(
                DEFINITIONS.iter().any(|d| d.key == *key),
                "missing definition for {key}"
            );
        }
    }

    #[test]
    fn blood_pressure_is_the_only_composite() {
        let composites: Vec<_> = DEFINITIONS.iter().filter(|d| d.is_composite()).collect();
        assert_eq!(composites.len(), 1);
        assert_eq!(composites[0].key, ParameterKey::BloodPressure);
    }

    #[test]
    fn basic_profile_is_a_subset() {
        let catalog = Catalog::standard();
        let basic = catalog.entries(ExtractionProfile::Basic).count();
        let full = catalog.entries(ExtractionProfile::Comprehensive).count();
        assert_eq!(basic, 19);
        assert_eq!(full, 45);
        assert!(catalog
            .single_value(ExtractionProfile::Basic)
            .all(|e| e.definition.profile == ExtractionProfile::Basic));
        assert!(catalog.blood_pressure(ExtractionProfile::Basic).is_some());
        assert!(catalog.get(ParameterKey::Ferritin).is_some());
        assert!(catalog
            .entries(ExtractionProfile::Basic)
            .all(|e| e.definition.key != ParameterKey::Ferritin));
    }

    #[test]
    fn blood_pressure_is_last() {
        let last = DEFINITIONS.last().unwrap();
        assert_eq!(last.key, ParameterKey::BloodPressure);
    }

    #[test]
    fn duplicate_key_rejected_by_strict_build() {
        static DUPES: &[ParameterDefinition] = &[
            single(K::Tsh, "TSH", "mIU/L", Cat::Thyroid, Basic, "tsh"),
            single(K::Tsh, "TSH again", "mIU/L", Cat::Thyroid, Basic, "thyrotropin"),
        ];
        let err = Catalog::build(DUPES).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(ref k) if k == "tsh"));
        assert_eq!(Catalog::build_lenient(DUPES).len(), 1);
    }

    #[test]
    fn bad_pattern_dropped_by_lenient_build() {
        static BROKEN: &[ParameterDefinition] = &[
            single(K::Glucose, "Glucose", "mg/dL", Cat::Diabetes, Basic, "gluc(ose"),
            single(K::Tsh, "TSH", "mIU/L", Cat::Thyroid, Basic, "tsh"),
        ];
        assert!(matches!(
            Catalog::build(BROKEN),
            Err(CatalogError::InvalidPattern { .. })
        ));
        let lenient = Catalog::build_lenient(BROKEN);
        assert_eq!(lenient.len(), 1);
        assert!(lenient.get(ParameterKey::Tsh).is_some());
    }

    #[test]
    fn counts_per_microlitre_rescale() {
        let scale = Scale::CountPerMicrolitre {
            threshold: 5_000.0,
            divisor: 1_000.0,
        };
        assert_eq!(scale.apply(250_000.0), 250.0);
        assert_eq!(scale.apply(250.0), 250.0);
        assert_eq!(Scale::Identity.apply(7.5), 7.5);
    }
}
