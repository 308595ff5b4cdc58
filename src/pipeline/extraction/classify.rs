//! Clinical severity tiers per parameter.
//!
//! Dispatch is on the catalog key, never on display-name substrings, so
//! "Total Cholesterol" and "HDL Cholesterol" can never pick up each
//! other's rule. Thresholds are inclusive on the flagged side where the
//! table uses `>=`/`<` boundaries (glucose 100 is Moderate, 126 Critical).

use crate::models::enums::{ParameterKey, ParameterStatus};
use crate::models::report::MeasuredValue;

use ParameterStatus::{Critical, High, Low, Moderate, Normal};

/// Assign a tier to a measured value. Parameters without a rule are
/// `Normal`; a composite value on a single-value key (or the reverse)
/// is also `Normal`.
pub fn classify(key: ParameterKey, value: &MeasuredValue) -> ParameterStatus {
    match *value {
        MeasuredValue::Single(v) => classify_single(key, v),
        MeasuredValue::Pair {
            systolic,
            diastolic,
        } if key == ParameterKey::BloodPressure => classify_blood_pressure(systolic, diastolic),
        MeasuredValue::Pair { .. } => Normal,
    }
}

fn classify_single(key: ParameterKey, v: f64) -> ParameterStatus {
    match key {
        ParameterKey::Rbc => outside(v, 4.0, 5.5, Moderate),
        ParameterKey::Wbc => outside(v, 4.0, 11.0, Moderate),
        ParameterKey::Platelets => {
            if v < 100.0 || v > 500.0 {
                Critical
            } else {
                outside(v, 150.0, 400.0, Moderate)
            }
        }
        ParameterKey::Hemoglobin => {
            if v < 10.0 || v > 18.0 {
                Critical
            } else {
                outside(v, 12.0, 16.0, Moderate)
            }
        }
        ParameterKey::Hematocrit => outside(v, 36.0, 48.0, Moderate),
        ParameterKey::TotalCholesterol => at_least(v, 200.0, 240.0),
        ParameterKey::Ldl => at_least(v, 130.0, 160.0),
        ParameterKey::Hdl => {
            if v < 40.0 {
                Low
            } else if v > 60.0 {
                High
            } else {
                Normal
            }
        }
        ParameterKey::Triglycerides => at_least(v, 150.0, 200.0),
        ParameterKey::Alt | ParameterKey::Ast => above(v, 40.0, 80.0),
        ParameterKey::Creatinine => above(v, 1.3, 2.0),
        ParameterKey::Bun => above(v, 20.0, 40.0),
        ParameterKey::Tsh => outside(v, 0.4, 4.0, Moderate),
        ParameterKey::Glucose => {
            if v < 70.0 {
                Low
            } else {
                at_least(v, 100.0, 126.0)
            }
        }
        ParameterKey::VitaminD => deficient(v, 30.0, 20.0),
        ParameterKey::VitaminB12 => deficient(v, 300.0, 200.0),
        _ => Normal,
    }
}

/// Hypertension staging on either reading.
fn classify_blood_pressure(systolic: u16, diastolic: u16) -> ParameterStatus {
    if systolic >= 140 || diastolic >= 90 {
        Critical
    } else if systolic >= 130 || diastolic >= 80 {
        Moderate
    } else {
        Normal
    }
}

/// `tier` when strictly below `low` or strictly above `high`.
fn outside(v: f64, low: f64, high: f64, tier: ParameterStatus) -> ParameterStatus {
    if v < low || v > high {
        tier
    } else {
        Normal
    }
}

/// `>= critical` is Critical, `>= moderate` is Moderate.
fn at_least(v: f64, moderate: f64, critical: f64) -> ParameterStatus {
    if v >= critical {
        Critical
    } else if v >= moderate {
        Moderate
    } else {
        Normal
    }
}

/// `> critical` is Critical, `> moderate` is Moderate.
fn above(v: f64, moderate: f64, critical: f64) -> ParameterStatus {
    if v > critical {
        Critical
    } else if v > moderate {
        Moderate
    } else {
        Normal
    }
}

/// `< critical` is Critical, `< low` is Low.
fn deficient(v: f64, low: f64, critical: f64) -> ParameterStatus {
    if v < critical {
        Critical
    } else if v < low {
        Low
    } else {
        Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(key: ParameterKey, v: f64) -> ParameterStatus {
        classify(key, &MeasuredValue::Single(v))
    }

    fn bp(systolic: u16, diastolic: u16) -> ParameterStatus {
        classify(
            ParameterKey::BloodPressure,
            &MeasuredValue::Pair {
                systolic,
                diastolic,
            },
        )
    }

    #[test]
    fn glucose_boundaries_are_inclusive_on_flagged_side() {
        assert_eq!(single(ParameterKey::Glucose, 99.9), Normal);
        assert_eq!(single(ParameterKey::Glucose, 100.0), Moderate);
        assert_eq!(single(ParameterKey::Glucose, 125.9), Moderate);
        assert_eq!(single(ParameterKey::Glucose, 126.0), Critical);
        assert_eq!(single(ParameterKey::Glucose, 69.0), Low);
        assert_eq!(single(ParameterKey::Glucose, 70.0), Normal);
    }

    #[test]
    fn hemoglobin_tiers() {
        assert_eq!(single(ParameterKey::Hemoglobin, 9.5), Critical);
        assert_eq!(single(ParameterKey::Hemoglobin, 10.0), Moderate);
        assert_eq!(single(ParameterKey::Hemoglobin, 11.9), Moderate);
        assert_eq!(single(ParameterKey::Hemoglobin, 12.0), Normal);
        assert_eq!(single(ParameterKey::Hemoglobin, 16.0), Normal);
        assert_eq!(single(ParameterKey::Hemoglobin, 17.0), Moderate);
        assert_eq!(single(ParameterKey::Hemoglobin, 18.5), Critical);
    }

    #[test]
    fn platelet_tiers() {
        assert_eq!(single(ParameterKey::Platelets, 90.0), Critical);
        assert_eq!(single(ParameterKey::Platelets, 120.0), Moderate);
        assert_eq!(single(ParameterKey::Platelets, 250.0), Normal);
        assert_eq!(single(ParameterKey::Platelets, 450.0), Moderate);
        assert_eq!(single(ParameterKey::Platelets, 501.0), Critical);
    }

    #[test]
    fn blood_counts() {
        assert_eq!(single(ParameterKey::Rbc, 3.9), Moderate);
        assert_eq!(single(ParameterKey::Rbc, 5.6), Moderate);
        assert_eq!(single(ParameterKey::Rbc, 4.8), Normal);
        assert_eq!(single(ParameterKey::Wbc, 11.5), Moderate);
        assert_eq!(single(ParameterKey::Wbc, 3.5), Moderate);
        assert_eq!(single(ParameterKey::Wbc, 7.0), Normal);
        assert_eq!(single(ParameterKey::Hematocrit, 35.0), Moderate);
        assert_eq!(single(ParameterKey::Hematocrit, 49.0), Moderate);
        assert_eq!(single(ParameterKey::Hematocrit, 42.0), Normal);
    }

    #[test]
    fn lipid_tiers() {
        assert_eq!(single(ParameterKey::TotalCholesterol, 150.0), Normal);
        assert_eq!(single(ParameterKey::TotalCholesterol, 200.0), Moderate);
        assert_eq!(single(ParameterKey::TotalCholesterol, 240.0), Critical);
        assert_eq!(single(ParameterKey::Ldl, 129.0), Normal);
        assert_eq!(single(ParameterKey::Ldl, 130.0), Moderate);
        assert_eq!(single(ParameterKey::Ldl, 160.0), Critical);
        assert_eq!(single(ParameterKey::Triglycerides, 150.0), Moderate);
        assert_eq!(single(ParameterKey::Triglycerides, 200.0), Critical);
    }

    #[test]
    fn hdl_has_low_and_high() {
        assert_eq!(single(ParameterKey::Hdl, 35.0), Low);
        assert_eq!(single(ParameterKey::Hdl, 40.0), Normal);
        assert_eq!(single(ParameterKey::Hdl, 60.0), Normal);
        assert_eq!(single(ParameterKey::Hdl, 65.0), High);
    }

    #[test]
    fn liver_and_kidney_use_strict_thresholds() {
        assert_eq!(single(ParameterKey::Alt, 40.0), Normal);
        assert_eq!(single(ParameterKey::Alt, 41.0), Moderate);
        assert_eq!(single(ParameterKey::Ast, 80.0), Moderate);
        assert_eq!(single(ParameterKey::Ast, 81.0), Critical);
        assert_eq!(single(ParameterKey::Creatinine, 1.3), Normal);
        assert_eq!(single(ParameterKey::Creatinine, 1.5), Moderate);
        assert_eq!(single(ParameterKey::Creatinine, 2.1), Critical);
        assert_eq!(single(ParameterKey::Bun, 20.0), Normal);
        assert_eq!(single(ParameterKey::Bun, 25.0), Moderate);
        assert_eq!(single(ParameterKey::Bun, 41.0), Critical);
    }

    #[test]
    fn thyroid_tiers() {
        assert_eq!(single(ParameterKey::Tsh, 0.3), Moderate);
        assert_eq!(single(ParameterKey::Tsh, 2.0), Normal);
        assert_eq!(single(ParameterKey::Tsh, 4.5), Moderate);
    }

    #[test]
    fn vitamin_deficiency_tiers() {
        assert_eq!(single(ParameterKey::VitaminD, 15.0), Critical);
        assert_eq!(single(ParameterKey::VitaminD, 25.0), Low);
        assert_eq!(single(ParameterKey::VitaminD, 30.0), Normal);
        assert_eq!(single(ParameterKey::VitaminB12, 150.0), Critical);
        assert_eq!(single(ParameterKey::VitaminB12, 250.0), Low);
        assert_eq!(single(ParameterKey::VitaminB12, 450.0), Normal);
    }

    #[test]
    fn blood_pressure_staging() {
        assert_eq!(bp(118, 76), Normal);
        assert_eq!(bp(130, 70), Moderate);
        assert_eq!(bp(120, 80), Moderate);
        assert_eq!(bp(145, 95), Critical);
        assert_eq!(bp(135, 90), Critical);
    }

    #[test]
    fn unruled_parameters_are_normal() {
        assert_eq!(single(ParameterKey::Ferritin, 5000.0), Normal);
        assert_eq!(single(ParameterKey::Crp, 0.0), Normal);
        assert_eq!(single(ParameterKey::Sodium, 120.0), Normal);
    }

    #[test]
    fn mismatched_value_shape_is_normal() {
        assert_eq!(
            classify(
                ParameterKey::Glucose,
                &MeasuredValue::Pair {
                    systolic: 200,
                    diastolic: 120
                }
            ),
            Normal
        );
        assert_eq!(single(ParameterKey::BloodPressure, 200.0), Normal);
    }
}
