/// Sanitize report text before matching.
/// Strips control characters, turns table rules into spaces, folds
/// typographic dashes and colons to ASCII, collapses runs of spaces and
/// drops blank lines. Digits, letters and unit punctuation pass through.
pub fn sanitize_report_text(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\r' => None,
            '\t' | '|' | '\u{00A0}' | '\u{2502}' | '\u{2503}' | '\u{00A6}' => Some(' '),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => Some('-'),
            '\u{FF1A}' => Some(':'),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    mapped
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        let raw = "Glucose:\x00 110";
        assert_eq!(sanitize_report_text(raw), "Glucose: 110");
    }

    #[test]
    fn strips_control_characters() {
        let raw = "TSH: 2.1\x01\x02\x03\nHDL: 45";
        let clean = sanitize_report_text(raw);
        assert!(!clean.contains('\x01'));
        assert_eq!(clean, "TSH: 2.1\nHDL: 45");
    }

    #[test]
    fn preserves_units_and_ranges() {
        let raw = "Potassium: 4.2 mmol/L (3.5-5.0)";
        assert_eq!(sanitize_report_text(raw), raw);
        let raw = "Platelets 250 x10^3/µL, Temp 37.5°C";
        assert_eq!(sanitize_report_text(raw), raw);
    }

    #[test]
    fn table_rules_become_spaces() {
        let raw = "| Hemoglobin | 13.5 | g/dL |";
        assert_eq!(sanitize_report_text(raw), "Hemoglobin 13.5 g/dL");
    }

    #[test]
    fn collapses_irregular_whitespace() {
        let raw = "  Creatinine\t\t 1.1\u{00A0}mg/dL  \r\n\n\n  BUN   18 ";
        assert_eq!(sanitize_report_text(raw), "Creatinine 1.1 mg/dL\nBUN 18");
    }

    #[test]
    fn folds_typographic_dashes_and_colons() {
        let raw = "LDL\u{2013}C\u{FF1A} 128";
        assert_eq!(sanitize_report_text(raw), "LDL-C: 128");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_report_text(""), "");
        assert_eq!(sanitize_report_text("\x00\x01\x02"), "");
    }

    #[test]
    fn preserves_accented_characters() {
        let raw = "Hémoglobine: 13,5 g/dL";
        assert_eq!(sanitize_report_text(raw), raw);
    }
}
