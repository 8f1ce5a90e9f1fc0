use std::collections::HashMap;

use crate::error::{PipelineError, Result};
use crate::models::RawTable;

/// Normalized source header -> field name exposed by the dashboard.
pub const DISPLAY_FIELDS: [(&str, &str); 11] = [
    ("timestamp", "timestamp"),
    ("choose_your_gender", "gender"),
    ("age", "age"),
    ("what_is_your_course?", "academic_program"),
    ("your_current_year_of_study", "year_of_study"),
    ("what_is_your_cgpa?", "gpa_band"),
    ("marital_status", "marital_status"),
    ("do_you_have_depression?", "has_depression"),
    ("do_you_have_anxiety?", "has_anxiety"),
    ("do_you_have_panic_attack?", "has_panic_attack"),
    ("did_you_seek_any_specialist_for_a_treatment?", "sought_treatment"),
];

pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect()
}

/// Normalizes every header, refusing any pair of labels that collapse together.
pub fn normalize_headers(headers: &[String]) -> Result<Vec<String>> {
    let mut seen: HashMap<String, Vec<String>> = HashMap::new();
    let mut normalized = Vec::with_capacity(headers.len());

    for header in headers {
        let name = normalize_label(header);
        seen.entry(name.clone()).or_default().push(header.clone());
        normalized.push(name);
    }

    if let Some((name, labels)) = normalized
        .iter()
        .find_map(|name| seen.get(name).filter(|l| l.len() > 1).map(|l| (name, l)))
    {
        return Err(PipelineError::HeaderCollision {
            normalized: name.clone(),
            labels: labels.clone(),
        });
    }

    Ok(normalized)
}

pub fn normalize_table(mut table: RawTable) -> Result<RawTable> {
    table.headers = normalize_headers(&table.headers)?;
    Ok(table)
}

/// Unmapped names pass through untouched.
pub fn display_name(normalized: &str) -> &str {
    DISPLAY_FIELDS
        .iter()
        .find(|(source, _)| *source == normalized)
        .map(|(_, display)| *display)
        .unwrap_or(normalized)
}

pub fn rename_to_display(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|header| display_name(header).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_spacing_and_hyphens() {
        assert_eq!(normalize_label("  Choose your gender "), "choose_your_gender");
        assert_eq!(normalize_label("What is your CGPA?"), "what_is_your_cgpa?");
        assert_eq!(normalize_label("Follow-up Date"), "follow_up_date");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let raw = [
            "Timestamp",
            "Your current year of Study",
            "Did you seek any specialist for a treatment?",
            " Anti-Stress  Score ",
        ];
        for label in raw {
            let once = normalize_label(label);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let headers = vec!["Age".to_string(), "age ".to_string(), "Gender".to_string()];
        match normalize_headers(&headers) {
            Err(PipelineError::HeaderCollision { normalized, labels }) => {
                assert_eq!(normalized, "age");
                assert_eq!(labels, vec!["Age".to_string(), "age ".to_string()]);
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn display_names_cover_survey_fields() {
        assert_eq!(display_name("what_is_your_course?"), "academic_program");
        assert_eq!(display_name("marital_status"), "marital_status");
        assert_eq!(display_name("favourite_colour"), "favourite_colour");
    }
}
