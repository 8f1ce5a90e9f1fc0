use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{PipelineError, Result};
use crate::models::{ResolvedTable, SurveyRecord};
use crate::schema;

pub const TOP_GPA_BAND: &str = "3.50 - 4.00";

const PROGRAM_NAMES: [(&str, &str); 24] = [
    ("bcs", "Computer Science"),
    ("bit", "Information Technology"),
    ("engine", "Engineering"),
    ("engin", "Engineering"),
    ("engineering", "Engineering"),
    ("mhsc", "Health Sciences"),
    ("biomedical science", "Biomedical Science"),
    ("koe", "Education"),
    ("benl", "English"),
    ("ala", "Arts and Letters"),
    ("psychology", "Psychology"),
    ("irkhs", "Islamic Studies"),
    ("kirkhs", "Islamic Studies"),
    ("islamic education", "Islamic Education"),
    ("pendidikan islam", "Islamic Education"),
    ("fiqh", "Islamic Jurisprudence"),
    ("fiqh fatwa", "Islamic Jurisprudence"),
    ("nursing", "Nursing"),
    ("diploma nursing", "Nursing"),
    ("marine science", "Marine Science"),
    ("banking studies", "Banking Studies"),
    ("mathemathics", "Mathematics"),
    ("communication", "Communication"),
    ("cts", "Computer Technology"),
];

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y"];

pub fn canonical_program(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    PROGRAM_NAMES
        .iter()
        .find(|(abbreviation, _)| *abbreviation == key)
        .map(|(_, name)| name.to_string())
        .unwrap_or(key)
}

pub fn canonical_year(raw: &str) -> String {
    let residual = raw.to_lowercase().replace("year", "");
    let residual = residual.trim();
    match residual {
        "1" | "2" | "3" | "4" => format!("Year {residual}"),
        other => other.to_string(),
    }
}

pub fn canonical_gpa(raw: &str) -> String {
    match raw.trim() {
        "3.50-4.00" | "3.50 - 4.00" => TOP_GPA_BAND.to_string(),
        other => other.to_string(),
    }
}

/// Exactly "Yes" or "No"; anything else is reported as missing rather than guessed.
pub fn binary_flag(raw: &str) -> Option<u8> {
    match raw {
        "Yes" => Some(1),
        "No" => Some(0),
        _ => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Accepts "20" and "20.0" alike and truncates toward zero; negatives saturate at zero.
pub fn parse_age(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value as u32)
    } else {
        None
    }
}

/// Column positions of every display field in a resolved table.
#[derive(Debug, Clone, Copy)]
pub struct FieldIndex {
    timestamp: Option<usize>,
    gender: usize,
    age: usize,
    academic_program: usize,
    year_of_study: usize,
    gpa_band: usize,
    marital_status: usize,
    has_depression: usize,
    has_anxiety: usize,
    has_panic_attack: usize,
    sought_treatment: usize,
}

impl FieldIndex {
    pub fn locate(headers: &[String]) -> Result<Self> {
        let mut missing = Vec::new();
        let mut find = |name: &str| match headers.iter().position(|header| header == name) {
            Some(index) => index,
            None => {
                missing.push(name.to_string());
                0
            }
        };

        let index = FieldIndex {
            timestamp: headers.iter().position(|header| header == "timestamp"),
            gender: find("gender"),
            age: find("age"),
            academic_program: find("academic_program"),
            year_of_study: find("year_of_study"),
            gpa_band: find("gpa_band"),
            marital_status: find("marital_status"),
            has_depression: find("has_depression"),
            has_anxiety: find("has_anxiety"),
            has_panic_attack: find("has_panic_attack"),
            sought_treatment: find("sought_treatment"),
        };

        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        Ok(index)
    }
}

pub fn canonicalize_row(row: &[String], index: &FieldIndex, row_number: usize) -> Result<SurveyRecord> {
    let cell = |position: usize| row.get(position).map(String::as_str).unwrap_or_default();
    let age_cell = cell(index.age);
    let age = parse_age(age_cell).ok_or_else(|| PipelineError::InvalidAge {
        row: row_number,
        value: age_cell.to_string(),
    })?;

    Ok(SurveyRecord {
        timestamp: index.timestamp.and_then(|position| parse_timestamp(cell(position))),
        gender: cell(index.gender).to_string(),
        age,
        academic_program: canonical_program(cell(index.academic_program)),
        year_of_study: canonical_year(cell(index.year_of_study)),
        gpa_band: canonical_gpa(cell(index.gpa_band)),
        marital_status: binary_flag(cell(index.marital_status)),
        has_depression: binary_flag(cell(index.has_depression)),
        has_anxiety: binary_flag(cell(index.has_anxiety)),
        has_panic_attack: binary_flag(cell(index.has_panic_attack)),
        sought_treatment: binary_flag(cell(index.sought_treatment)),
    })
}

/// Renames the resolved columns to their display names and maps each row into a typed record.
pub fn canonicalize(table: &ResolvedTable) -> Result<Vec<SurveyRecord>> {
    let headers = schema::rename_to_display(&table.headers);
    let index = FieldIndex::locate(&headers)?;
    table
        .rows
        .iter()
        .zip(&table.source_rows)
        .map(|(row, &source_row)| canonicalize_row(row, &index, source_row))
        .collect()
}
