use std::fmt::Write;

use crate::models::Aggregates;
use crate::pipeline::Diagnostics;

pub fn build_report(source: &str, diagnostics: &Diagnostics, aggregates: &Aggregates) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Student Mental Health Report");
    let _ = writeln!(
        output,
        "Generated from {} ({} respondents, {} duplicates removed)",
        source, diagnostics.rows, diagnostics.duplicates_removed
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Symptom Prevalence");

    for prevalence in &aggregates.prevalence {
        let _ = writeln!(
            output,
            "- {}: {} yes ({:.1}%), {} no ({:.1}%)",
            prevalence.symptom.label(),
            prevalence.yes.count,
            prevalence.yes.percent,
            prevalence.no.count,
            prevalence.no.percent
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Depression by Academic Program");

    if aggregates.program_depression.is_empty() {
        let _ = writeln!(output, "No program reports depression.");
    } else {
        for group in &aggregates.program_depression {
            let _ = writeln!(output, "- {}: {}", group.label, group.total);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Depression by CGPA Band");

    if aggregates.gpa_depression.is_empty() {
        let _ = writeln!(output, "No CGPA band reports depression.");
    } else {
        for group in &aggregates.gpa_depression {
            let _ = writeln!(output, "- {}: {}", group.label, group.total);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rates by Year of Study");

    for year in &aggregates.year_rates {
        let _ = writeln!(
            output,
            "- {}: anxiety {:.2}, depression {:.2}",
            year.year, year.anxiety_rate, year.depression_rate
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Personal Factors");

    for group in &aggregates.gender_panic {
        let _ = writeln!(
            output,
            "- Panic attacks, {}: {:.2}",
            group.label, group.rate
        );
    }
    for group in &aggregates.marital_anxiety {
        let _ = writeln!(
            output,
            "- Anxiety, married {}: {:.2}",
            group.label, group.rate
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Correlations");
    let matrix = &aggregates.correlation;
    let _ = writeln!(output, "| | {} |", matrix.labels.join(" | "));
    let _ = writeln!(output, "|---{}|", "|---".repeat(matrix.labels.len()));
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        let cells: Vec<String> = row.iter().map(|value| format!("{value:.2}")).collect();
        let _ = writeln!(output, "| {} | {} |", label, cells.join(" | "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Help-Seeking Gap");

    for rate in &aggregates.treatment_rates {
        let _ = writeln!(
            output,
            "- {}: {:.0}% sought specialist treatment",
            rate.symptom.label(),
            rate.rate * 100.0
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::models::SurveyRecord;

    fn record(program: &str, depression: u8, treatment: u8) -> SurveyRecord {
        SurveyRecord {
            timestamp: None,
            gender: "Male".to_string(),
            age: 22,
            academic_program: program.to_string(),
            year_of_study: "Year 1".to_string(),
            gpa_band: "3.00 - 3.49".to_string(),
            marital_status: Some(0),
            has_depression: Some(depression),
            has_anxiety: Some(0),
            has_panic_attack: Some(0),
            sought_treatment: Some(treatment),
        }
    }

    fn diagnostics(rows: usize) -> Diagnostics {
        Diagnostics {
            raw_rows: rows,
            rows,
            columns: Vec::new(),
            duplicates_removed: 0,
            display_fields: Vec::new(),
        }
    }

    #[test]
    fn report_lists_every_section() {
        let records = vec![record("Nursing", 1, 1), record("Engineering", 1, 0)];
        let report = build_report(
            "survey.csv",
            &diagnostics(2),
            &aggregate::compute(&records),
        );
        assert!(report.starts_with("# Student Mental Health Report"));
        assert!(report.contains("Generated from survey.csv (2 respondents, 0 duplicates removed)"));
        assert!(report.contains("- Depression: 2 yes (100.0%), 0 no (0.0%)"));
        assert!(report.contains("- Engineering: 1"));
        assert!(report.contains("| age | 1.00 |"));
        assert!(report.contains("- Depression: 50% sought specialist treatment"));
        assert!(report.contains("- Anxiety: 0% sought specialist treatment"));
    }

    #[test]
    fn empty_groups_are_called_out() {
        let records = vec![record("Nursing", 0, 0)];
        let report = build_report("survey.csv", &diagnostics(1), &aggregate::compute(&records));
        assert!(report.contains("No program reports depression."));
        assert!(report.contains("No CGPA band reports depression."));
    }
}
