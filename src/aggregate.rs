use std::collections::BTreeMap;

use crate::models::{
    Aggregates, CorrelationMatrix, GroupRate, GroupTotal, Share, SurveyRecord, Symptom,
    SymptomPrevalence, SymptomTotal, TreatmentRate, YearRates,
};

pub const CORRELATION_FIELDS: [&str; 5] = [
    "age",
    "has_depression",
    "has_anxiety",
    "has_panic_attack",
    "sought_treatment",
];

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean of the answered flags; zero when nobody answered.
pub fn mean_flag(flags: impl Iterator<Item = Option<u8>>) -> f64 {
    let (sum, count) = flags
        .flatten()
        .fold((0u64, 0u64), |(sum, count), flag| (sum + u64::from(flag), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub fn binary_label(flag: u8) -> &'static str {
    if flag == 1 {
        "Yes"
    } else {
        "No"
    }
}

pub fn symptom_prevalence(records: &[SurveyRecord], symptom: Symptom) -> SymptomPrevalence {
    let yes = records
        .iter()
        .filter(|record| symptom.flag(record) == Some(1))
        .count();
    let no = records
        .iter()
        .filter(|record| symptom.flag(record) == Some(0))
        .count();
    let answered = yes + no;
    let percent = |count: usize| {
        if answered == 0 {
            0.0
        } else {
            round1(count as f64 / answered as f64 * 100.0)
        }
    };

    SymptomPrevalence {
        symptom,
        no: Share {
            count: no,
            percent: percent(no),
        },
        yes: Share {
            count: yes,
            percent: percent(yes),
        },
    }
}

pub fn symptom_totals(records: &[SurveyRecord]) -> Vec<SymptomTotal> {
    Symptom::ALL
        .iter()
        .map(|&symptom| SymptomTotal {
            symptom,
            total: records
                .iter()
                .filter_map(|record| symptom.flag(record))
                .map(u64::from)
                .sum(),
        })
        .collect()
}

fn group_sums<K, V>(records: &[SurveyRecord], key: K, value: V) -> BTreeMap<String, u64>
where
    K: Fn(&SurveyRecord) -> &str,
    V: Fn(&SurveyRecord) -> Option<u8>,
{
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record).to_string()).or_insert(0);
        *entry += value(record).map(u64::from).unwrap_or(0);
    }
    groups
}

fn group_means<K, V>(records: &[SurveyRecord], key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&SurveyRecord) -> Option<String>,
    V: Fn(&SurveyRecord) -> Option<u8>,
{
    let mut groups: BTreeMap<String, Vec<Option<u8>>> = BTreeMap::new();
    for record in records {
        if let Some(label) = key(record) {
            groups.entry(label).or_default().push(value(record));
        }
    }
    groups
        .into_iter()
        .map(|(label, flags)| (label, mean_flag(flags.into_iter())))
        .collect()
}

pub fn program_depression(records: &[SurveyRecord]) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = group_sums(
        records,
        |record| record.academic_program.as_str(),
        |record| record.has_depression,
    )
    .into_iter()
    .filter(|(_, total)| *total > 0)
    .map(|(label, total)| GroupTotal { label, total })
    .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

pub fn gpa_depression(records: &[SurveyRecord]) -> Vec<GroupTotal> {
    group_sums(
        records,
        |record| record.gpa_band.as_str(),
        |record| record.has_depression,
    )
    .into_iter()
    .filter(|(_, total)| *total > 0)
    .map(|(label, total)| GroupTotal { label, total })
    .collect()
}

pub fn year_rates(records: &[SurveyRecord]) -> Vec<YearRates> {
    let year = |record: &SurveyRecord| Some(record.year_of_study.clone());
    let anxiety = group_means(records, year, |record| record.has_anxiety);
    let depression = group_means(records, year, |record| record.has_depression);
    anxiety
        .into_iter()
        .zip(depression)
        .map(|((year, anxiety_rate), (_, depression_rate))| YearRates {
            year,
            anxiety_rate,
            depression_rate,
        })
        .collect()
}

pub fn gender_panic(records: &[SurveyRecord]) -> Vec<GroupRate> {
    group_means(
        records,
        |record| Some(record.gender.clone()),
        |record| record.has_panic_attack,
    )
    .into_iter()
    .map(|(label, rate)| GroupRate { label, rate })
    .collect()
}

/// Respondents with no usable marital answer form no group.
pub fn marital_anxiety(records: &[SurveyRecord]) -> Vec<GroupRate> {
    group_means(
        records,
        |record| record.marital_status.map(|flag| binary_label(flag).to_string()),
        |record| record.has_anxiety,
    )
    .into_iter()
    .map(|(label, rate)| GroupRate { label, rate })
    .collect()
}

/// Pearson coefficient over paired observations; zero when either side has no spread.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        0.0
    } else {
        (covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
    }
}

fn correlation_column(record: &SurveyRecord, field: usize) -> Option<f64> {
    match field {
        0 => Some(f64::from(record.age)),
        1 => record.has_depression.map(f64::from),
        2 => record.has_anxiety.map(f64::from),
        3 => record.has_panic_attack.map(f64::from),
        _ => record.sought_treatment.map(f64::from),
    }
}

pub fn correlation_matrix(records: &[SurveyRecord]) -> CorrelationMatrix {
    let size = CORRELATION_FIELDS.len();
    let mut values = vec![vec![0.0; size]; size];

    for i in 0..size {
        values[i][i] = 1.0;
        for j in (i + 1)..size {
            let pairs: Vec<(f64, f64)> = records
                .iter()
                .filter_map(|record| {
                    Some((correlation_column(record, i)?, correlation_column(record, j)?))
                })
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: CORRELATION_FIELDS.to_vec(),
        values,
    }
}

/// Share of respondents with the symptom who sought a specialist; zero when no one has it.
pub fn treatment_rate(records: &[SurveyRecord], symptom: Symptom) -> f64 {
    mean_flag(
        records
            .iter()
            .filter(|record| symptom.flag(record) == Some(1))
            .map(|record| record.sought_treatment),
    )
}

pub fn compute(records: &[SurveyRecord]) -> Aggregates {
    Aggregates {
        prevalence: Symptom::ALL
            .iter()
            .map(|&symptom| symptom_prevalence(records, symptom))
            .collect(),
        symptom_totals: symptom_totals(records),
        program_depression: program_depression(records),
        gpa_depression: gpa_depression(records),
        year_rates: year_rates(records),
        gender_panic: gender_panic(records),
        marital_anxiety: marital_anxiety(records),
        correlation: correlation_matrix(records),
        treatment_rates: Symptom::ALL
            .iter()
            .map(|&symptom| TreatmentRate {
                symptom,
                rate: treatment_rate(records, symptom),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(value: u8) -> Option<u8> {
        Some(value)
    }

    fn record(
        age: u32,
        gender: &str,
        program: &str,
        year: &str,
        gpa: &str,
        flags: [Option<u8>; 5],
    ) -> SurveyRecord {
        SurveyRecord {
            timestamp: None,
            gender: gender.to_string(),
            age,
            academic_program: program.to_string(),
            year_of_study: year.to_string(),
            gpa_band: gpa.to_string(),
            marital_status: flags[0],
            has_depression: flags[1],
            has_anxiety: flags[2],
            has_panic_attack: flags[3],
            sought_treatment: flags[4],
        }
    }

    fn sample() -> Vec<SurveyRecord> {
        vec![
            record(18, "Female", "Computer Science", "Year 1", "3.00 - 3.49", [flag(0), flag(1), flag(1), flag(0), flag(0)]),
            record(19, "Male", "Computer Science", "Year 1", "3.50 - 4.00", [flag(0), flag(1), flag(0), flag(1), flag(1)]),
            record(21, "Female", "Engineering", "Year 2", "3.50 - 4.00", [flag(1), flag(0), flag(1), flag(1), flag(0)]),
            record(23, "Female", "Nursing", "Year 3", "2.50 - 2.99", [flag(1), flag(1), flag(1), flag(0), flag(0)]),
            record(24, "Male", "Psychology", "Year 3", "3.00 - 3.49", [None, flag(0), None, flag(0), flag(0)]),
        ]
    }

    #[test]
    fn prevalence_counts_and_percentages() {
        let prevalence = symptom_prevalence(&sample(), Symptom::Depression);
        assert_eq!(prevalence.yes.count, 3);
        assert_eq!(prevalence.no.count, 2);
        assert_eq!(prevalence.yes.percent, 60.0);
        assert_eq!(prevalence.no.percent, 40.0);
    }

    #[test]
    fn prevalence_skips_unanswered_and_rounds() {
        // anxiety: three yes, one no, one missing
        let prevalence = symptom_prevalence(&sample(), Symptom::Anxiety);
        assert_eq!(prevalence.yes.count, 3);
        assert_eq!(prevalence.no.count, 1);
        assert_eq!(prevalence.yes.percent, 75.0);

        let records = &sample()[..3];
        let thirds = symptom_prevalence(records, Symptom::PanicAttack);
        assert_eq!(thirds.yes.percent, 66.7);
        assert_eq!(thirds.no.percent, 33.3);
    }

    #[test]
    fn prevalence_over_nothing_is_zero() {
        let prevalence = symptom_prevalence(&[], Symptom::Depression);
        assert_eq!(prevalence.yes, Share { count: 0, percent: 0.0 });
    }

    #[test]
    fn totals_count_ones_per_symptom() {
        let totals: Vec<u64> = symptom_totals(&sample()).iter().map(|t| t.total).collect();
        assert_eq!(totals, vec![3, 3, 2]);
    }

    #[test]
    fn program_depression_sorted_descending_without_zero_groups() {
        let totals = program_depression(&sample());
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Computer Science", "Nursing"]);
        assert_eq!(totals[0].total, 2);
    }

    #[test]
    fn gpa_depression_ascending_by_band() {
        let totals = gpa_depression(&sample());
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2.50 - 2.99", "3.00 - 3.49", "3.50 - 4.00"]);
        assert!(totals.iter().all(|t| t.total == 1));
    }

    #[test]
    fn year_rates_are_within_year_means() {
        let rates = year_rates(&sample());
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].year, "Year 1");
        assert_eq!(rates[0].depression_rate, 1.0);
        assert_eq!(rates[0].anxiety_rate, 0.5);
        // year 3 anxiety: one yes, one missing
        assert_eq!(rates[2].anxiety_rate, 1.0);
        assert_eq!(rates[2].depression_rate, 0.5);
    }

    #[test]
    fn gender_and_marital_rates() {
        let gender = gender_panic(&sample());
        assert_eq!(gender[0].label, "Female");
        assert!((gender[0].rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(gender[1].rate, 0.5);

        let marital = marital_anxiety(&sample());
        assert_eq!(marital.len(), 2);
        assert_eq!(marital[0].label, "No");
        assert_eq!(marital[0].rate, 0.5);
        assert_eq!(marital[1].label, "Yes");
        assert_eq!(marital[1].rate, 1.0);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let matrix = correlation_matrix(&sample());
        assert_eq!(matrix.labels.len(), 5);
        for i in 0..5 {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..5 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                assert!(matrix.values[i][j].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn pearson_matches_known_values() {
        assert!((pearson(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[(1.0, 1.0), (2.0, 1.0)]), 0.0);
        assert_eq!(pearson(&[(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn treatment_rate_among_symptomatic() {
        let records = sample();
        assert!((treatment_rate(&records, Symptom::Depression) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(treatment_rate(&records, Symptom::PanicAttack), 0.5);
    }

    #[test]
    fn treatment_rate_without_symptomatic_rows_is_zero() {
        let records: Vec<SurveyRecord> = sample()
            .into_iter()
            .map(|mut r| {
                r.has_anxiety = flag(0);
                r
            })
            .collect();
        assert_eq!(treatment_rate(&records, Symptom::Anxiety), 0.0);
        assert_eq!(treatment_rate(&[], Symptom::Depression), 0.0);
    }
}
