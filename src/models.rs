use chrono::NaiveDateTime;

/// Placeholder written into textual cells that had no value.
pub const UNKNOWN: &str = "unknown";

/// Survey rows exactly as read from disk: string cells, `None` where the source was blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column<'a>(&'a self, index: usize) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|cell| cell.as_deref()))
    }
}

/// A table with every cell filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based data row in the source file for each entry of `rows`.
    pub source_rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Text,
    Numeric,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Categorical => "categorical",
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// One respondent after cleaning. Binary answers stay `None` when the source
/// held anything other than "Yes" or "No".
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub gender: String,
    pub age: u32,
    pub academic_program: String,
    pub year_of_study: String,
    pub gpa_band: String,
    pub marital_status: Option<u8>,
    pub has_depression: Option<u8>,
    pub has_anxiety: Option<u8>,
    pub has_panic_attack: Option<u8>,
    pub sought_treatment: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Symptom {
    Depression,
    Anxiety,
    PanicAttack,
}

impl Symptom {
    pub const ALL: [Symptom; 3] = [Symptom::Depression, Symptom::Anxiety, Symptom::PanicAttack];

    pub fn label(self) -> &'static str {
        match self {
            Symptom::Depression => "Depression",
            Symptom::Anxiety => "Anxiety",
            Symptom::PanicAttack => "Panic attacks",
        }
    }

    pub fn flag(self, record: &SurveyRecord) -> Option<u8> {
        match self {
            Symptom::Depression => record.has_depression,
            Symptom::Anxiety => record.has_anxiety,
            Symptom::PanicAttack => record.has_panic_attack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Share {
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomPrevalence {
    pub symptom: Symptom,
    pub no: Share,
    pub yes: Share,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomTotal {
    pub symptom: Symptom,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub label: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRate {
    pub label: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearRates {
    pub year: String,
    pub anxiety_rate: f64,
    pub depression_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentRate {
    pub symptom: Symptom,
    pub rate: f64,
}

/// Every derived table the dashboard draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub prevalence: Vec<SymptomPrevalence>,
    pub symptom_totals: Vec<SymptomTotal>,
    pub program_depression: Vec<GroupTotal>,
    pub gpa_depression: Vec<GroupTotal>,
    pub year_rates: Vec<YearRates>,
    pub gender_panic: Vec<GroupRate>,
    pub marital_anxiety: Vec<GroupRate>,
    pub correlation: CorrelationMatrix,
    pub treatment_rates: Vec<TreatmentRate>,
}
