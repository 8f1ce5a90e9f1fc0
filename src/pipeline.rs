use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::models::{Aggregates, ColumnKind, ColumnProfile, RawTable, SurveyRecord};
use crate::{aggregate, canonical, loader, resolve, schema};

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub raw_rows: usize,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub duplicates_removed: usize,
    pub display_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub records: Vec<SurveyRecord>,
    pub diagnostics: Diagnostics,
}

/// Runs normalizer, resolver and canonicalizer in that order.
pub fn prepare_with(raw: RawTable, declared: &HashMap<String, ColumnKind>) -> Result<Prepared> {
    let raw_rows = raw.height();
    let normalized = schema::normalize_table(raw)?;
    let resolution = resolve::resolve(normalized, declared);
    let records = canonical::canonicalize(&resolution.table)?;

    Ok(Prepared {
        diagnostics: Diagnostics {
            raw_rows,
            rows: records.len(),
            columns: resolution.profiles,
            duplicates_removed: resolution.duplicates_removed,
            display_fields: schema::rename_to_display(&resolution.table.headers),
        },
        records,
    })
}

/// Survey answers chosen from a fixed list rather than typed freely.
pub fn declared_kinds() -> HashMap<String, ColumnKind> {
    ["choose_your_gender", "your_current_year_of_study"]
        .into_iter()
        .map(|name| (name.to_string(), ColumnKind::Categorical))
        .collect()
}

pub fn prepare(raw: RawTable) -> Result<Prepared> {
    prepare_with(raw, &declared_kinds())
}

pub fn load(path: &Path) -> Result<Prepared> {
    prepare(loader::load_csv(path)?)
}

/// Everything the server reads. Built once before the listener opens and never mutated.
#[derive(Debug)]
pub struct DashboardContext {
    pub records: Vec<SurveyRecord>,
    pub aggregates: Aggregates,
    pub diagnostics: Diagnostics,
    pub dashboard: Dashboard,
}

impl DashboardContext {
    pub fn from_prepared(prepared: Prepared) -> Result<Self> {
        let aggregates = aggregate::compute(&prepared.records);
        let dashboard = Dashboard::build(&aggregates)?;
        Ok(DashboardContext {
            records: prepared.records,
            aggregates,
            diagnostics: prepared.diagnostics,
            dashboard,
        })
    }

    pub fn init(path: &Path) -> Result<Self> {
        let context = Self::from_prepared(load(path)?)?;
        info!(
            respondents = context.records.len(),
            duplicates_removed = context.diagnostics.duplicates_removed,
            "dashboard context ready"
        );
        Ok(context)
    }
}
