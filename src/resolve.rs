use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::models::{ColumnKind, ColumnProfile, RawTable, ResolvedTable, UNKNOWN};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub table: ResolvedTable,
    pub profiles: Vec<ColumnProfile>,
    pub duplicates_removed: usize,
}

/// A column is numeric when it has at least one value and every value parses as a number.
pub fn infer_kind<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    let mut present = 0usize;
    for value in values.flatten() {
        if value.trim().parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
        present += 1;
    }
    if present == 0 {
        ColumnKind::Text
    } else {
        ColumnKind::Numeric
    }
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn fill_value(table: &RawTable, index: usize, kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Categorical | ColumnKind::Text => UNKNOWN.to_string(),
        ColumnKind::Numeric => {
            let mut values: Vec<f64> = table
                .column(index)
                .flatten()
                .filter_map(|value| value.trim().parse::<f64>().ok())
                .collect();
            median(&mut values)
                .map(format_number)
                .unwrap_or_else(|| UNKNOWN.to_string())
        }
    }
}

/// Numeric cells compare by value, so `20` and `20.0` are the same answer.
fn dedup_key(row: &[String], kinds: &[ColumnKind]) -> Vec<String> {
    row.iter()
        .zip(kinds)
        .map(|(cell, kind)| match kind {
            ColumnKind::Numeric => cell
                .trim()
                .parse::<f64>()
                .map(format_number)
                .unwrap_or_else(|_| cell.clone()),
            ColumnKind::Categorical | ColumnKind::Text => cell.clone(),
        })
        .collect()
}

/// Fills every missing cell by column kind, then drops exact duplicate rows keeping the first.
pub fn resolve(table: RawTable, declared: &HashMap<String, ColumnKind>) -> Resolution {
    let mut profiles = Vec::with_capacity(table.width());
    let mut fills = Vec::with_capacity(table.width());
    let mut kinds = Vec::with_capacity(table.width());

    for (index, name) in table.headers.iter().enumerate() {
        let kind = declared
            .get(name)
            .copied()
            .unwrap_or_else(|| infer_kind(table.column(index)));
        let missing = table.column(index).filter(Option::is_none).count();
        debug!(column = %name, kind = kind.as_str(), missing, "column profile");
        fills.push(fill_value(&table, index, kind));
        kinds.push(kind);
        profiles.push(ColumnProfile {
            name: name.clone(),
            kind,
            missing,
        });
    }

    let filled = table.rows.into_iter().map(|row| {
        row.into_iter()
            .zip(fills.iter())
            .map(|(cell, fill)| cell.unwrap_or_else(|| fill.clone()))
            .collect::<Vec<String>>()
    });

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut rows = Vec::new();
    let mut source_rows = Vec::new();
    let mut duplicates_removed = 0usize;
    for (position, row) in filled.enumerate() {
        if seen.insert(dedup_key(&row, &kinds)) {
            rows.push(row);
            source_rows.push(position + 1);
        } else {
            duplicates_removed += 1;
        }
    }

    info!(duplicates_removed, rows = rows.len(), "resolved missing values");

    Resolution {
        table: ResolvedTable {
            headers: table.headers,
            rows,
            source_rows,
        },
        profiles,
        duplicates_removed,
    }
}
