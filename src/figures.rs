//! Plotly figure specifications built from the aggregate tables.
//!
//! Each function returns a `{data, layout}` document that plotly.js can draw as-is.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{
    CorrelationMatrix, GroupRate, GroupTotal, SymptomPrevalence, SymptomTotal, TreatmentRate,
    YearRates,
};

pub const HELP_TITLE: &str = "Share of students with symptoms who sought specialist treatment";
pub const INSIGHT_TITLE: &str = "Gap between having symptoms and seeking professional help";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    #[cfg(test)]
    pub fn title(&self) -> Option<&str> {
        self.layout["title"]["text"].as_str()
    }

    /// JSON safe to inline inside a `<script>` element: markup characters become
    /// `\uXXXX` escapes, which JavaScript reads back as the same strings.
    pub fn to_script_json(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        let mut escaped = String::with_capacity(json.len());
        for c in json.chars() {
            match c {
                '<' => escaped.push_str("\\u003c"),
                '>' => escaped.push_str("\\u003e"),
                '&' => escaped.push_str("\\u0026"),
                '\'' => escaped.push_str("\\u0027"),
                other => escaped.push(other),
            }
        }
        Ok(escaped)
    }
}

fn layout(title: &str, x_title: &str, y_title: &str) -> Value {
    json!({
        "title": { "text": title },
        "xaxis": { "title": { "text": x_title } },
        "yaxis": { "title": { "text": y_title } },
    })
}

pub fn symptom_pie(prevalence: &SymptomPrevalence) -> Figure {
    let shares = [prevalence.no, prevalence.yes];
    let text: Vec<String> = shares
        .iter()
        .map(|share| format!("{} ({}%)", share.count, share.percent))
        .collect();
    Figure {
        data: vec![json!({
            "type": "pie",
            "labels": ["No (0)", "Yes (1)"],
            "values": shares.iter().map(|share| share.count).collect::<Vec<_>>(),
            "text": text,
            "textinfo": "text+percent",
            "textposition": "inside",
        })],
        layout: json!({
            "title": {
                "text": format!(
                    "Students reporting {}",
                    prevalence.symptom.label().to_lowercase()
                )
            },
        }),
    }
}

pub fn symptom_totals_pie(totals: &[SymptomTotal]) -> Figure {
    Figure {
        data: vec![json!({
            "type": "pie",
            "labels": totals.iter().map(|t| t.symptom.label()).collect::<Vec<_>>(),
            "values": totals.iter().map(|t| t.total).collect::<Vec<_>>(),
            "textinfo": "label+value+percent",
            "textposition": "inside",
        })],
        layout: json!({
            "title": { "text": "Students by emotional symptom", "x": 0.5 },
        }),
    }
}

fn totals_bar(totals: &[GroupTotal], title: &str, x_title: &str) -> Figure {
    Figure {
        data: vec![json!({
            "type": "bar",
            "x": totals.iter().map(|t| t.label.as_str()).collect::<Vec<_>>(),
            "y": totals.iter().map(|t| t.total).collect::<Vec<_>>(),
        })],
        layout: layout(title, x_title, "Students with depression"),
    }
}

pub fn program_bar(totals: &[GroupTotal]) -> Figure {
    let mut figure = totals_bar(
        totals,
        "Students with depression by academic program",
        "Academic program",
    );
    figure.layout["xaxis"]["tickangle"] = json!(75);
    figure
}

pub fn gpa_bar(totals: &[GroupTotal]) -> Figure {
    totals_bar(
        totals,
        "Relationship between CGPA and depression",
        "Cumulative grade point average (CGPA)",
    )
}

pub fn year_bar(rates: &[YearRates]) -> Figure {
    let years: Vec<&str> = rates.iter().map(|r| r.year.as_str()).collect();
    let mut layout = layout(
        "Anxiety and depression rates by year of study",
        "Year of study",
        "Share of students",
    );
    layout["barmode"] = json!("group");
    Figure {
        data: vec![
            json!({
                "type": "bar",
                "name": "has_anxiety",
                "x": years,
                "y": rates.iter().map(|r| r.anxiety_rate).collect::<Vec<_>>(),
            }),
            json!({
                "type": "bar",
                "name": "has_depression",
                "x": years,
                "y": rates.iter().map(|r| r.depression_rate).collect::<Vec<_>>(),
            }),
        ],
        layout,
    }
}

fn rate_bar(rates: &[GroupRate], title: &str, x_title: &str, y_title: &str) -> Figure {
    Figure {
        data: vec![json!({
            "type": "bar",
            "x": rates.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            "y": rates.iter().map(|r| r.rate).collect::<Vec<_>>(),
        })],
        layout: layout(title, x_title, y_title),
    }
}

pub fn gender_bar(rates: &[GroupRate]) -> Figure {
    rate_bar(
        rates,
        "Share of students with panic attacks by gender",
        "Gender",
        "Share with panic attacks",
    )
}

pub fn marital_bar(rates: &[GroupRate]) -> Figure {
    rate_bar(
        rates,
        "Share of students with anxiety by marital status",
        "Married",
        "Share with anxiety",
    )
}

pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Figure {
    let text: Vec<Vec<String>> = matrix
        .values
        .iter()
        .map(|row| row.iter().map(|v| format!("{v:.2}")).collect())
        .collect();
    Figure {
        data: vec![json!({
            "type": "heatmap",
            "x": matrix.labels,
            "y": matrix.labels,
            "z": matrix.values,
            "text": text,
            "texttemplate": "%{text}",
            "colorscale": "RdBu",
            "zmin": -1,
            "zmax": 1,
            "colorbar": {
                "title": { "text": "Correlation" },
                "tickvals": [-1, -0.5, 0, 0.5, 1],
                "ticktext": ["-1", "-0.5", "0", "0.5", "1"],
            },
        })],
        layout: json!({
            "title": {
                "text": "Correlation heatmap: age, symptoms and treatment seeking",
                "x": 0.5,
            },
            "width": 700,
            "height": 600,
            "xaxis": { "tickangle": 45 },
            "yaxis": { "tickangle": 0 },
        }),
    }
}

pub fn help_bar(rates: &[TreatmentRate], title: &str) -> Figure {
    let mut layout = layout(title, "Symptom", "Share seeking treatment");
    layout["yaxis"]["tickformat"] = json!(".0%");
    Figure {
        data: vec![json!({
            "type": "bar",
            "x": rates.iter().map(|r| r.symptom.label()).collect::<Vec<_>>(),
            "y": rates.iter().map(|r| r.rate).collect::<Vec<_>>(),
        })],
        layout,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleFunction {
    #[default]
    Linear,
    Quadratic,
}

impl ExampleFunction {
    pub const ALL: [ExampleFunction; 2] = [ExampleFunction::Linear, ExampleFunction::Quadratic];

    pub fn key(self) -> &'static str {
        match self {
            ExampleFunction::Linear => "linear",
            ExampleFunction::Quadratic => "quadratic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExampleFunction::Linear => "y = x",
            ExampleFunction::Quadratic => "y = x²",
        }
    }

    pub fn eval(self, x: f64) -> f64 {
        match self {
            ExampleFunction::Linear => x,
            ExampleFunction::Quadratic => x * x,
        }
    }

    /// Unrecognized selections fall back to the default function.
    pub fn from_selection(selection: Option<&str>) -> Self {
        selection
            .and_then(|value| {
                Self::ALL
                    .into_iter()
                    .find(|function| function.key() == value.trim())
            })
            .unwrap_or_default()
    }
}

pub fn example_figure(selection: ExampleFunction) -> Figure {
    let xs: Vec<f64> = (-10..=10).map(f64::from).collect();
    let ys: Vec<f64> = xs.iter().map(|&x| selection.eval(x)).collect();
    Figure {
        data: vec![json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": selection.label(),
            "x": xs,
            "y": ys,
        })],
        layout: layout(&format!("Example function: {}", selection.label()), "x", "y"),
    }
}
