use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to open survey file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("columns {labels:?} collapse to the same name `{normalized}`")]
    HeaderCollision {
        normalized: String,
        labels: Vec<String>,
    },

    #[error("required columns missing after normalization: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("row {row}: age value `{value}` is not a number")]
    InvalidAge { row: usize, value: String },

    #[error("failed to render dashboard: {0}")]
    Render(#[from] serde_json::Error),

    #[error("failed to render dashboard template: {0}")]
    Template(#[from] askama::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
