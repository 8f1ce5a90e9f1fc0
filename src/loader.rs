use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::RawTable;

const NA_TOKENS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

pub fn load_csv(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "loaded survey file"
    );
    Ok(table)
}

pub fn read_table<R: Read>(source: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(PipelineError::RaggedRow {
                row: index + 1,
                found: record.len(),
                expected: headers.len(),
            });
        }
        let row = record
            .iter()
            .map(|cell| {
                if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn blank_and_na_cells_load_as_missing() {
        let data = "Age,Marital status\n20,\nNaN,No\n  ,Yes\n";
        let table = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Age", "Marital status"]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.rows[0], vec![Some("20".to_string()), None]);
        assert_eq!(table.rows[1], vec![None, Some("No".to_string())]);
        assert_eq!(table.rows[2][0], None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let data = "a,b\n1,2\n3\n";
        let err = read_table(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RaggedRow {
                row: 2,
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.csv"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Timestamp,Age").unwrap();
        writeln!(file, "8/7/2020 12:02,18").unwrap();
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[0][1].as_deref(), Some("18"));
    }
}
