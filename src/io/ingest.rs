//! CSV ingest of observed `(x, y)` points.
//!
//! Design goals:
//! - **Strict schema**: `x` and `y` columns are required, anything else is ignored
//! - **Fail fast**: a single malformed value aborts the run (exit code 2)
//! - **Order preserving**: row `i` of the file is observation `i`

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::Observation;
use crate::error::AppError;

/// Summary stats about the loaded points.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Ingest output: observations in file order + stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
}

impl IngestedData {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Load observations from a CSV file with `x` and `y` columns.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_observations(file)?;
    info!(path = %path.display(), n = data.len(), "loaded observations");
    Ok(data)
}

/// Parse observations from any CSV reader.
pub fn read_observations<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = required_column(&header_map, "x")?;
    let y_idx = required_column(&header_map, "y")?;
    debug!(x_idx, y_idx, columns = headers.len(), "resolved CSV columns");

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::io(format!("CSV parse error on line {line}: {e}")))?;
        let x = parse_value(&record, x_idx, "x", line)?;
        let y = parse_value(&record, y_idx, "y", line)?;
        observations.push(Observation { x, y });
    }

    let stats = compute_stats(&observations)
        .ok_or_else(|| AppError::no_data("No observations found in input CSV."))?;

    Ok(IngestedData {
        observations,
        stats,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn required_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::io(format!("Missing required column: `{name}`")))
}

fn parse_value(record: &StringRecord, idx: usize, name: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::io(format!("Missing `{name}` value on line {line}.")))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| AppError::io(format!("Invalid `{name}` value '{raw}' on line {line}.")))?;
    if !v.is_finite() {
        return Err(AppError::io(format!("Non-finite `{name}` value on line {line}.")));
    }
    Ok(v)
}

fn compute_stats(points: &[Observation]) -> Option<DatasetStats> {
    if points.is_empty() {
        return None;
    }
    let mut stats = DatasetStats {
        n_points: points.len(),
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };
    for p in points {
        stats.x_min = stats.x_min.min(p.x);
        stats.x_max = stats.x_max.max(p.x);
        stats.y_min = stats.y_min.min(p.y);
        stats.y_max = stats.y_max.max(p.y);
    }
    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EXIT_IO, EXIT_NO_DATA};

    #[test]
    fn reads_columns_in_order_and_ignores_extras() {
        let csv = "id,y,x\na,2.5,1.0\nb,-3,4e1\n";
        let data = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(
            data.observations,
            vec![Observation { x: 1.0, y: 2.5 }, Observation { x: 40.0, y: -3.0 }]
        );
        assert_eq!(data.stats.n_points, 2);
        assert_eq!(data.stats.x_max, 40.0);
        assert_eq!(data.stats.y_min, -3.0);
    }

    #[test]
    fn header_bom_and_case_are_tolerated() {
        let csv = "\u{feff}X , Y\n1,2\n";
        let data = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(data.observations, vec![Observation { x: 1.0, y: 2.0 }]);
    }

    #[test]
    fn missing_column_is_rejected() {
        let err = read_observations("x,z\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
        assert!(err.message().contains("`y`"));
    }

    #[test]
    fn non_numeric_value_names_the_line() {
        let err = read_observations("x,y\n1,2\n3,abc\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
        assert!(err.message().contains("line 3"), "{err}");
    }

    #[test]
    fn empty_file_fails_fast() {
        let err = read_observations("x,y\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NO_DATA);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_observations(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
    }
}
