//! Export the per-point residual table to CSV.
//!
//! Floats are written in shortest round-trip form, so reading the file back
//! yields exactly the values the reporting stage computed.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::ResidualRow;
use crate::error::AppError;

/// Column order of the residual table.
pub const RESIDUAL_HEADER: [&str; 6] = ["t", "x_obs", "y_obs", "x_fit", "y_fit", "abs_err"];

/// Write the residual table to a CSV file.
pub fn write_residuals_csv(path: &Path, rows: &[ResidualRow]) -> Result<(), AppError> {
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create residual CSV '{}': {e}", path.display())))?;
    write_residuals(writer, rows)?;
    info!(path = %path.display(), rows = rows.len(), "wrote residual table");
    Ok(())
}

/// Write the residual table to any CSV writer.
pub fn write_residuals<W: Write>(mut writer: csv::Writer<W>, rows: &[ResidualRow]) -> Result<(), AppError> {
    writer
        .write_record(RESIDUAL_HEADER)
        .map_err(|e| AppError::io(format!("Failed to write residual CSV header: {e}")))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write residual CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush residual CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_values_round_trip_exactly() {
        let rows = vec![
            ResidualRow {
                t: 6.0,
                x_obs: 1.0 / 3.0,
                y_obs: 42.5,
                x_fit: 0.1 + 0.2,
                y_fit: 42.0,
                abs_err: (1.0 / 3.0 - (0.1 + 0.2)) + 0.5,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resid.csv");
        write_residuals_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(header, RESIDUAL_HEADER);

        let back: Vec<ResidualRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn failed_flush_on_full_device_is_an_io_error() {
        let rows = vec![
            ResidualRow {
                t: 6.0,
                x_obs: 1.0,
                y_obs: 42.0,
                x_fit: 1.0,
                y_fit: 42.0,
                abs_err: 0.0,
            };
            4
        ];
        let err = write_residuals_csv(Path::new("/dev/full"), &rows).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let err = write_residuals_csv(Path::new("/no/such/dir/resid.csv"), &[]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
