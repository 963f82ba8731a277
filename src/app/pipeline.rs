//! The fitting pipeline, separate from presentation.
//!
//! load -> time grid -> objective -> global search -> refinement -> residuals
//!
//! `app` only decides what gets printed.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{FitConfig, FitResult, ResidualRow};
use crate::error::AppError;
use crate::fit::{FitProgress, L1Objective, fit_two_stage};
use crate::io::ingest::{IngestedData, load_observations};
use crate::models::time_grid;
use crate::report::{compute_residuals, total_abs_err};

/// All computed outputs of a single `pfit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub t: Vec<f64>,
    pub fit: FitResult,
    pub residuals: Vec<ResidualRow>,
}

/// Where the reporting stage writes its files.
#[derive(Debug, Clone)]
pub struct OutputTargets {
    pub residuals: PathBuf,
    pub plot: Option<PathBuf>,
    pub plot_width: u32,
    pub plot_height: u32,
}

impl From<&FitConfig> for OutputTargets {
    fn from(config: &FitConfig) -> Self {
        Self {
            residuals: config.residuals.clone(),
            plot: config.plot.clone(),
            plot_width: config.plot_width,
            plot_height: config.plot_height,
        }
    }
}

/// Check the time range before any work is done.
///
/// Optimiser settings are checked by the search itself (`fit::global`).
pub fn validate_config(config: &FitConfig) -> Result<(), AppError> {
    if !(config.t_min.is_finite() && config.t_max.is_finite() && config.t_max > config.t_min) {
        return Err(AppError::io(format!(
            "Invalid t range: t_min={}, t_max={} (must be finite and t_max > t_min).",
            config.t_min, config.t_max
        )));
    }
    Ok(())
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig, progress: &mut dyn FitProgress) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    // 1) Load observations; an empty file stops here.
    let ingest = load_observations(&config.input)?;

    // 2) Synthetic model time, one value per observation.
    let t = time_grid(ingest.len(), config.t_min, config.t_max);

    // 3) Two-stage optimisation.
    let objective = L1Objective::new(t.clone(), ingest.observations.clone())?;
    let fit = fit_two_stage(&objective, &config.bounds, &config.global, &config.local, progress)?;

    // 4) Residuals from the final parameters.
    let residuals = compute_residuals(objective.t(), objective.observations(), &fit.params)?;
    debug!(rows = residuals.len(), total_abs_err = total_abs_err(&residuals), "residual table computed");

    Ok(RunOutput {
        ingest,
        t,
        fit,
        residuals,
    })
}

/// Write the residual CSV and, unless disabled, the PNG plot.
pub fn write_outputs(targets: &OutputTargets, residuals: &[ResidualRow]) -> Result<(), AppError> {
    crate::io::export::write_residuals_csv(&targets.residuals, residuals)?;
    match &targets.plot {
        Some(path) => {
            crate::plot::render_fit_png(path, residuals, targets.plot_width, targets.plot_height)?;
        }
        None => info!("plot rendering disabled"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GlobalSearchConfig, LocalSearchConfig, ParamBounds};
    use crate::fit::Silent;

    fn config(input: PathBuf) -> FitConfig {
        FitConfig {
            input,
            residuals: PathBuf::from("unused.csv"),
            plot: None,
            plot_width: 800,
            plot_height: 600,
            t_min: 6.0,
            t_max: 60.0,
            bounds: ParamBounds::default(),
            global: GlobalSearchConfig::default(),
            local: LocalSearchConfig::default(),
        }
    }

    #[test]
    fn empty_input_fails_before_optimising() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "x,y\n").unwrap();
        let err = run_fit(&config(path), &mut Silent).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NO_DATA);
    }

    #[test]
    fn zero_population_is_rejected_by_the_search() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xy.csv");
        std::fs::write(&path, "x,y\n1,42\n2,43\n3,44\n").unwrap();
        let mut cfg = config(path);
        cfg.global.popsize = 0;
        assert!(validate_config(&cfg).is_ok());
        let err = run_fit(&cfg, &mut Silent).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }

    #[test]
    fn inverted_t_range_is_rejected() {
        let mut cfg = config(PathBuf::from("unused.csv"));
        cfg.t_min = 60.0;
        cfg.t_max = 6.0;
        assert_eq!(validate_config(&cfg).unwrap_err().exit_code(), crate::error::EXIT_IO);
    }
}
