//! Reporting utilities: residual table and formatted terminal output.
//!
//! Formatting lives here so the fitting code stays free of presentation
//! concerns and output changes stay localized.

use crate::domain::{Observation, Params, ResidualRow};
use crate::error::AppError;
use crate::models::predict;

pub mod format;

pub use format::*;

/// Compute fitted values and absolute errors for each observation.
///
/// Fitted columns come straight from `models::predict` with `params`, so the
/// table is reproducible bit for bit from the final parameters.
pub fn compute_residuals(t: &[f64], observations: &[Observation], params: &Params) -> Result<Vec<ResidualRow>, AppError> {
    if t.len() != observations.len() {
        return Err(AppError::numeric(format!(
            "Time grid has {} points but there are {} observations.",
            t.len(),
            observations.len()
        )));
    }

    let (x_fit, y_fit) = predict(params, t);
    let mut out = Vec::with_capacity(observations.len());
    for (i, obs) in observations.iter().enumerate() {
        if !(x_fit[i].is_finite() && y_fit[i].is_finite()) {
            return Err(AppError::numeric("Non-finite model prediction during residual computation."));
        }
        out.push(ResidualRow {
            t: t[i],
            x_obs: obs.x,
            y_obs: obs.y,
            x_fit: x_fit[i],
            y_fit: y_fit[i],
            abs_err: (obs.x - x_fit[i]).abs() + (obs.y - y_fit[i]).abs(),
        });
    }
    Ok(out)
}

/// Sum of the `abs_err` column (equals the L1 loss at the same parameters).
pub fn total_abs_err(rows: &[ResidualRow]) -> f64 {
    rows.iter().map(|r| r.abs_err).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::L1Objective;
    use crate::models::time_grid;

    #[test]
    fn compute_residuals_basic() {
        let params = Params::new(90.0, 0.0, 0.0);
        let t = vec![6.0, 60.0];
        let (x, y) = predict(&params, &t);
        let observations = vec![
            Observation { x: x[0], y: y[0] },
            Observation { x: x[1] + 1.0, y: y[1] - 2.0 },
        ];

        let rows = compute_residuals(&t, &observations, &params).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].abs_err, 0.0);
        assert!((rows[1].abs_err - 3.0).abs() < 1e-9);
        assert_eq!(rows[1].t, 60.0);
    }

    #[test]
    fn abs_err_identity_and_loss_agreement() {
        let params = Params::new(28.0, 0.02, 55.0);
        let t = time_grid(40, 6.0, 60.0);
        let observations: Vec<Observation> = (0..40)
            .map(|i| Observation { x: 50.0 + i as f64, y: 40.0 + (i as f64).sin() * 10.0 })
            .collect();

        let rows = compute_residuals(&t, &observations, &params).unwrap();
        for r in &rows {
            assert_eq!(r.abs_err, (r.x_obs - r.x_fit).abs() + (r.y_obs - r.y_fit).abs());
        }

        let objective = L1Objective::new(t, observations).unwrap();
        assert!((total_abs_err(&rows) - objective.loss(&params)).abs() < 1e-9);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = compute_residuals(&[6.0], &[], &Params::new(45.0, 0.0, 10.0)).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NUMERIC);
    }
}
