//! L1 objective for the spiral fit.
//!
//! ```text
//! loss(p) = Σ_i |x_i − x̂_i(p)| + |y_i − ŷ_i(p)|
//! ```
//!
//! Absolute errors keep a handful of stray points from dominating the fit.

use crate::domain::{Observation, Params};
use crate::error::AppError;
use crate::models::predict_point;

/// Observations paired with their synthetic model time.
#[derive(Debug, Clone)]
pub struct L1Objective {
    t: Vec<f64>,
    observations: Vec<Observation>,
}

impl L1Objective {
    pub fn new(t: Vec<f64>, observations: Vec<Observation>) -> Result<Self, AppError> {
        if t.len() != observations.len() {
            return Err(AppError::numeric(format!(
                "Time grid has {} points but there are {} observations.",
                t.len(),
                observations.len()
            )));
        }
        if observations.is_empty() {
            return Err(AppError::no_data("No observations to fit."));
        }
        Ok(Self { t, observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Total absolute error at `params`.
    ///
    /// Non-finite totals are reported as `+∞` so optimisers rank them last.
    pub fn loss(&self, params: &Params) -> f64 {
        let total: f64 = self
            .t
            .iter()
            .zip(&self.observations)
            .map(|(&t, obs)| {
                let (x_fit, y_fit) = predict_point(params, t);
                (obs.x - x_fit).abs() + (obs.y - y_fit).abs()
            })
            .sum();
        if total.is_finite() { total } else { f64::INFINITY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{predict, time_grid};

    fn synthetic(params: &Params, n: usize) -> L1Objective {
        let t = time_grid(n, 6.0, 60.0);
        let (x, y) = predict(params, &t);
        let obs = x.into_iter().zip(y).map(|(x, y)| Observation { x, y }).collect();
        L1Objective::new(t, obs).unwrap()
    }

    #[test]
    fn exact_fit_has_zero_loss() {
        let p = Params::new(45.0, 0.0, 10.0);
        let obj = synthetic(&p, 50);
        assert_eq!(obj.loss(&p), 0.0);
    }

    #[test]
    fn loss_is_positive_away_from_truth() {
        let p = Params::new(45.0, 0.0, 10.0);
        let obj = synthetic(&p, 50);
        for q in [
            Params::new(44.0, 0.0, 10.0),
            Params::new(45.0, 0.01, 10.0),
            Params::new(45.0, 0.0, 11.0),
            Params::new(0.1, -0.05, 0.0),
        ] {
            assert!(obj.loss(&q) > 0.0, "{q:?}");
        }
    }

    #[test]
    fn shifting_x_offset_costs_n_times_shift() {
        let p = Params::new(60.0, 0.01, 30.0);
        let obj = synthetic(&p, 20);
        let shifted = Params::new(60.0, 0.01, 32.0);
        assert!((obj.loss(&shifted) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = L1Objective::new(vec![6.0, 60.0], vec![Observation { x: 0.0, y: 0.0 }]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NUMERIC);
        let err = L1Objective::new(Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NO_DATA);
    }
}
