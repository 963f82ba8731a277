//! Local refinement: Nelder–Mead simplex search via `argmin`.
//!
//! The global stage lands in the right basin but only to a few digits; the
//! simplex search polishes that estimate. It needs no gradients, which matters
//! here because the L1 objective is not differentiable wherever a residual
//! crosses zero.
//!
//! Bounds are enforced by the cost itself: any vertex outside the box costs
//! `+∞`, so the simplex contracts back inside instead of exploring beyond it.

use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::neldermead::NelderMead;
use tracing::{info, warn};

use crate::domain::{LocalOutcome, LocalSearchConfig, PARAM_DIM, ParamBounds, Params};
use crate::error::AppError;
use crate::fit::objective::L1Objective;

/// Relative size of the initial simplex around the seed.
const SIMPLEX_REL_STEP: f64 = 0.05;
/// Absolute step used for seed coordinates that are exactly zero.
const SIMPLEX_ZERO_STEP: f64 = 0.00025;

/// Bridges the L1 objective to `argmin`'s `CostFunction`.
#[derive(Debug, Clone, Copy)]
pub struct BoundedL1<'a> {
    pub objective: &'a L1Objective,
    pub bounds: &'a ParamBounds,
}

impl<'a> BoundedL1<'a> {
    pub fn new(objective: &'a L1Objective, bounds: &'a ParamBounds) -> Self {
        Self { objective, bounds }
    }

    /// Loss at `params`, or `+∞` when `params` lies outside the box.
    pub fn bounded_loss(&self, params: &Params) -> f64 {
        if self.bounds.contains(params) {
            self.objective.loss(params)
        } else {
            f64::INFINITY
        }
    }
}

impl CostFunction for BoundedL1<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        let params = Params::from_slice(param)
            .ok_or_else(|| Error::msg(format!("expected {PARAM_DIM} parameters, got {}", param.len())))?;
        Ok(self.bounded_loss(&params))
    }
}

/// Refine `seed` with Nelder–Mead.
pub fn refine(
    objective: &L1Objective,
    bounds: &ParamBounds,
    seed: &Params,
    config: &LocalSearchConfig,
) -> Result<LocalOutcome, AppError> {
    let seed = bounds.clamp(seed);
    let simplex = initial_simplex(&seed, bounds);

    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(config.sd_tolerance)
        .map_err(|e| AppError::numeric(format!("Invalid Nelder–Mead settings: {e}")))?;

    let problem = BoundedL1::new(objective, bounds);
    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(config.maxiter))
        .run()
        .map_err(|e| AppError::numeric(format!("Nelder–Mead refinement failed: {e}")))?;

    let state = result.state();
    let iterations = state.get_iter();
    let termination = format!("{:?}", state.get_termination_status());

    let best = state
        .get_best_param()
        .and_then(|p| Params::from_slice(p))
        .unwrap_or(seed);
    let params = bounds.clamp(&best);
    let loss = objective.loss(&params);

    if iterations >= config.maxiter {
        warn!(iterations, "Nelder–Mead hit its iteration cap; returning best effort");
    }
    info!(
        iterations,
        termination = %termination,
        loss,
        theta_deg = params.theta_deg,
        m = params.m,
        x_offset = params.x_offset,
        "local refinement finished"
    );

    Ok(LocalOutcome {
        params,
        loss,
        iterations,
        termination,
    })
}

/// Seed plus one vertex per coordinate.
///
/// Each vertex moves one coordinate by 5% of its value (a small absolute step
/// for zeros). When that would leave the box the step is taken inward instead,
/// so every starting vertex has a finite cost.
pub fn initial_simplex(seed: &Params, bounds: &ParamBounds) -> Vec<Vec<f64>> {
    let x0 = seed.to_array();
    let intervals = bounds.intervals();

    let mut simplex = Vec::with_capacity(PARAM_DIM + 1);
    simplex.push(x0.to_vec());
    for j in 0..PARAM_DIM {
        let mut vertex = x0;
        let step = if x0[j] != 0.0 {
            SIMPLEX_REL_STEP * x0[j]
        } else {
            SIMPLEX_ZERO_STEP
        };
        let iv = intervals[j];
        let up = x0[j] + step;
        let down = x0[j] - step;
        vertex[j] = if iv.contains(up) {
            up
        } else if iv.contains(down) {
            down
        } else {
            // Degenerate box narrower than the step: split the distance to the
            // farther edge.
            let far = if (iv.hi - x0[j]) >= (x0[j] - iv.lo) { iv.hi } else { iv.lo };
            x0[j] + 0.5 * (far - x0[j])
        };
        simplex.push(vertex.to_vec());
    }
    simplex
}
