//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - used in-memory by the optimisers
//! - exported to the residual CSV

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of free parameters in the spiral model.
pub const PARAM_DIM: usize = 3;

/// A single observed point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

/// Model parameters: rotation angle (degrees), exponential rate, x offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub theta_deg: f64,
    pub m: f64,
    pub x_offset: f64,
}

impl Params {
    pub fn new(theta_deg: f64, m: f64, x_offset: f64) -> Self {
        Self {
            theta_deg,
            m,
            x_offset,
        }
    }

    pub fn to_array(self) -> [f64; PARAM_DIM] {
        [self.theta_deg, self.m, self.x_offset]
    }

    pub fn from_slice(v: &[f64]) -> Option<Self> {
        match v {
            [theta_deg, m, x_offset] => Some(Self::new(*theta_deg, *m, *x_offset)),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.theta_deg.is_finite() && self.m.is_finite() && self.x_offset.is_finite()
    }
}

/// Closed interval `[lo, hi]` for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.lo, self.hi)
    }
}

/// Search box for the optimisers.
///
/// The box is closed; anything beyond it is clamped (`clamp`) or rejected
/// (`contains`). NaN is never contained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub theta_deg: Interval,
    pub m: Interval,
    pub x_offset: Interval,
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            theta_deg: Interval::new(0.1, 179.9),
            m: Interval::new(-0.05, 0.05),
            x_offset: Interval::new(0.0, 120.0),
        }
    }
}

impl ParamBounds {
    pub fn intervals(&self) -> [Interval; PARAM_DIM] {
        [self.theta_deg, self.m, self.x_offset]
    }

    pub fn contains(&self, p: &Params) -> bool {
        self.intervals()
            .iter()
            .zip(p.to_array())
            .all(|(iv, v)| iv.contains(v))
    }

    pub fn clamp(&self, p: &Params) -> Params {
        Params::new(
            self.theta_deg.clamp(p.theta_deg),
            self.m.clamp(p.m),
            self.x_offset.clamp(p.x_offset),
        )
    }

    /// Map a point of the unit cube `[0, 1]^3` into the box.
    pub fn from_unit(&self, u: &[f64; PARAM_DIM]) -> Params {
        let iv = self.intervals();
        Params::new(
            iv[0].lo + u[0] * iv[0].width(),
            iv[1].lo + u[1] * iv[1].width(),
            iv[2].lo + u[2] * iv[2].width(),
        )
    }
}

/// Per-point fitted values (one row of the residual table).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualRow {
    pub t: f64,
    pub x_obs: f64,
    pub y_obs: f64,
    pub x_fit: f64,
    pub y_fit: f64,
    pub abs_err: f64,
}

/// Outcome of the differential-evolution stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalOutcome {
    pub params: Params,
    pub loss: f64,
    pub generations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

/// Outcome of the Nelder–Mead stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalOutcome {
    pub params: Params,
    pub loss: f64,
    pub iterations: u64,
    pub termination: String,
}

/// Final fit: refined parameters plus the stage outcomes that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub params: Params,
    pub loss: f64,
    pub global: GlobalOutcome,
    pub local: LocalOutcome,
}

/// Differential-evolution tunables.
#[derive(Debug, Clone, Copy)]
pub struct GlobalSearchConfig {
    pub maxiter: usize,
    /// Population multiplier: population size is `popsize * PARAM_DIM`.
    pub popsize: usize,
    pub tol: f64,
    pub atol: f64,
    /// Mutation factor is drawn uniformly from this range each generation.
    pub mutation: (f64, f64),
    pub recombination: f64,
    pub seed: u64,
}

impl Default for GlobalSearchConfig {
    fn default() -> Self {
        Self {
            maxiter: 60,
            popsize: 20,
            tol: 1e-7,
            atol: 0.0,
            mutation: (0.5, 1.0),
            recombination: 0.7,
            seed: 42,
        }
    }
}

/// Nelder–Mead tunables.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearchConfig {
    pub maxiter: u64,
    pub sd_tolerance: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            maxiter: 10_000,
            sd_tolerance: 1e-10,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub residuals: PathBuf,
    /// PNG output; `None` disables rendering.
    pub plot: Option<PathBuf>,
    pub plot_width: u32,
    pub plot_height: u32,

    pub t_min: f64,
    pub t_max: f64,

    pub bounds: ParamBounds,
    pub global: GlobalSearchConfig,
    pub local: LocalSearchConfig,
}
