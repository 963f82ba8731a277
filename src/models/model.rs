//! Spiral curve evaluation.
//!
//! ```text
//! θ    = radians(theta_deg)
//! x(t) = t·cos θ − e^{M|t|}·sin(0.3t)·sin θ + X
//! y(t) = 42 + t·sin θ + e^{M|t|}·sin(0.3t)·cos θ
//! ```
//!
//! With `|M| <= 0.05` and `t <= 60` the envelope `e^{M|t|}` stays below `e^3`,
//! so plain `f64` evaluation is safe.

use crate::domain::Params;
use crate::math::linspace;

/// Constant vertical offset of the curve.
pub const Y_OFFSET: f64 = 42.0;
/// Angular frequency of the oscillating term.
pub const WAVE_FREQ: f64 = 0.3;

/// Synthetic model time for `n` observations, evenly spaced over `[t_min, t_max]`.
pub fn time_grid(n: usize, t_min: f64, t_max: f64) -> Vec<f64> {
    linspace(t_min, t_max, n)
}

/// Evaluate the curve at a single `t`.
pub fn predict_point(params: &Params, t: f64) -> (f64, f64) {
    let theta = params.theta_deg.to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let wave = (params.m * t.abs()).exp() * (WAVE_FREQ * t).sin();

    let x = t * cos_theta - wave * sin_theta + params.x_offset;
    let y = Y_OFFSET + t * sin_theta + wave * cos_theta;
    (x, y)
}

/// Evaluate the curve over a time grid.
///
/// Both returned vectors have the same length as `t`.
pub fn predict(params: &Params, t: &[f64]) -> (Vec<f64>, Vec<f64>) {
    t.iter().map(|&ti| predict_point(params, ti)).unzip()
}
