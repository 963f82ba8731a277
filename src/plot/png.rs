//! PNG rendering of observed points and the fitted curve (Plotters bitmap backend).
//!
//! Plot elements:
//! - observed points: filled blue dots
//! - fitted curve: red line through `(x_fit, y_fit)` in `t` order
//! - axis labels, mesh grid, legend and title
//!
//! Text, marker and line sizes scale with the image height so the default
//! 2400×1800 output reads like an 8×6 in figure at 300 dpi.

use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::domain::ResidualRow;
use crate::error::AppError;

pub const PLOT_TITLE: &str = "Parametric Curve Fitting (L1 Minimization)";

const OBSERVED_COLOR: RGBColor = RGBColor(30, 144, 255);
const CURVE_COLOR: RGBColor = RGBColor(220, 20, 60);

/// Fraction of each axis range added as padding on both sides.
const PAD_FRAC: f64 = 0.05;

/// Render the fit plot to `path`.
pub fn render_fit_png(path: &Path, rows: &[ResidualRow], width: u32, height: u32) -> Result<(), AppError> {
    if rows.is_empty() {
        return Err(AppError::no_data("Nothing to plot: the residual table is empty."));
    }
    if width < 100 || height < 100 {
        return Err(AppError::io(format!("Plot size {width}x{height} is too small (minimum 100x100).")));
    }

    let (x_range, y_range) = plot_ranges(rows);
    let unit = (height as f64 / 600.0).max(0.5);
    let px = |v: f64| (v * unit).round().max(1.0) as u32;
    let err = |e: &dyn std::fmt::Display| AppError::io(format!("Failed to render plot '{}': {e}", path.display()));

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(PLOT_TITLE, ("sans-serif", px(20.0)))
        .margin(px(12.0))
        .x_label_area_size(px(40.0))
        .y_label_area_size(px(50.0))
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(|e| err(&e))?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .label_style(("sans-serif", px(13.0)))
        .axis_desc_style(("sans-serif", px(15.0)))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.2))
        .draw()
        .map_err(|e| err(&e))?;

    let radius = px(2.0);
    chart
        .draw_series(
            rows.iter()
                .map(|r| Circle::new((r.x_obs, r.y_obs), radius, OBSERVED_COLOR.filled())),
        )
        .map_err(|e| err(&e))?
        .label("Observed data")
        .legend(move |(x, y)| Circle::new((x, y), radius, OBSERVED_COLOR.filled()));

    let stroke = px(2.0);
    let legend_len = px(20.0) as i32;
    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.x_fit, r.y_fit)),
            CURVE_COLOR.stroke_width(stroke),
        ))
        .map_err(|e| err(&e))?
        .label("Fitted curve")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], CURVE_COLOR.stroke_width(stroke)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", px(13.0)))
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(|e| err(&e))?;

    root.present().map_err(|e| err(&e))?;
    info!(path = %path.display(), width, height, "rendered fit plot");
    Ok(())
}

/// Padded axis ranges covering both observed and fitted points.
pub fn plot_ranges(rows: &[ResidualRow]) -> ((f64, f64), (f64, f64)) {
    let xs = rows.iter().flat_map(|r| [r.x_obs, r.x_fit]);
    let ys = rows.iter().flat_map(|r| [r.y_obs, r.y_fit]);
    (padded_range(xs), padded_range(ys))
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - PAD_FRAC * span, hi + PAD_FRAC * span)
}
