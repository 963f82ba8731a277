//! Command-line parsing for the parametric curve fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! modeling/math code. Every default reproduces the fixed settings of a plain
//! `pfit` run.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pfit", version, about = "Parametric spiral curve fitter (L1, DE + Nelder–Mead)")]
pub struct Cli {
    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub fit: FitArgs,
}

/// Input, report outputs and verbosity.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Input CSV with `x` and `y` columns.
    #[arg(short = 'i', long, default_value = "xy_data.csv")]
    pub input: PathBuf,

    /// Residual table output (CSV).
    #[arg(long, default_value = "fit_residuals.csv")]
    pub residuals: PathBuf,

    /// Plot output (PNG).
    #[arg(long, default_value = "param_fit.png")]
    pub plot: PathBuf,

    /// Skip rendering the PNG plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (pixels).
    #[arg(long, default_value_t = 2400)]
    pub plot_width: u32,

    /// Plot height (pixels).
    #[arg(long, default_value_t = 1800)]
    pub plot_height: u32,

    /// Increase log verbosity (`-v` info, `-vv` debug). `RUST_LOG` overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Time grid and optimiser settings.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Start of the synthetic time grid.
    #[arg(long, default_value_t = 6.0, allow_hyphen_values = true)]
    pub t_min: f64,

    /// End of the synthetic time grid.
    #[arg(long, default_value_t = 60.0, allow_hyphen_values = true)]
    pub t_max: f64,

    /// Maximum number of differential-evolution generations.
    #[arg(long, default_value_t = 60)]
    pub maxiter: usize,

    /// Population multiplier (population = popsize × 3).
    #[arg(long, default_value_t = 20)]
    pub popsize: usize,

    /// Relative convergence tolerance of the global search.
    #[arg(long, default_value_t = 1e-7)]
    pub tol: f64,

    /// Maximum number of Nelder–Mead iterations.
    #[arg(long, default_value_t = 10_000)]
    pub nm_maxiter: u64,

    /// Random seed for the global search.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
