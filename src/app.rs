//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - runs the fit
//! - prints results
//! - writes the residual table and plot

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::{FitConfig, GlobalOutcome, GlobalSearchConfig, LocalSearchConfig, ParamBounds};
use crate::error::AppError;
use crate::fit::FitProgress;

pub mod pipeline;

use pipeline::OutputTargets;

/// Entry point for the `pfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.output.verbose);
    handle_fit(&fit_config_from_args(&cli))
}

/// Install the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v` flags.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Prints the stage progress lines to stdout.
struct ConsoleProgress;

impl FitProgress for ConsoleProgress {
    fn global_started(&mut self) {
        println!("{}", crate::report::format_global_started());
    }

    fn global_finished(&mut self, outcome: &GlobalOutcome) {
        println!("{}", crate::report::format_global_result(outcome));
    }

    fn local_started(&mut self) {
        println!("{}", crate::report::format_local_started());
    }
}

fn handle_fit(config: &FitConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(config, &mut ConsoleProgress)?;

    tracing::info!(
        "{}",
        crate::report::format_dataset_summary(&run.ingest.stats, config.t_min, config.t_max)
    );

    pipeline::write_outputs(&OutputTargets::from(config), &run.residuals)?;

    println!("{}", crate::report::format_final_results(&run.fit.params, run.fit.loss));
    println!(
        "{}",
        crate::report::format_expressions(&run.fit.params, config.t_min, config.t_max)
    );
    Ok(())
}

pub fn fit_config_from_args(cli: &Cli) -> FitConfig {
    let out = &cli.output;
    let args = &cli.fit;
    FitConfig {
        input: out.input.clone(),
        residuals: out.residuals.clone(),
        plot: (!out.no_plot).then(|| out.plot.clone()),
        plot_width: out.plot_width,
        plot_height: out.plot_height,

        t_min: args.t_min,
        t_max: args.t_max,

        bounds: ParamBounds::default(),
        global: GlobalSearchConfig {
            maxiter: args.maxiter,
            popsize: args.popsize,
            tol: args.tol,
            seed: args.seed,
            ..GlobalSearchConfig::default()
        },
        local: LocalSearchConfig {
            maxiter: args.nm_maxiter,
            ..LocalSearchConfig::default()
        },
    }
}
