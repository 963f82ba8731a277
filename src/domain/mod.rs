//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations and residual rows (`Observation`, `ResidualRow`)
//! - model parameters and their search box (`Params`, `ParamBounds`)
//! - optimiser configuration and outputs (`FitConfig`, `FitResult`, ...)

pub mod types;

pub use types::*;
