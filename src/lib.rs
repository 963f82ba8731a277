//! `pfit` library crate.
//!
//! The binary (`pfit`) is a thin wrapper around this library so that:
//!
//! - the fitting pipeline is testable without spawning processes
//! - the model, objective and optimisers are reusable on their own

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
